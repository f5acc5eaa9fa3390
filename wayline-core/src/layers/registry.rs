//! Bookkeeping for layers this crate has put on a surface.

use std::collections::BTreeMap;

use log::warn;

use crate::surface::{LayerHandle, MapSurface};

use super::{LayerKind, MapLayer};

/// Every layer created by the lifecycle manager, in creation order.
///
/// Sweeps walk this list only; the surface's own layer set is never
/// inspected, so layers added by anyone else are left alone.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct LayerRegistry {
    layers: Vec<MapLayer>,
}

impl LayerRegistry {
    pub(crate) fn record(&mut self, kind: LayerKind, handle: LayerHandle) {
        self.layers.push(MapLayer { kind, handle });
    }

    pub(crate) fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub(crate) fn counts(&self) -> BTreeMap<LayerKind, usize> {
        let mut counts = BTreeMap::new();
        for layer in &self.layers {
            *counts.entry(layer.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Remove every recorded layer from `surface` and forget it.
    ///
    /// A failed removal is logged and the entry is still dropped: the handle
    /// is no longer usable and keeping it would fail every later sweep.
    pub(crate) fn sweep<S: MapSurface>(&mut self, surface: &mut S) -> usize {
        let mut removed = 0;
        for layer in self.layers.drain(..) {
            match surface.remove_layer(layer.handle) {
                Ok(()) => removed += 1,
                Err(err) => warn!("Failed to remove {:?} {}: {err}", layer.kind, layer.handle),
            }
        }
        removed
    }

    /// Forget every layer without touching a surface.
    pub(crate) fn forget(&mut self) {
        self.layers.clear();
    }
}
