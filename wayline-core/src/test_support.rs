//! In-memory map surface for tests and examples.
//!
//! [`RecordingSurface`] keeps every layer in stacking order so assertions can
//! check what is drawn, in which order, and with which popup. Each new
//! surface starts with one base tile layer that no caller owns, mirroring a
//! real map widget.

use crate::surface::{
    LayerHandle, MapSurface, MarkerOptions, PolylineOptions, SurfaceContainer, SurfaceError,
    SurfaceFactory,
};
use crate::{Coordinate, ViewportSpec};

/// What a recorded layer depicts.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedContent {
    /// Base tiles present from creation.
    Base,
    /// A point marker.
    Marker {
        /// Marker position.
        position: Coordinate,
        /// Options it was added with.
        options: MarkerOptions,
    },
    /// A polyline.
    Polyline {
        /// Vertices in order.
        points: Vec<Coordinate>,
        /// Options it was added with.
        options: PolylineOptions,
    },
}

/// A layer held by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLayer {
    /// Handle issued when the layer was added.
    pub handle: LayerHandle,
    /// Layer contents.
    pub content: RecordedContent,
    /// Bound popup HTML, if any.
    pub popup: Option<String>,
}

/// A [`MapSurface`] that records operations instead of drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    container: String,
    layers: Vec<RecordedLayer>,
    view: Option<ViewportSpec>,
    next_handle: u64,
    add_limit: Option<usize>,
    adds: usize,
}

impl RecordingSurface {
    /// Create a surface holding only its base layer.
    #[must_use]
    pub fn new(container: impl Into<String>) -> Self {
        let mut surface = Self {
            container: container.into(),
            layers: Vec::new(),
            view: None,
            next_handle: 0,
            add_limit: None,
            adds: 0,
        };
        surface.push(RecordedContent::Base);
        surface
    }

    /// Reject every marker or polyline after the first `limit`.
    #[must_use]
    pub const fn with_add_limit(mut self, limit: usize) -> Self {
        self.add_limit = Some(limit);
        self
    }

    /// Container the surface was created in.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// All layers, bottom first.
    #[must_use]
    pub fn layers(&self) -> &[RecordedLayer] {
        &self.layers
    }

    /// Layers other than base tiles, bottom first.
    pub fn overlays(&self) -> impl Iterator<Item = &RecordedLayer> {
        self.layers
            .iter()
            .filter(|layer| layer.content != RecordedContent::Base)
    }

    /// Number of layers other than base tiles.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.overlays().count()
    }

    /// Number of polylines.
    #[must_use]
    pub fn polyline_count(&self) -> usize {
        self.overlays()
            .filter(|layer| matches!(layer.content, RecordedContent::Polyline { .. }))
            .count()
    }

    /// Number of markers.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.overlays()
            .filter(|layer| matches!(layer.content, RecordedContent::Marker { .. }))
            .count()
    }

    /// Look up a layer by handle.
    #[must_use]
    pub fn layer(&self, handle: LayerHandle) -> Option<&RecordedLayer> {
        self.layers.iter().find(|layer| layer.handle == handle)
    }

    /// Stacking position of `handle`, zero being the bottom.
    #[must_use]
    pub fn z_index(&self, handle: LayerHandle) -> Option<usize> {
        self.layers.iter().position(|layer| layer.handle == handle)
    }

    /// Last view applied.
    #[must_use]
    pub const fn view(&self) -> Option<&ViewportSpec> {
        self.view.as_ref()
    }

    /// Add a marker as a third party would, outside any manager.
    pub fn add_foreign_marker(&mut self, position: Coordinate) -> LayerHandle {
        self.push(RecordedContent::Marker {
            position,
            options: MarkerOptions {
                icon: crate::surface::MarkerIcon::Pin {
                    color: "#000000".to_owned(),
                },
                interactive: false,
            },
        })
    }

    fn push(&mut self, content: RecordedContent) -> LayerHandle {
        self.next_handle += 1;
        let handle = LayerHandle::new(self.next_handle);
        self.layers.push(RecordedLayer {
            handle,
            content,
            popup: None,
        });
        handle
    }

    fn admit(&mut self, operation: &'static str) -> Result<(), SurfaceError> {
        if let Some(limit) = self.add_limit
            && self.adds >= limit
        {
            return Err(SurfaceError::Rejected {
                operation,
                reason: format!("add limit of {limit} reached"),
            });
        }
        self.adds += 1;
        Ok(())
    }

    fn take(&mut self, handle: LayerHandle) -> Result<RecordedLayer, SurfaceError> {
        let index = self
            .z_index(handle)
            .ok_or(SurfaceError::UnknownLayer(handle))?;
        Ok(self.layers.remove(index))
    }
}

impl MapSurface for RecordingSurface {
    fn set_view(&mut self, viewport: &ViewportSpec) -> Result<(), SurfaceError> {
        self.view = Some(*viewport);
        Ok(())
    }

    fn add_marker(
        &mut self,
        position: Coordinate,
        options: &MarkerOptions,
    ) -> Result<LayerHandle, SurfaceError> {
        self.admit("add marker")?;
        Ok(self.push(RecordedContent::Marker {
            position,
            options: options.clone(),
        }))
    }

    fn add_polyline(
        &mut self,
        points: &[Coordinate],
        options: &PolylineOptions,
    ) -> Result<LayerHandle, SurfaceError> {
        self.admit("add polyline")?;
        Ok(self.push(RecordedContent::Polyline {
            points: points.to_vec(),
            options: options.clone(),
        }))
    }

    fn remove_layer(&mut self, handle: LayerHandle) -> Result<(), SurfaceError> {
        self.take(handle).map(drop)
    }

    fn bind_popup(&mut self, handle: LayerHandle, html: &str) -> Result<(), SurfaceError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|layer| layer.handle == handle)
            .ok_or(SurfaceError::UnknownLayer(handle))?;
        layer.popup = Some(html.to_owned());
        Ok(())
    }

    fn bring_to_front(&mut self, handle: LayerHandle) -> Result<(), SurfaceError> {
        let layer = self.take(handle)?;
        self.layers.push(layer);
        Ok(())
    }

    fn bring_to_back(&mut self, handle: LayerHandle) -> Result<(), SurfaceError> {
        let layer = self.take(handle)?;
        let above_base = self
            .layers
            .iter()
            .take_while(|existing| existing.content == RecordedContent::Base)
            .count();
        self.layers.insert(above_base, layer);
        Ok(())
    }
}

/// Creates [`RecordingSurface`]s while its container is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSurfaceFactory {
    mounted: bool,
    created: usize,
    add_limit: Option<usize>,
}

impl Default for RecordingSurfaceFactory {
    fn default() -> Self {
        Self {
            mounted: true,
            created: 0,
            add_limit: None,
        }
    }
}

impl RecordingSurfaceFactory {
    /// A factory whose container is not mounted yet.
    #[must_use]
    pub fn unmounted() -> Self {
        Self {
            mounted: false,
            ..Self::default()
        }
    }

    /// Surfaces created from now on reject adds beyond `limit`.
    #[must_use]
    pub const fn with_add_limit(mut self, limit: usize) -> Self {
        self.add_limit = Some(limit);
        self
    }

    /// Mark the container as mounted.
    pub const fn mount(&mut self) {
        self.mounted = true;
    }

    /// Mark the container as unmounted.
    pub const fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Surfaces created so far.
    #[must_use]
    pub const fn created(&self) -> usize {
        self.created
    }
}

impl SurfaceFactory for RecordingSurfaceFactory {
    type Surface = RecordingSurface;

    fn create_surface(
        &mut self,
        container: &SurfaceContainer,
    ) -> Result<Self::Surface, SurfaceError> {
        if !self.mounted {
            return Err(SurfaceError::Unavailable {
                container: container.id().to_owned(),
            });
        }
        self.created += 1;
        let mut surface = RecordingSurface::new(container.id());
        surface.add_limit = self.add_limit;
        Ok(surface)
    }
}
