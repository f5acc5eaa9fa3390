//! Capabilities the render pipeline needs from a map surface.
//!
//! The core never depends on a particular mapping library. Anything able to
//! centre a view, draw markers and polylines, attach popups and restack or
//! remove what it drew can host a route by implementing [`MapSurface`].

use std::fmt;

use thiserror::Error;

use crate::{Coordinate, ViewportSpec};

/// Opaque identifier a surface issues for each layer it adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerHandle(u64);

impl LayerHandle {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Identifies where a surface is mounted, e.g. a DOM element id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceContainer {
    id: String,
}

impl SurfaceContainer {
    /// Name a container.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The container identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Glyph drawn for a marker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum MarkerIcon {
    /// A round pin in the given CSS colour.
    Pin {
        /// Fill colour.
        color: String,
    },
    /// A chevron rotated anticlockwise from east by `rotation_deg`.
    Arrow {
        /// Fill colour.
        color: String,
        /// Rotation in degrees, `atan2(Δlat, Δlng)`.
        rotation_deg: f64,
    },
}

/// Options for [`MapSurface::add_marker`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerOptions {
    /// Glyph to draw.
    pub icon: MarkerIcon,
    /// Whether the marker responds to pointer input.
    pub interactive: bool,
}

/// Stroke options for [`MapSurface::add_polyline`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolylineOptions {
    /// Stroke colour.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity in `[0, 1]`.
    pub opacity: f64,
}

/// Errors reported by a surface or its factory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The container is not mounted yet, so no surface can be created.
    #[error("map container {container:?} is not mounted")]
    Unavailable {
        /// Container that was requested.
        container: String,
    },
    /// The handle does not name a layer on this surface.
    #[error("{0} is not on this surface")]
    UnknownLayer(LayerHandle),
    /// The surface refused the operation.
    #[error("surface rejected {operation}: {reason}")]
    Rejected {
        /// Operation that failed.
        operation: &'static str,
        /// Backend-specific explanation.
        reason: String,
    },
}

/// A stateful map canvas.
///
/// Layers are stacked in insertion order unless restacked with
/// [`bring_to_front`](Self::bring_to_front) or
/// [`bring_to_back`](Self::bring_to_back). Surfaces may hold layers the
/// caller did not add, such as base tiles.
pub trait MapSurface {
    /// Centre the view and set the zoom level.
    ///
    /// # Errors
    /// Implementation-specific.
    fn set_view(&mut self, viewport: &ViewportSpec) -> Result<(), SurfaceError>;

    /// Add a point marker.
    ///
    /// # Errors
    /// Implementation-specific.
    fn add_marker(
        &mut self,
        position: Coordinate,
        options: &MarkerOptions,
    ) -> Result<LayerHandle, SurfaceError>;

    /// Add a polyline through `points`.
    ///
    /// # Errors
    /// Implementation-specific.
    fn add_polyline(
        &mut self,
        points: &[Coordinate],
        options: &PolylineOptions,
    ) -> Result<LayerHandle, SurfaceError>;

    /// Remove a layer previously added through this surface.
    ///
    /// # Errors
    /// Returns [`SurfaceError::UnknownLayer`] when the handle is not present.
    fn remove_layer(&mut self, handle: LayerHandle) -> Result<(), SurfaceError>;

    /// Attach an HTML popup to a layer.
    ///
    /// # Errors
    /// Returns [`SurfaceError::UnknownLayer`] when the handle is not present.
    fn bind_popup(&mut self, handle: LayerHandle, html: &str) -> Result<(), SurfaceError>;

    /// Restack a layer above every other layer.
    ///
    /// # Errors
    /// Returns [`SurfaceError::UnknownLayer`] when the handle is not present.
    fn bring_to_front(&mut self, handle: LayerHandle) -> Result<(), SurfaceError>;

    /// Restack a layer beneath every other overlay layer.
    ///
    /// # Errors
    /// Returns [`SurfaceError::UnknownLayer`] when the handle is not present.
    fn bring_to_back(&mut self, handle: LayerHandle) -> Result<(), SurfaceError>;

    /// Release the surface. The default simply drops it.
    fn destroy(self)
    where
        Self: Sized,
    {
    }
}

/// Creates surfaces inside a container.
pub trait SurfaceFactory {
    /// Surface type produced by this factory.
    type Surface: MapSurface + fmt::Debug;

    /// Create a surface mounted in `container`.
    ///
    /// # Errors
    /// Returns [`SurfaceError::Unavailable`] when the container is not
    /// mounted.
    fn create_surface(&mut self, container: &SurfaceContainer)
    -> Result<Self::Surface, SurfaceError>;
}
