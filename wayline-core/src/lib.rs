//! Core domain logic for Wayline ride previews.
//!
//! Wayline sketches a plausible ride path between two locations when no
//! routing service is available, then keeps a map surface in step with the
//! selected endpoints.
//!
//! Responsibilities:
//! - Resolve location inputs to validated coordinates.
//! - Generate deterministic waypoint sequences and ride metrics.
//! - Choose a viewport framing both endpoints.
//! - Own every layer drawn on the map surface and sweep it before redrawing.
//!
//! Boundaries:
//! - Map backends plug in through [`MapSurface`] and [`SurfaceFactory`].
//! - No I/O, threads or timers; adapters live in `wayline-data`.

#![forbid(unsafe_code)]

mod coordinate;
mod geometry;
pub mod layers;
mod metrics;
mod orchestrator;
pub mod resolver;
pub mod surface;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
mod viewport;

pub use coordinate::{
    Coordinate, CoordinateError, LATITUDE_RANGE, LONGITUDE_RANGE, LocationInput, NamedLocation,
    RawCoordinate,
};
pub use geometry::{GeometryConfig, GeometryConfigError, RouteGeometryGenerator, Waypoints};
pub use layers::{
    Embedding, LayerError, LayerKind, MapLayer, MapLayerLifecycleManager, RenderReport,
    RouteLabels, RouteStyle, TeardownPolicy,
};
pub use metrics::{
    EARTH_RADIUS_KM, MetricsConfig, RouteMetrics, RouteMetricsCalculator, haversine_km,
};
pub use orchestrator::{
    RenderError, RenderOrchestrator, RouteKey, RouteView, SELECT_ROUTE_MESSAGE,
    UNKNOWN_LOCATION_MESSAGE,
};
pub use resolver::{
    CoordinateResolver, LocationRegistry, RegistryError, Resolution, ResolutionSource,
    ResolverConfig,
};
pub use surface::{
    LayerHandle, MapSurface, MarkerIcon, MarkerOptions, PolylineOptions, SurfaceContainer,
    SurfaceError, SurfaceFactory,
};
pub use viewport::{MapViewportController, ViewportSpec, ZoomStep, ZoomTable, ZoomTableError};
