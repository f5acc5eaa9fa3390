//! Facade crate for the Wayline ride-preview engine.
//!
//! This crate re-exports the core domain types and exposes the GeoJSON map
//! surface and registry loader behind the `geojson` feature.

#![forbid(unsafe_code)]

pub use wayline_core::{
    Coordinate, CoordinateError, CoordinateResolver, Embedding, LayerError, LayerHandle,
    LayerKind, LocationInput, LocationRegistry, MapLayer, MapLayerLifecycleManager, MapSurface,
    MapViewportController, MarkerIcon, MarkerOptions, MetricsConfig, NamedLocation,
    PolylineOptions, RawCoordinate, RegistryError, RenderError, RenderOrchestrator, RenderReport,
    Resolution, ResolutionSource, ResolverConfig, RouteGeometryGenerator, RouteKey, RouteLabels,
    RouteMetrics, RouteMetricsCalculator, RouteStyle, RouteView, SurfaceContainer, SurfaceError,
    SurfaceFactory, TeardownPolicy, ViewportSpec, Waypoints, ZoomTable,
};

#[cfg(feature = "geojson")]
pub use wayline_data::{
    GeoJsonSurface, GeoJsonSurfaceFactory, RegistryFileError, load_registry, parse_registry,
};
