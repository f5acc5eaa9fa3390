//! Adapters between the Wayline core and the outside world.
//!
//! Responsibilities:
//! - Load location registries from JSON files.
//! - Provide a headless map surface that exports GeoJSON.
//! - Wrap capability-based file access for the CLI.
//!
//! Boundaries:
//! - Do not encode routing or layer rules (live in `wayline-core`).
//!
//! Invariants:
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod fs;
pub mod geojson;
pub mod registry;

pub use geojson::{GeoJsonSurface, GeoJsonSurfaceFactory};
pub use registry::{RegistryFileError, load_registry, parse_registry};
