//! Error types emitted by the Wayline CLI.
//!
//! Keep this error type reasonably small, as the command helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use wayline_core::RenderError;
use wayline_data::RegistryFileError;

/// Errors emitted by the Wayline CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A position option is not a `LAT,LNG` pair of numbers.
    #[error("{field} value {value:?} is not a LAT,LNG pair")]
    InvalidPosition {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Value as given.
        value: String,
    },
    /// The average speed is not a positive number.
    #[error("speed must be a positive number of km/h, got {value}")]
    InvalidSpeed {
        /// Value as given.
        value: f64,
    },
    /// The registry path does not name an existing regular file.
    #[error("registry {path:?} is not an existing file (set --{field})")]
    RegistryPathNotFile {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// The registry path could not be inspected.
    #[error("failed to inspect registry {path:?}: {source}")]
    InspectRegistryPath {
        /// Path as configured.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Loading the location registry failed.
    #[error("failed to load location registry: {0}")]
    LoadRegistry(#[from] RegistryFileError),
    /// Drawing the route failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// No route could be drawn for the selected pair.
    #[error("no route to preview: {message}")]
    NoRoute {
        /// Placeholder text the map would show instead.
        message: &'static str,
    },
    /// Serialising the GeoJSON collection failed.
    #[error("failed to serialise GeoJSON: {0}")]
    SerialiseGeoJson(#[source] serde_json::Error),
    /// Writing the GeoJSON file failed.
    #[error("failed to write GeoJSON to {path:?}: {source}")]
    WriteGeoJson {
        /// Requested output file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Writing to standard output failed.
    #[error("failed to write preview output: {0}")]
    WritePreviewOutput(#[source] std::io::Error),
}
