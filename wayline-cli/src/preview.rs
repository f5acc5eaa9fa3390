//! Preview command implementation for the Wayline CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wayline_core::{
    CoordinateResolver, LocationInput, MapLayerLifecycleManager, MetricsConfig, RenderOrchestrator,
    RouteMetrics, RouteMetricsCalculator, RouteView, SurfaceContainer,
};
use wayline_data::{GeoJsonSurface, GeoJsonSurfaceFactory, fs, load_registry};

use crate::{
    ARG_FROM, ARG_FROM_POSITION, ARG_OUTPUT, ARG_REGISTRY, ARG_SPEED, ARG_TO, ARG_TO_POSITION,
    CliError, ENV_FROM, ENV_TO,
};

/// Container id recorded in the exported `view` member.
pub(crate) const PREVIEW_CONTAINER: &str = "preview";
const SURFACE_UNAVAILABLE_MESSAGE: &str = "Map surface unavailable";

/// CLI arguments for the `preview` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Sketch a plausible ride path between two locations and \
                 export the map layers as a GeoJSON FeatureCollection. \
                 Names are looked up in the built-in Gothenburg registry \
                 unless a registry file is given; explicit positions take \
                 precedence over the lookup.",
    about = "Render a route preview as GeoJSON"
)]
#[ortho_config(prefix = "WAYLINE")]
pub(crate) struct PreviewArgs {
    /// Pickup location name.
    #[arg(long = ARG_FROM, value_name = "name")]
    #[serde(default)]
    pub(crate) from: Option<String>,
    /// Drop-off location name.
    #[arg(long = ARG_TO, value_name = "name")]
    #[serde(default)]
    pub(crate) to: Option<String>,
    /// Pickup position as `LAT,LNG`, used instead of the registry lookup.
    #[arg(long = ARG_FROM_POSITION, value_name = "lat,lng")]
    #[serde(default)]
    pub(crate) from_position: Option<String>,
    /// Drop-off position as `LAT,LNG`, used instead of the registry lookup.
    #[arg(long = ARG_TO_POSITION, value_name = "lat,lng")]
    #[serde(default)]
    pub(crate) to_position: Option<String>,
    /// JSON file of `{name, latitude, longitude}` entries replacing the
    /// built-in locations.
    #[arg(long = ARG_REGISTRY, value_name = "path")]
    #[serde(default)]
    pub(crate) registry: Option<Utf8PathBuf>,
    /// Average travel speed in km/h used for the ETA.
    #[arg(long = ARG_SPEED, value_name = "kmh")]
    #[serde(default)]
    pub(crate) speed: Option<f64>,
    /// Write the GeoJSON to this file instead of standard output.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl PreviewArgs {
    pub(crate) fn into_config(self) -> Result<PreviewConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PreviewConfig::try_from(merged)
    }
}

/// Resolved `preview` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PreviewConfig {
    /// Pickup location as handed to the orchestrator.
    pub(crate) origin: LocationInput,
    /// Drop-off location as handed to the orchestrator.
    pub(crate) destination: LocationInput,
    /// Registry file; the built-in registry is used when absent.
    pub(crate) registry: Option<Utf8PathBuf>,
    /// Average speed override.
    pub(crate) speed_kmh: Option<f64>,
    /// GeoJSON destination; standard output when absent.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<PreviewArgs> for PreviewConfig {
    type Error = CliError;

    fn try_from(args: PreviewArgs) -> Result<Self, Self::Error> {
        let from = args.from.ok_or(CliError::MissingArgument {
            field: ARG_FROM,
            env: ENV_FROM,
        })?;
        let to = args.to.ok_or(CliError::MissingArgument {
            field: ARG_TO,
            env: ENV_TO,
        })?;
        let origin = location_input(from, args.from_position.as_deref(), ARG_FROM_POSITION)?;
        let destination = location_input(to, args.to_position.as_deref(), ARG_TO_POSITION)?;

        if let Some(value) = args.speed
            && !(value.is_finite() && value > 0.0)
        {
            return Err(CliError::InvalidSpeed { value });
        }

        Ok(Self {
            origin,
            destination,
            registry: args.registry,
            speed_kmh: args.speed,
            output: args.output,
        })
    }
}

impl PreviewConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        self.registry
            .as_deref()
            .map_or(Ok(()), |path| Self::require_existing(path, ARG_REGISTRY))
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match fs::is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::RegistryPathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::RegistryPathNotFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectRegistryPath {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

fn location_input(
    name: String,
    position: Option<&str>,
    field: &'static str,
) -> Result<LocationInput, CliError> {
    let Some(raw) = position else {
        return Ok(LocationInput::named(name));
    };
    let (latitude, longitude) = parse_position(raw, field)?;
    Ok(LocationInput::with_position(name, latitude, longitude))
}

/// Parse `LAT,LNG`. Range checks are left to the resolver, which falls back
/// to the registry for unusable positions.
fn parse_position(raw: &str, field: &'static str) -> Result<(f64, f64), CliError> {
    let invalid = || CliError::InvalidPosition {
        field,
        value: raw.to_owned(),
    };
    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let latitude = lat.trim().parse::<f64>().map_err(|_| invalid())?;
    let longitude = lng.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok((latitude, longitude))
}

/// A rendered preview ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Preview {
    /// Exported map layers.
    pub(crate) collection: Value,
    /// One-line human summary.
    pub(crate) summary: String,
}

pub(super) fn run_preview(args: PreviewArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_preview_with(args, &mut stdout)
}

pub(super) fn run_preview_with(args: PreviewArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let preview = render_preview(&config)?;
    write_preview(writer, &config, &preview)
}

/// Run the orchestrator once over a headless GeoJSON surface.
pub(crate) fn render_preview(config: &PreviewConfig) -> Result<Preview, CliError> {
    let resolver = config
        .registry
        .as_deref()
        .map(load_registry)
        .transpose()?
        .map_or_else(CoordinateResolver::builtin, CoordinateResolver::new);
    let calculator = config
        .speed_kmh
        .map_or_else(RouteMetricsCalculator::default, |kmh| {
            RouteMetricsCalculator::with_config(MetricsConfig::default().with_average_speed(kmh))
        });
    let manager = MapLayerLifecycleManager::new(
        GeoJsonSurfaceFactory,
        SurfaceContainer::new(PREVIEW_CONTAINER),
    );
    let mut orchestrator = RenderOrchestrator::new(manager)
        .with_resolver(resolver)
        .with_calculator(calculator);

    let view = orchestrator.update(&config.origin, &config.destination)?;
    let RouteView::Rendered {
        metrics, degraded, ..
    } = *view
    else {
        return Err(CliError::NoRoute {
            message: view.placeholder().unwrap_or(SURFACE_UNAVAILABLE_MESSAGE),
        });
    };
    let summary = summary_line(config, metrics, degraded);

    let collection = orchestrator
        .layers()
        .surface()
        .map(GeoJsonSurface::to_json_value)
        .ok_or(CliError::NoRoute {
            message: SURFACE_UNAVAILABLE_MESSAGE,
        })?;
    Ok(Preview {
        collection,
        summary,
    })
}

fn summary_line(config: &PreviewConfig, metrics: RouteMetrics, degraded: bool) -> String {
    let line = format!(
        "{} → {}: {metrics}",
        config.origin.name, config.destination.name
    );
    if degraded {
        format!("{line} (approximate: unknown location replaced by the default)")
    } else {
        line
    }
}

fn write_preview(
    writer: &mut dyn Write,
    config: &PreviewConfig,
    preview: &Preview,
) -> Result<(), CliError> {
    let payload =
        serde_json::to_string_pretty(&preview.collection).map_err(CliError::SerialiseGeoJson)?;
    if let Some(path) = &config.output {
        fs::write_string(path, &payload).map_err(|source| CliError::WriteGeoJson {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote route preview to {path}");
    } else {
        writeln!(writer, "{payload}").map_err(CliError::WritePreviewOutput)?;
    }
    writeln!(writer, "{}", preview.summary).map_err(CliError::WritePreviewOutput)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PreviewConfig, CliError> {
    let merged = PreviewArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PreviewConfig::try_from(merged)
}
