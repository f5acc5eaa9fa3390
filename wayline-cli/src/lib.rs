//! Command-line interface for previewing Wayline routes offline.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod preview;

pub use error::CliError;
use preview::{PreviewArgs, run_preview};

pub(crate) const ARG_FROM: &str = "from";
pub(crate) const ARG_TO: &str = "to";
pub(crate) const ARG_FROM_POSITION: &str = "from-position";
pub(crate) const ARG_TO_POSITION: &str = "to-position";
pub(crate) const ARG_REGISTRY: &str = "registry";
pub(crate) const ARG_SPEED: &str = "speed";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_FROM: &str = "WAYLINE_CMDS_PREVIEW_FROM";
pub(crate) const ENV_TO: &str = "WAYLINE_CMDS_PREVIEW_TO";

/// Run the Wayline CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration or the preview itself
/// fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Preview(args) => run_preview(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wayline",
    about = "Sketch ride routes between known locations without a routing service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a route preview as GeoJSON with a distance and ETA summary.
    Preview(PreviewArgs),
}

#[cfg(test)]
mod tests;
