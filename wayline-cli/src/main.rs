//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use wayline_cli::{CliError, run};

#[expect(
    clippy::print_stderr,
    reason = "fatal errors are reported on stderr before exiting"
)]
fn main() {
    match run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("wayline: {err}");
            std::process::exit(1);
        }
    }
}
