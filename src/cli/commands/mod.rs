//! CLI command implementations

mod analyze;
mod generate;
mod interactive;
mod sweep;

use crate::cli::{Cli, Command};
use crate::client::DEFAULT_HOST;

/// Execute a CLI command based on the parsed arguments
///
/// # Errors
///
/// Returns the first fatal error of the command: invalid input, an
/// unreachable service for single generations, an unreadable results file,
/// or a results file that could not be written at the end of a sweep.
pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Generate(args) => {
            generate::run_generate(args, cli.host.as_deref().unwrap_or(DEFAULT_HOST))
        }
        Command::Interactive => {
            interactive::run_interactive(cli.host.as_deref().unwrap_or(DEFAULT_HOST))
        }
        Command::Sweep(args) => sweep::run_sweep(args, cli.host),
        Command::Analyze(args) => analyze::run_analyze(args),
    }
}
