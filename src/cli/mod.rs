// CLI module
// Argument parsing and the interactive menu loop

mod args;
mod menu;

pub use args::CliArgs;
pub use menu::{Flow, Menu};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Invalid arguments and `--help` are handled by clap, which prints the
/// message and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
