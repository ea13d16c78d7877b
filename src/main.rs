//! Latch: advisory file-based lock coordination.
//!
//! This is the main entry point for the `latch` CLI. It parses arguments,
//! dispatches to the command layer, and maps errors to exit codes.

mod cli;
mod commands;
pub mod controller;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod store;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
