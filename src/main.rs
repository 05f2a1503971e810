//! Runlock: single-instance job runner guarded by an atomic lock directory.
//!
//! This is the main entry point for the `runlock` CLI. It parses arguments,
//! sets up logging, dispatches to the appropriate command handler, and maps
//! outcomes and errors to exit codes.

mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod history;
pub mod job;
pub mod lock;
mod logging;
pub mod runner;
pub mod signals;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too, on stdout.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(exit_codes::USER_ERROR as u8)
            } else {
                ExitCode::from(exit_codes::SUCCESS as u8)
            };
        }
    };

    if let Err(err) = logging::init_logging(cli.log_level) {
        eprintln!("Warning: {}", err);
    }

    match commands::dispatch(cli.command_or_default(), cli.config.as_deref()) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
