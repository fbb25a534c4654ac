//! Rebuilder: rebuild a dist-git package across many branches.
//!
//! This is the main entry point for the `rebuilder` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod exit_codes;
pub mod git;
pub mod orchestrator;
pub mod process;
pub mod release;
pub mod report;
pub mod switcher;
pub mod task_id;
pub mod telemetry;
pub mod toolset;

#[cfg(test)]
mod test_support;

use cli::Cli;
use commands::RunContext;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let color = report::color_enabled(cli.no_color, std::env::var_os("NO_COLOR"));
    telemetry::init_tracing(telemetry::level_for(cli.verbose), color);

    let result = RunContext::from_cli(&cli, color)
        .and_then(|ctx| commands::dispatch(&ctx, cli.command));

    match result {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
