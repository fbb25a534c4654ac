//! Command implementations for rebuilder.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command returns the process exit status: the
//! failure count for build, scratch and mock, a step failure for release.

mod release;

use crate::cli::{BranchArgs, Cli, Command, ScratchArgs};
use crate::config::Config;
use crate::error::{RebuildError, Result};
use crate::exit_codes;
use crate::orchestrator::{RebuildOrchestrator, Submission};
use crate::process::SystemRunner;
use crate::report::ConsoleReporter;
use crate::toolset::{ToolRegistry, ToolResolver};

/// Everything a command needs, built once per invocation.
pub struct RunContext {
    pub config: Config,
    pub runner: SystemRunner,
    pub reporter: ConsoleReporter,
    pub resolver: ToolResolver,
    pub rebase: bool,
}

impl RunContext {
    /// Build the context for the repository in the current directory.
    pub fn from_cli(cli: &Cli, color: bool) -> Result<Self> {
        let config = Config::resolve(cli.config.as_deref())?;
        let cwd = std::env::current_dir().map_err(|e| {
            RebuildError::UserError(format!("failed to determine current directory: {}", e))
        })?;

        Ok(Self {
            runner: SystemRunner::new(cwd, config.capture.clone()),
            reporter: ConsoleReporter::new(color),
            resolver: ToolResolver::new(ToolRegistry::from_config(&config)),
            rebase: !cli.no_rebase,
            config,
        })
    }

    pub fn orchestrator(&self) -> RebuildOrchestrator<'_> {
        RebuildOrchestrator::new(&self.runner, &self.reporter, &self.resolver)
    }
}

/// Dispatch a command to its implementation.
///
/// Returns the exit status for the process.
pub fn dispatch(ctx: &RunContext, command: Command) -> Result<u8> {
    match command {
        Command::Build(args) => cmd_build(ctx, args),
        Command::Scratch(args) => cmd_scratch(ctx, args),
        Command::Mock(args) => cmd_mock(ctx, args),
        Command::Release(args) => release::cmd_release(ctx, args),
    }
}

fn cmd_build(ctx: &RunContext, args: BranchArgs) -> Result<u8> {
    let failures = ctx
        .orchestrator()
        .run(&args.branches, ctx.rebase, Submission::Build)?;
    Ok(exit_codes::from_failure_count(failures))
}

fn cmd_scratch(ctx: &RunContext, args: ScratchArgs) -> Result<u8> {
    let submission = Submission::Scratch { srpm: args.srpm };
    let failures = ctx
        .orchestrator()
        .run(&args.branch.branches, ctx.rebase, submission)?;
    Ok(exit_codes::from_failure_count(failures))
}

fn cmd_mock(ctx: &RunContext, args: BranchArgs) -> Result<u8> {
    let failures = ctx.orchestrator().run_mock(&args.branches, ctx.rebase)?;
    Ok(exit_codes::from_failure_count(failures))
}
