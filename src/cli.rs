//! CLI argument parsing for rebuilder.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Rebuild a package in many dist-git branches.
///
/// Each branch is checked out in turn, reset to match the branch that was
/// checked out at start (unless --no-rebase is given), and built. The
/// original branch is checked out again at the end.
#[derive(Parser, Debug)]
#[command(name = "rebuilder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Do not reset branches to match the current branch.
    #[arg(long, global = true)]
    pub no_rebase: bool,

    /// Path to a YAML config file (default: $REBUILDER_CONFIG, then built-ins).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print debug logs.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for rebuilder.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit real builds and wait for them to finish.
    Build(BranchArgs),

    /// Submit scratch builds and wait for them to finish.
    Scratch(ScratchArgs),

    /// Build locally in mock, one branch at a time.
    Mock(BranchArgs),

    /// SRPM scratch build, push, scratch build, then real build.
    ///
    /// Stops at the first step that fails.
    Release(BranchArgs),
}

/// Branches to operate on.
#[derive(Args, Debug)]
pub struct BranchArgs {
    /// Branches to build, in order.
    #[arg(value_name = "BRANCH", required = true, num_args = 1..)]
    pub branches: Vec<String>,
}

/// Arguments for the `scratch` command.
#[derive(Args, Debug)]
pub struct ScratchArgs {
    /// Build only a source package from the local checkout.
    #[arg(long)]
    pub srpm: bool,

    #[command(flatten)]
    pub branch: BranchArgs,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
