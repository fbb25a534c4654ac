//! Implementation of the `rebuilder release` command.

use super::RunContext;
use crate::cli::BranchArgs;
use crate::error::Result;
use crate::exit_codes;
use crate::release::{ReleaseOutcome, ReleasePipeline};

pub fn cmd_release(ctx: &RunContext, args: BranchArgs) -> Result<u8> {
    let orchestrator = ctx.orchestrator();
    let pipeline = ReleasePipeline::new(
        &orchestrator,
        &ctx.runner,
        &ctx.reporter,
        &ctx.config.push_remote,
    );

    match pipeline.release(&args.branches, ctx.rebase)? {
        ReleaseOutcome::Released => Ok(exit_codes::SUCCESS as u8),
        ReleaseOutcome::Failed(_) => Ok(exit_codes::RELEASE_STEP_FAILURE as u8),
    }
}
