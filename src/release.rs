//! Release pipeline: validate, push, validate again, build.
//!
//! Each step runs only if the previous one had no failures. The first
//! failing step is reported and ends the pipeline.

use crate::error::Result;
use crate::git::Git;
use crate::orchestrator::{RebuildOrchestrator, Submission};
use crate::process::Runner;
use crate::report::{Event, Reporter};

/// A step of the release pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStep {
    /// Scratch build of a source package made from the local checkout.
    SrpmScratch,
    /// Push all branches to dist-git.
    Push,
    /// Scratch build from the pushed commits.
    ScmScratch,
    /// Real build.
    Build,
}

impl ReleaseStep {
    pub const ALL: [ReleaseStep; 4] = [
        ReleaseStep::SrpmScratch,
        ReleaseStep::Push,
        ReleaseStep::ScmScratch,
        ReleaseStep::Build,
    ];

    /// Message reported when this step fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            ReleaseStep::SrpmScratch => "SRPM scratch build failed",
            ReleaseStep::Push => "Failed to push to dist-git",
            ReleaseStep::ScmScratch => "SCM scratch build failed",
            ReleaseStep::Build => "Build failed",
        }
    }
}

/// Outcome of a release run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    /// The pipeline stopped at this step.
    Failed(ReleaseStep),
}

/// Runs the four release steps against one orchestrator.
pub struct ReleasePipeline<'a> {
    orchestrator: &'a RebuildOrchestrator<'a>,
    runner: &'a dyn Runner,
    reporter: &'a dyn Reporter,
    push_remote: &'a str,
}

impl<'a> ReleasePipeline<'a> {
    pub fn new(
        orchestrator: &'a RebuildOrchestrator<'a>,
        runner: &'a dyn Runner,
        reporter: &'a dyn Reporter,
        push_remote: &'a str,
    ) -> Self {
        Self {
            orchestrator,
            runner,
            reporter,
            push_remote,
        }
    }

    /// Release `branches`, stopping at the first step that fails.
    ///
    /// # Errors
    ///
    /// Plumbing errors from any step propagate unchanged; later steps do not run.
    pub fn release(&self, branches: &[String], rebase: bool) -> Result<ReleaseOutcome> {
        for step in ReleaseStep::ALL {
            let failures = self.run_step(step, branches, rebase)?;
            if failures != 0 {
                tracing::debug!(?step, failures, "release step failed");
                self.reporter.error(step.failure_message());
                return Ok(ReleaseOutcome::Failed(step));
            }
        }

        self.reporter
            .info(&format!("Released {}", branches.join(" ")));
        Ok(ReleaseOutcome::Released)
    }

    fn run_step(&self, step: ReleaseStep, branches: &[String], rebase: bool) -> Result<u32> {
        match step {
            ReleaseStep::SrpmScratch => {
                self.orchestrator
                    .run(branches, rebase, Submission::Scratch { srpm: true })
            }
            ReleaseStep::Push => self.push(branches),
            ReleaseStep::ScmScratch => {
                self.orchestrator
                    .run(branches, rebase, Submission::Scratch { srpm: false })
            }
            ReleaseStep::Build => self.orchestrator.run(branches, rebase, Submission::Build),
        }
    }

    fn push(&self, branches: &[String]) -> Result<u32> {
        let mut args = vec!["push", self.push_remote];
        args.extend(branches.iter().map(String::as_str));
        self.reporter.report(Event::command("git", &args));

        let exit_code = Git::new(self.runner).push(self.push_remote, branches)?;
        Ok(u32::from(exit_code != 0))
    }
}
