//! The rebuild loop.
//!
//! [`RebuildOrchestrator`] walks the requested branches one at a time, since
//! the working tree can only have one branch checked out. Remote builds are
//! submitted without waiting, their task ids collected, and the watch tool is
//! run once on the whole batch. Mock builds run locally and synchronously.
//!
//! Whatever happens inside the loop, the branch that was checked out when the
//! run started is checked out again before the run returns (see
//! [`RestoreGuard`]). Failures of individual builds are counted, not raised;
//! only plumbing failures (git queries, checkouts, missing programs)
//! propagate as errors.

use crate::dispatch::BuildDispatcher;
use crate::error::Result;
use crate::git::Git;
use crate::process::Runner;
use crate::report::{Event, Reporter};
use crate::switcher::switch_to;
use crate::toolset::{ToolResolver, ToolSet};

/// Kind of remote build to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Real build, published to the build system.
    Build,
    /// Scratch build; with `srpm` only the source package is built from the
    /// local checkout.
    Scratch { srpm: bool },
}

impl Submission {
    /// Arguments passed to the submission tool.
    pub fn args(self) -> Vec<&'static str> {
        match self {
            Submission::Build => vec!["build", "--nowait"],
            Submission::Scratch { srpm: false } => vec!["scratch-build", "--nowait"],
            Submission::Scratch { srpm: true } => vec!["scratch-build", "--nowait", "--srpm"],
        }
    }
}

/// Mutable state of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub original_branch: String,
    /// Branch every target is reset to, when rebasing is enabled.
    pub rebase_target: Option<String>,
    pub collected_task_ids: Vec<String>,
    pub failures: u32,
}

impl RunState {
    fn new(original_branch: String, rebase: bool) -> Self {
        Self {
            rebase_target: rebase.then(|| original_branch.clone()),
            original_branch,
            collected_task_ids: Vec::new(),
            failures: 0,
        }
    }
}

/// Checks out the original branch again when a run ends.
///
/// Call [`RestoreGuard::restore`] on every normal path so a failed restore
/// surfaces as an error. If the guard is dropped without that (a panic while
/// unwinding), the restore is still attempted and a failure is reported.
pub struct RestoreGuard<'a> {
    runner: &'a dyn Runner,
    reporter: &'a dyn Reporter,
    original_branch: String,
    restored: bool,
}

impl<'a> RestoreGuard<'a> {
    pub fn new(runner: &'a dyn Runner, reporter: &'a dyn Reporter, original_branch: &str) -> Self {
        Self {
            runner,
            reporter,
            original_branch: original_branch.to_string(),
            restored: false,
        }
    }

    /// Check out the original branch, without rebasing.
    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        self.switch_back()
    }

    fn switch_back(&self) -> Result<()> {
        let result = switch_to(
            &Git::new(self.runner),
            self.reporter,
            &self.original_branch,
            None,
        );
        if let Err(e) = &result {
            self.reporter.error(&format!(
                "Could not return to branch '{}': {}",
                self.original_branch, e
            ));
        }
        result
    }
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.switch_back();
        }
    }
}

/// Runs builds across branches and aggregates failures.
pub struct RebuildOrchestrator<'a> {
    runner: &'a dyn Runner,
    reporter: &'a dyn Reporter,
    resolver: &'a ToolResolver,
}

impl<'a> RebuildOrchestrator<'a> {
    pub fn new(
        runner: &'a dyn Runner,
        reporter: &'a dyn Reporter,
        resolver: &'a ToolResolver,
    ) -> Self {
        Self {
            runner,
            reporter,
            resolver,
        }
    }

    /// Submit `submission` on every branch, then watch the created tasks.
    ///
    /// Returns the failure count: 1 if no task was created at all, otherwise
    /// 1 if the watch tool reported a failure, otherwise 0.
    pub fn run(&self, branches: &[String], rebase: bool, submission: Submission) -> Result<u32> {
        let (mut state, toolset) = self.start(rebase)?;
        let guard = RestoreGuard::new(self.runner, self.reporter, &state.original_branch);

        let outcome = self.dispatch_and_watch(&mut state, &toolset, branches, submission);
        finish(outcome, guard.restore(), &state)
    }

    /// Run a local mock build on every branch.
    ///
    /// Returns the number of branches whose mock build failed.
    pub fn run_mock(&self, branches: &[String], rebase: bool) -> Result<u32> {
        let (mut state, toolset) = self.start(rebase)?;
        let guard = RestoreGuard::new(self.runner, self.reporter, &state.original_branch);

        let outcome = self.mock_all(&mut state, &toolset, branches);
        finish(outcome, guard.restore(), &state)
    }

    /// Detect the original branch and the toolset. Nothing has been switched
    /// yet, so failures here need no restore.
    fn start(&self, rebase: bool) -> Result<(RunState, ToolSet)> {
        let git = Git::new(self.runner);
        let original_branch = git.current_branch()?;
        let toolset = self.resolver.resolve(&git, &original_branch)?;
        tracing::debug!(
            original_branch = %original_branch,
            submission_tool = %toolset.submission_tool,
            watch_tool = %toolset.watch_tool,
            rebase,
            "starting run"
        );
        Ok((RunState::new(original_branch, rebase), toolset))
    }

    fn dispatch_and_watch(
        &self,
        state: &mut RunState,
        toolset: &ToolSet,
        branches: &[String],
        submission: Submission,
    ) -> Result<()> {
        let mut command = vec![toolset.submission_tool.clone()];
        command.extend(submission.args().into_iter().map(String::from));

        let dispatcher = BuildDispatcher::new(self.runner, self.reporter);
        for branch in branches {
            let result = dispatcher.dispatch(branch, state.rebase_target.as_deref(), &command)?;
            if let Some(task_id) = result.task_id {
                state.collected_task_ids.push(task_id);
            }
        }

        if state.collected_task_ids.is_empty() {
            self.reporter.warning("No tasks to watch.");
            state.failures += 1;
            return Ok(());
        }

        self.reporter.report(Event::WatchRun {
            tool: toolset.watch_tool.clone(),
            task_ids: state.collected_task_ids.clone(),
        });
        let mut args = vec!["watch-task"];
        args.extend(state.collected_task_ids.iter().map(String::as_str));
        let exit_code = self.runner.status(&toolset.watch_tool, &args)?;
        if exit_code != 0 {
            self.reporter
                .error("Some packages failed to build successfully.");
            state.failures += 1;
        }

        Ok(())
    }

    fn mock_all(&self, state: &mut RunState, toolset: &ToolSet, branches: &[String]) -> Result<()> {
        let args = ["mockbuild", "-N"];
        let git = Git::new(self.runner);

        for branch in branches {
            switch_to(&git, self.reporter, branch, state.rebase_target.as_deref())?;
            self.reporter
                .report(Event::command(&toolset.submission_tool, &args));
            let exit_code = self.runner.status(&toolset.submission_tool, &args)?;
            if exit_code != 0 {
                self.reporter
                    .error(&format!("Failed to build for {}", branch));
                state.failures += 1;
            }
        }

        Ok(())
    }
}

/// Combine the loop outcome with the restore outcome. A loop error wins; the
/// restore failure has already been reported in that case.
fn finish(outcome: Result<()>, restored: Result<()>, state: &RunState) -> Result<u32> {
    outcome?;
    restored?;
    tracing::debug!(
        failures = state.failures,
        tasks = state.collected_task_ids.len(),
        "run finished"
    );
    Ok(state.failures)
}
