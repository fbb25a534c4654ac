//! Build submission for a single branch.

use crate::error::{RebuildError, Result};
use crate::git::Git;
use crate::process::Runner;
use crate::report::{Event, Reporter};
use crate::switcher::switch_to;
use crate::task_id;

/// Outcome of submitting one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    /// Task created by the submission, if one could be found in its output.
    pub task_id: Option<String>,
}

/// Switches to a branch and submits a build from it.
pub struct BuildDispatcher<'a> {
    runner: &'a dyn Runner,
    reporter: &'a dyn Reporter,
}

impl<'a> BuildDispatcher<'a> {
    pub fn new(runner: &'a dyn Runner, reporter: &'a dyn Reporter) -> Self {
        Self { runner, reporter }
    }

    /// Submit `command` from `branch`.
    ///
    /// The submission's exit code is not checked: a missing task id in the
    /// output is the failure signal, and it is reported rather than returned
    /// as an error. A submission tool that cannot be started at all is
    /// reported the same way and yields no task id.
    ///
    /// # Errors
    ///
    /// Only branch switching failures.
    pub fn dispatch(
        &self,
        branch: &str,
        rebase_reference: Option<&str>,
        command: &[String],
    ) -> Result<DispatchResult> {
        let (program, args) = command.split_first().ok_or_else(|| {
            RebuildError::UserError("build submission command is empty".to_string())
        })?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        switch_to(&Git::new(self.runner), self.reporter, branch, rebase_reference)?;

        self.reporter.report(Event::command(program, &args));
        let captured = match self.runner.capture(program, &args) {
            Ok(captured) => captured,
            Err(RebuildError::CommandError(message)) => {
                tracing::debug!(branch, %message, "submission could not be run");
                self.reporter.error(&message);
                return Ok(DispatchResult { task_id: None });
            }
            Err(e) => return Err(e),
        };
        if captured.exit_code != 0 {
            tracing::debug!(branch, exit_code = captured.exit_code, "submission exited non-zero");
        }

        let task_id = match task_id::extract(&captured.lines) {
            Ok(id) => {
                tracing::debug!(branch, task_id = %id, "submission created task");
                Some(id)
            }
            Err(e) => {
                self.reporter.error(&e.to_string());
                None
            }
        };

        Ok(DispatchResult { task_id })
    }
}
