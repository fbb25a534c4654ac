//! Git command runner for rebuilder.
//!
//! Provides a typed wrapper around the handful of git commands rebuilder
//! needs, with structured error handling. All git operations should go
//! through this module.

use crate::error::{RebuildError, Result};
use crate::process::{CommandOutput, Runner};

/// Git operations on the working tree the runner points at.
pub struct Git<'a> {
    runner: &'a dyn Runner,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn Runner) -> Self {
        Self { runner }
    }

    /// Run a git query, mapping a non-zero exit to [`RebuildError::GitError`].
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.runner.output("git", args)?;

        if output.success() {
            Ok(output)
        } else {
            let error_msg = if output.stderr.is_empty() {
                &output.stdout
            } else {
                &output.stderr
            };

            Err(RebuildError::GitError(format!(
                "git {} failed (exit code {}): {}",
                args.first().unwrap_or(&""),
                output.exit_code,
                error_msg
            )))
        }
    }

    /// Name of the currently checked-out branch.
    ///
    /// A detached HEAD is rejected: there would be no branch to return to.
    pub fn current_branch(&self) -> Result<String> {
        let output = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = output.stdout;

        if branch == "HEAD" {
            return Err(RebuildError::UserError(
                "HEAD is detached. Check out the branch to rebuild from and try again."
                    .to_string(),
            ));
        }

        Ok(branch)
    }

    /// Check out `branch` in the working tree.
    pub fn checkout(&self, branch: &str) -> Result<()> {
        let output = self.runner.output("git", &["checkout", branch])?;

        if output.success() {
            Ok(())
        } else {
            Err(RebuildError::CheckoutError {
                branch: branch.to_string(),
                message: if output.stderr.is_empty() {
                    format!("git checkout exited with code {}", output.exit_code)
                } else {
                    output.stderr
                },
            })
        }
    }

    /// Returns true if the trees of `a` and `b` differ.
    pub fn differs(&self, a: &str, b: &str) -> Result<bool> {
        let output = self.run(&["diff", a, b])?;
        Ok(!output.stdout.is_empty())
    }

    /// Reset the current branch and working tree to `reference`.
    pub fn reset_hard(&self, reference: &str) -> Result<()> {
        self.run(&["reset", "--hard", reference])?;
        Ok(())
    }

    /// Name of the remote `branch` tracks.
    pub fn branch_remote(&self, branch: &str) -> Result<String> {
        let key = format!("branch.{}.remote", branch);
        let output = self.run(&["config", "--get", &key]).map_err(|e| {
            RebuildError::GitError(format!(
                "branch '{}' does not track a remote: {}",
                branch, e
            ))
        })?;
        Ok(output.stdout)
    }

    /// URL configured for `remote`.
    pub fn remote_url(&self, remote: &str) -> Result<String> {
        let output = self.run(&["remote", "get-url", remote])?;
        Ok(output.stdout)
    }

    /// Push `branches` to `remote` with output attached to the terminal.
    ///
    /// Returns the exit code; a rejected push is a pipeline failure, not an
    /// error.
    pub fn push(&self, remote: &str, branches: &[String]) -> Result<i32> {
        let mut args = vec!["push", remote];
        args.extend(branches.iter().map(String::as_str));
        self.runner.status("git", &args)
    }
}
