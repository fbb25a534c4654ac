//! Error types for the rebuilder CLI.
//!
//! Uses thiserror for derive macros. Build and watch failures are not errors:
//! they are counted by the orchestrator. Only plumbing failures (version
//! control queries, checkouts, missing tools, bad configuration) end up here.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for rebuilder operations.
#[derive(Error, Debug)]
pub enum RebuildError {
    /// User provided invalid arguments or the repository is in an unusable state.
    #[error("{0}")]
    UserError(String),

    /// Configuration file could not be read, parsed, or validated.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A version-control query exited non-zero.
    #[error("Git operation failed: {0}")]
    GitError(String),

    /// Switching the working tree to a branch failed.
    #[error("Failed to check out '{branch}': {message}")]
    CheckoutError { branch: String, message: String },

    /// The remote host tracked by the current branch has no registered toolset.
    #[error("No toolset known for remote host '{0}'")]
    UnknownToolset(String),

    /// Submission output did not contain a task-creation line.
    #[error("No task id found.")]
    NoTaskId,

    /// An external command could not be started or its output could not be read.
    #[error("Command failed: {0}")]
    CommandError(String),
}

impl RebuildError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RebuildError::UserError(_)
            | RebuildError::ConfigError(_)
            | RebuildError::UnknownToolset(_)
            | RebuildError::NoTaskId => exit_codes::USER_ERROR,
            RebuildError::GitError(_) | RebuildError::CheckoutError { .. } => {
                exit_codes::GIT_FAILURE
            }
            RebuildError::CommandError(_) => exit_codes::COMMAND_FAILURE,
        }
    }
}

/// Result type alias for rebuilder operations.
pub type Result<T> = std::result::Result<T, RebuildError>;
