//! Exit code constants for the rebuilder CLI.
//!
//! A completed run exits with its failure count, so 0 is full success and
//! small positive values are the number of counted failures. Errors that abort
//! a run before it completes use the fixed codes below:
//! - 1: User error (bad args, bad config, unknown toolset)
//! - 3: Git operation failure
//! - 4: External command could not be run

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid config, or unknown remote host.
pub const USER_ERROR: i32 = 1;

/// Git operation failure: query, checkout, or reset errors.
pub const GIT_FAILURE: i32 = 3;

/// External command could not be spawned or its output could not be read.
pub const COMMAND_FAILURE: i32 = 4;

/// Exit status used when a release pipeline step fails.
pub const RELEASE_STEP_FAILURE: i32 = 1;

/// Convert an aggregate failure count into a process exit status.
///
/// Counts above 255 saturate, since the OS truncates the status to one byte
/// and a wrapped count could read as success.
pub fn from_failure_count(failures: u32) -> u8 {
    u8::try_from(failures).unwrap_or(u8::MAX)
}
