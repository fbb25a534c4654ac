//! Task id extraction from build submission output.

use crate::error::{RebuildError, Result};
use regex::Regex;
use std::sync::LazyLock;

static TASK_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Created task: (\d+)$").expect("Invalid task id regex")
});

/// Return the id from the first `Created task: <digits>` line.
///
/// Lines are trimmed before matching, so terminal carriage returns and
/// indentation do not hide a match. Matching is case-insensitive.
pub fn extract<I, S>(lines: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .find_map(|line| {
            TASK_ID_RE
                .captures(line.as_ref().trim())
                .map(|caps| caps[1].to_string())
        })
        .ok_or(RebuildError::NoTaskId)
}
