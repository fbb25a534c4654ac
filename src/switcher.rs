//! Branch switching with optional rebase-to-origin.

use crate::error::Result;
use crate::git::Git;
use crate::report::{Event, Reporter};

/// Check out `branch`, then force it level with `rebase_reference` if given.
///
/// The reset is destructive: commits unique to `branch` are discarded. When
/// the two trees are already identical nothing is reset.
///
/// # Errors
///
/// * `RebuildError::CheckoutError` - the checkout itself failed
/// * `RebuildError::GitError` - the diff or reset failed
pub fn switch_to(
    git: &Git<'_>,
    reporter: &dyn Reporter,
    branch: &str,
    rebase_reference: Option<&str>,
) -> Result<()> {
    reporter.report(Event::BranchSwitch {
        branch: branch.to_string(),
    });
    git.checkout(branch)?;

    if let Some(reference) = rebase_reference
        && git.differs(branch, reference)?
    {
        reporter.report(Event::RebaseReset {
            branch: branch.to_string(),
            reference: reference.to_string(),
        });
        git.reset_hard(reference)?;
    }

    Ok(())
}
