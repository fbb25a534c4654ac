//! Toolset selection.
//!
//! Which package tool and build-system client apply depends on the dist-git
//! service the current branch tracks. The host of the tracked remote's URL is
//! looked up in a [`ToolRegistry`] built from configuration.

use crate::config::{Config, ToolEntry};
use crate::error::{RebuildError, Result};
use crate::git::Git;
use std::collections::BTreeMap;

/// Tools used for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    /// Package tool that submits builds (`fedpkg`, `rhpkg`).
    pub submission_tool: String,
    /// Build-system client that watches tasks (`koji`, `brew`).
    pub watch_tool: String,
}

impl From<&ToolEntry> for ToolSet {
    fn from(entry: &ToolEntry) -> Self {
        Self {
            submission_tool: entry.submit.clone(),
            watch_tool: entry.watch.clone(),
        }
    }
}

/// Hostname to toolset mapping.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolSet>,
}

impl ToolRegistry {
    pub fn from_config(config: &Config) -> Self {
        config
            .tools
            .iter()
            .fold(Self::default(), |registry, (host, entry)| {
                registry.with(host, ToolSet::from(entry))
            })
    }

    /// Register `toolset` for `host`, replacing any previous entry.
    pub fn with(mut self, host: &str, toolset: ToolSet) -> Self {
        self.tools.insert(host.to_lowercase(), toolset);
        self
    }

    pub fn get(&self, host: &str) -> Option<&ToolSet> {
        self.tools.get(&host.to_lowercase())
    }
}

/// Determines the toolset for a branch from the remote it tracks.
pub struct ToolResolver {
    registry: ToolRegistry,
}

impl ToolResolver {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the toolset for `branch`.
    ///
    /// # Errors
    ///
    /// * `RebuildError::GitError` - the branch has no tracked remote, or the
    ///   remote has no URL
    /// * `RebuildError::UnknownToolset` - the remote host is not registered
    pub fn resolve(&self, git: &Git<'_>, branch: &str) -> Result<ToolSet> {
        let remote = git.branch_remote(branch)?;
        let url = git.remote_url(&remote)?;
        let host = remote_host(&url);
        tracing::debug!(branch, remote = %remote, url = %url, host = %host, "resolving toolset");

        self.registry
            .get(&host)
            .cloned()
            .ok_or(RebuildError::UnknownToolset(host))
    }
}

/// Extract the host component of a remote URL.
///
/// Handles `scheme://[user@]host[:port]/path` as well as the scp-like
/// `[user@]host:path` form. Anything that yields no host returns an empty
/// string, which never matches a registry entry.
pub fn remote_host(url: &str) -> String {
    let url = url.trim();

    let authority = if let Some((_, rest)) = url.split_once("://") {
        rest.split('/').next().unwrap_or("")
    } else if let Some((authority, _)) = url.split_once(':')
        && !authority.contains('/')
    {
        authority
    } else {
        ""
    };

    // Only the last '@' separates user-info from the host.
    let host_port = authority.rsplit('@').next().unwrap_or("");

    let host = if let Some(bracketed) = host_port.strip_prefix('[') {
        bracketed.split(']').next().unwrap_or("")
    } else if url.contains("://") {
        host_port.split(':').next().unwrap_or("")
    } else {
        host_port
    };

    host.to_lowercase()
}
