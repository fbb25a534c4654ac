//! Supporting types for configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Host of the Fedora dist-git service.
pub const FEDORA_DIST_GIT: &str = "pkgs.fedoraproject.org";

/// Host of the internal Red Hat dist-git service.
pub const RHEL_DIST_GIT: &str = "pkgs.devel.redhat.com";

/// Tool pair configured for one dist-git host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEntry {
    /// Package tool used to submit builds (e.g. `fedpkg`).
    pub submit: String,
    /// Build-system client used to watch tasks (e.g. `koji`).
    pub watch: String,
}

impl ToolEntry {
    pub fn new(submit: impl Into<String>, watch: impl Into<String>) -> Self {
        Self {
            submit: submit.into(),
            watch: watch.into(),
        }
    }
}

/// Built-in host to toolset mapping.
pub fn default_tools() -> BTreeMap<String, ToolEntry> {
    BTreeMap::from([
        (
            FEDORA_DIST_GIT.to_string(),
            ToolEntry::new("fedpkg", "koji"),
        ),
        (RHEL_DIST_GIT.to_string(), ToolEntry::new("rhpkg", "brew")),
    ])
}

/// How build submission output is captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Run submissions inside a pseudo-terminal so progress output is flushed.
    pub pty: bool,
    /// Program that provides the pseudo-terminal (must accept `script` flags).
    pub wrapper: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            pty: true,
            wrapper: "script".to_string(),
        }
    }
}
