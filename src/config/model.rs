//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for rebuilder.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dist-git hostname to toolset mapping. Entries from a config file are
    /// merged over the built-in Fedora and RHEL entries.
    #[serde(default = "default_tools")]
    pub tools: BTreeMap<String, ToolEntry>,

    /// Remote the release pipeline pushes to (default: "origin").
    #[serde(default = "default_push_remote")]
    pub push_remote: String,

    /// Output capture settings for build submissions.
    #[serde(default)]
    pub capture: CaptureConfig,
}

fn default_push_remote() -> String {
    "origin".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: default_tools(),
            push_remote: default_push_remote(),
            capture: CaptureConfig::default(),
        }
    }
}
