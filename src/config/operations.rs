//! Config loading, validation, and lookup of the config file location.

use super::model::Config;
use super::types::default_tools;
use crate::error::{RebuildError, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "REBUILDER_CONFIG";

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(RebuildError::ConfigError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            RebuildError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for this run.
    ///
    /// An explicit path wins, then `REBUILDER_CONFIG`, then built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match config_path(explicit) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| RebuildError::ConfigError(format!("failed to parse config YAML: {}", e)))?;

        let mut tools = default_tools();
        tools.append(&mut config.tools);
        config.tools = tools;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - tool hostnames and tool names must be non-empty
    /// - `push_remote` must be non-empty
    /// - `capture.wrapper` must be non-empty when `capture.pty` is set
    pub fn validate(&self) -> Result<()> {
        for (host, entry) in &self.tools {
            if host.trim().is_empty() {
                return Err(RebuildError::ConfigError(
                    "tools entries must have a non-empty hostname".to_string(),
                ));
            }
            if entry.submit.trim().is_empty() || entry.watch.trim().is_empty() {
                return Err(RebuildError::ConfigError(format!(
                    "tools entry for '{}' must name both a submit and a watch tool",
                    host
                )));
            }
        }

        if self.push_remote.trim().is_empty() {
            return Err(RebuildError::ConfigError(
                "push_remote must be non-empty".to_string(),
            ));
        }

        if self.capture.pty && self.capture.wrapper.trim().is_empty() {
            return Err(RebuildError::ConfigError(
                "capture.wrapper must be non-empty when capture.pty is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    std::env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
