//! Global configuration (`~/.drove/config.toml`).
//!
//! The file is optional; a missing file means defaults. Its location can be
//! overridden with `--config` or the `DROVE_CONFIG` environment variable.
//!
//! ```toml
//! # Variable that receives the project directories for `drove env`/`exec`
//! # and for every fetch subprocess
//! search_path_var = "GOPATH"
//!
//! # Kill any single tool invocation after this many seconds
//! timeout_secs = 600
//!
//! [tools]
//! get = ["go", "get"]   # program and leading arguments; the location is appended
//! git = "git"
//! hg = "hg"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{CONFIG_ENV_VAR, DEFAULT_SEARCH_PATH_VAR};
use crate::core::DroveError;

fn default_search_path_var() -> String {
    DEFAULT_SEARCH_PATH_VAR.to_string()
}

/// Top-level global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Name of the colon-delimited search-path variable.
    #[serde(default = "default_search_path_var")]
    pub search_path_var: String,

    /// Optional per-subprocess timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// External programs used by the backends.
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Programs invoked by each backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolsConfig {
    /// Package-install command; the dependency location is appended.
    #[serde(default = "ToolsConfig::default_get")]
    pub get: Vec<String>,

    /// Distributed VCS executable.
    #[serde(default = "ToolsConfig::default_git")]
    pub git: String,

    /// Centralized VCS executable.
    #[serde(default = "ToolsConfig::default_hg")]
    pub hg: String,
}

impl ToolsConfig {
    fn default_get() -> Vec<String> {
        vec!["go".to_string(), "get".to_string()]
    }

    fn default_git() -> String {
        "git".to_string()
    }

    fn default_hg() -> String {
        "hg".to_string()
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            get: Self::default_get(),
            git: Self::default_git(),
            hg: Self::default_hg(),
        }
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            search_path_var: default_search_path_var(),
            timeout_secs: None,
            tools: ToolsConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load from an explicit path, `DROVE_CONFIG`, or the default location,
    /// in that order. A missing file yields defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match std::env::var_os(CONFIG_ENV_VAR) {
                Some(value) => PathBuf::from(value),
                None => Self::default_path()?,
            },
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load and validate a config file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| DroveError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })?;
        config.validated()
    }

    /// Default config location: `~/.drove/config.toml`, or the local data
    /// directory on Windows.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("drove")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".drove")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Check invariants and expand `~` in tool paths.
    pub fn validated(mut self) -> Result<Self> {
        if self.search_path_var.trim().is_empty() {
            return Err(config_error("search_path_var must not be empty"));
        }
        if self.tools.get.first().is_none_or(|program| program.trim().is_empty()) {
            return Err(config_error("tools.get must name a program"));
        }
        if self.tools.git.trim().is_empty() || self.tools.hg.trim().is_empty() {
            return Err(config_error("tools.git and tools.hg must not be empty"));
        }

        self.tools.get[0] = shellexpand::tilde(&self.tools.get[0]).into_owned();
        self.tools.git = shellexpand::tilde(&self.tools.git).into_owned();
        self.tools.hg = shellexpand::tilde(&self.tools.hg).into_owned();
        Ok(self)
    }

    /// Per-subprocess timeout, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn config_error(message: &str) -> anyhow::Error {
    DroveError::ConfigError {
        message: message.to_string(),
    }
    .into()
}
