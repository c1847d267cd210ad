//! Project and configuration resolution shared by every command.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::GlobalConfig;
use crate::core::DroveError;
use crate::environment::Environment;
use crate::manifest::{Manifest, find_project_root};

/// Where the project is and how tools are configured.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory holding the manifest.
    pub project_root: PathBuf,

    /// Manifest given with `--manifest-path`, if any.
    pub manifest_path: Option<PathBuf>,

    /// Validated global configuration.
    pub config: GlobalConfig,
}

impl CommandContext {
    /// Locate the project and load the global configuration.
    ///
    /// With `manifest_path`, its directory is the project root (a directory
    /// may be given directly). Otherwise the current directory and its
    /// ancestors are searched.
    pub async fn resolve(manifest_path: Option<&Path>, config_path: Option<PathBuf>) -> Result<Self> {
        let config = GlobalConfig::load_with_optional(config_path).await?;

        let (project_root, manifest_path) = match manifest_path {
            Some(path) if path.is_dir() => (path.to_path_buf(), None),
            Some(path) => {
                if !path.is_file() {
                    return Err(DroveError::ManifestLoadFailure {
                        file: path.display().to_string(),
                        reason: "file does not exist".to_string(),
                    }
                    .into());
                }
                let root = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                (root, Some(path.to_path_buf()))
            }
            None => {
                let cwd = std::env::current_dir().context("Failed to read current directory")?;
                (find_project_root(&cwd)?, None)
            }
        };

        tracing::debug!("Project root: {}", project_root.display());
        Ok(Self {
            project_root,
            manifest_path,
            config,
        })
    }

    /// Load the root environment for this project.
    pub fn environment(&self) -> Result<Environment> {
        match &self.manifest_path {
            Some(path) => Environment::load_manifest(&self.project_root, path),
            None => Environment::load(&self.project_root),
        }
    }

    /// The search-path override subprocesses of this project receive.
    ///
    /// Only the library and project roots are needed, so the manifest is not
    /// read.
    #[must_use]
    pub fn search_path_override(&self) -> (String, String) {
        let var = &self.config.search_path_var;
        let inherited = std::env::var(var).ok();
        let env = Environment::from_manifest(
            &self.project_root,
            self.manifest_path.as_deref().unwrap_or(&self.project_root),
            Manifest::default(),
        );
        env.search_path_override(var, inherited.as_deref())
    }
}
