//! Fetch backends and the type dispatch table.
//!
//! Each dependency names a backend through its `type` key:
//!
//! | key            | backend          | effect                                          |
//! |----------------|------------------|-------------------------------------------------|
//! | `""` / `"get"` | [`GetBackend`]   | `<get command> <location>`                      |
//! | `"git"`        | [`GitBackend`]   | clone, fetch, checkout, clean                   |
//! | `"hg"`         | [`HgBackend`]    | clone, pull, forced update                      |
//!
//! Keys are case-sensitive. The table is an immutable [`BackendRegistry`]
//! built once from configuration and handed to the fetcher.
//!
//! Backends never change the process working directory. Steps that must run
//! inside a working copy are given that directory as their own
//! `current_dir`, so the caller's directory is the same after a backend
//! returns, whether it succeeded or failed.

mod get;
mod git;
mod hg;

pub use get::GetBackend;
pub use git::GitBackend;
pub use hg::HgBackend;

use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ToolsConfig;
use crate::core::DroveError;
use crate::environment::dependency_root;
use crate::manifest::Dependency;
use crate::process::{ToolCommand, ToolRunner};

/// Everything a backend needs besides the dependency itself.
pub struct FetchContext<'a, R: ToolRunner> {
    /// Executes the tool invocations
    pub runner: &'a R,
    /// Shared library root of the root project
    pub library_root: &'a Path,
    /// Variables applied to every subprocess (the search path)
    pub env_overrides: &'a [(String, String)],
    /// Per-subprocess timeout
    pub timeout: Option<Duration>,
}

impl<R: ToolRunner> FetchContext<'_, R> {
    /// `<library_root>/src/<path>`, see [`dependency_root`].
    #[must_use]
    pub fn dependency_root(&self, path: &str) -> PathBuf {
        dependency_root(self.library_root, path)
    }

    /// A command for `program` with this context's environment, timeout and
    /// log label applied.
    #[must_use]
    pub fn command(&self, program: &str, dependency: &Dependency) -> ToolCommand {
        ToolCommand::new(program)
            .envs(self.env_overrides)
            .with_timeout(self.timeout)
            .with_context(dependency.location.clone())
    }

    /// Run `command` to completion, discarding its output.
    pub async fn run(&self, command: ToolCommand) -> Result<()> {
        tracing::info!(target: "fetch", "{}", command.display_command());
        self.runner.run(&command).await?;
        Ok(())
    }
}

/// One backend implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Package-index install
    Get(GetBackend),
    /// Distributed VCS clone
    Git(GitBackend),
    /// Centralized VCS clone
    Hg(HgBackend),
}

impl Backend {
    /// Materialize `dependency` on disk.
    ///
    /// `dependency.reference` may be filled with the backend's default.
    pub async fn fetch<R: ToolRunner>(
        &self,
        ctx: &FetchContext<'_, R>,
        dependency: &mut Dependency,
    ) -> Result<()> {
        match self {
            Self::Get(backend) => backend.fetch(ctx, dependency).await,
            Self::Git(backend) => backend.fetch(ctx, dependency).await,
            Self::Hg(backend) => backend.fetch(ctx, dependency).await,
        }
    }
}

/// Immutable map from dependency type key to backend.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: HashMap<String, Backend>,
}

impl BackendRegistry {
    /// Register the built-in backends using the configured tools.
    #[must_use]
    pub fn new(tools: &ToolsConfig) -> Self {
        let get = Backend::Get(GetBackend::new(tools.get.clone()));
        let mut backends = HashMap::new();
        backends.insert(String::new(), get.clone());
        backends.insert("get".to_string(), get);
        backends.insert("git".to_string(), Backend::Git(GitBackend::new(tools.git.clone())));
        backends.insert("hg".to_string(), Backend::Hg(HgBackend::new(tools.hg.clone())));
        Self {
            backends,
        }
    }

    /// Look up the backend for `kind`.
    ///
    /// # Errors
    ///
    /// [`DroveError::UnknownDependencyType`] carrying `kind` verbatim.
    pub fn resolve(&self, kind: &str) -> Result<&Backend, DroveError> {
        self.backends.get(kind).ok_or_else(|| DroveError::UnknownDependencyType {
            kind: kind.to_string(),
        })
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new(&ToolsConfig::default())
    }
}
