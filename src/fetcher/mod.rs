//! Recursive dependency fetching.
//!
//! [`DependencyFetcher::fetch_all`] walks a manifest's dependencies in
//! declaration order. For each one it defaults the install path, dispatches
//! the backend, then checks `<library>/src/<path>` for a manifest of its own.
//! When one is found, that manifest is loaded into a new [`Environment`],
//! rebound to the root project, and fetched the same way. Every dependency in
//! the tree therefore lands in the root project's library:
//!
//! ```text
//! app/
//! ├── drove.toml                 # lists a (git) and b (get)
//! └── .drove/src/
//!     ├── example.com/a/         # has its own drove.toml listing c
//!     ├── example.com/b/
//!     └── example.com/c/         # transitive, still under app/.drove
//! ```
//!
//! Execution is sequential and stops at the first failure anywhere in the
//! tree; nothing after it is attempted and nothing already on disk is rolled
//! back. Backends run on every call, even when a working copy already exists.
//! Sibling dependencies that install to the same path overwrite each other in
//! traversal order.
//!
//! The fetcher keeps the chain of project roots currently being expanded.
//! A nested manifest whose directory is already on that chain fails with
//! [`DroveError::CyclicDependency`] instead of recursing forever.


use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::{BackendRegistry, FetchContext};
use crate::config::GlobalConfig;
use crate::core::DroveError;
use crate::environment::Environment;
use crate::manifest::is_project_root;
use crate::process::{SystemRunner, ToolRunner};

/// Fetches a project's full dependency closure.
pub struct DependencyFetcher<R: ToolRunner = SystemRunner> {
    registry: BackendRegistry,
    runner: R,
    search_path_var: String,
    inherited_search_path: Option<String>,
    timeout: Option<Duration>,
}

impl DependencyFetcher<SystemRunner> {
    /// A fetcher that spawns real processes.
    ///
    /// The inherited search path is read from the process environment once,
    /// here; it is passed to subprocesses and never written back.
    #[must_use]
    pub fn from_config(config: &GlobalConfig) -> Self {
        let inherited = std::env::var(&config.search_path_var).ok();
        Self::with_runner(config, SystemRunner).with_inherited_search_path(inherited)
    }
}

impl<R: ToolRunner> DependencyFetcher<R> {
    /// A fetcher that executes commands through `runner`.
    #[must_use]
    pub fn with_runner(config: &GlobalConfig, runner: R) -> Self {
        Self {
            registry: BackendRegistry::new(&config.tools),
            runner,
            search_path_var: config.search_path_var.clone(),
            inherited_search_path: None,
            timeout: config.timeout(),
        }
    }

    /// Value of the search-path variable to extend for subprocesses.
    #[must_use]
    pub fn with_inherited_search_path(mut self, value: Option<String>) -> Self {
        self.inherited_search_path = value;
        self
    }

    /// The runner executing tool invocations.
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Fetch every dependency of `env`, transitively.
    ///
    /// `env` is updated in place: empty install paths and references are
    /// replaced by their defaults as each dependency is processed.
    ///
    /// # Errors
    ///
    /// The first failure anywhere in the tree, annotated with the location of
    /// the dependency that caused it. The typed [`DroveError`] stays
    /// available through `downcast_ref`.
    pub async fn fetch_all(&self, env: &mut Environment) -> Result<()> {
        let mut chain = vec![canonical(&env.project_root)];
        self.fetch_tree(env, &mut chain).await
    }

    fn fetch_tree<'a>(
        &'a self,
        env: &'a mut Environment,
        chain: &'a mut Vec<PathBuf>,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            let manifest = env.manifest_path.display().to_string();
            if env.dependencies.is_empty() {
                tracing::info!(target: "fetch", "No dependencies listed in {}", manifest);
                return Ok(());
            }

            tracing::info!(target: "fetch", "Downloading dependencies listed in {}", manifest);

            let overrides = vec![env.search_path_override(
                &self.search_path_var,
                self.inherited_search_path.as_deref(),
            )];
            let ctx = FetchContext {
                runner: &self.runner,
                library_root: &env.library_root,
                env_overrides: &overrides,
                timeout: self.timeout,
            };

            for index in 0..env.dependencies.len() {
                let dependency = &mut env.dependencies[index];
                tracing::info!(target: "fetch", "Retrieving dependency at: {}", dependency.location);

                dependency.default_path();
                let location = dependency.location.clone();

                let backend = self
                    .registry
                    .resolve(&dependency.kind)
                    .with_context(|| format!("Failed to fetch dependency '{location}'"))?;
                backend
                    .fetch(&ctx, dependency)
                    .await
                    .with_context(|| format!("Failed to fetch dependency '{location}'"))?;

                let dependency_root = ctx.dependency_root(&dependency.path);
                if !is_project_root(&dependency_root) {
                    tracing::info!(
                        target: "fetch",
                        "No manifest found in {}",
                        dependency_root.display()
                    );
                    continue;
                }

                let key = canonical(&dependency_root);
                if chain.contains(&key) {
                    let cycle: Vec<String> = chain
                        .iter()
                        .chain(std::iter::once(&key))
                        .map(|p| p.display().to_string())
                        .collect();
                    return Err(anyhow::Error::from(DroveError::CyclicDependency {
                        chain: cycle.join(" -> "),
                    })
                    .context(format!("Failed to fetch dependencies of '{location}'")));
                }

                tracing::info!(
                    target: "fetch",
                    "Reading dependencies of {}",
                    dependency_root.display()
                );
                let mut nested = Environment::load(&dependency_root)
                    .with_context(|| format!("Failed to fetch dependencies of '{location}'"))?;
                nested.chroot(&env.project_root);

                chain.push(key);
                let result = self.fetch_tree(&mut nested, chain).await;
                chain.pop();
                result.with_context(|| format!("Failed to fetch dependencies of '{location}'"))?;
            }

            tracing::info!(target: "fetch", "Done downloading dependencies for {}", manifest);
            Ok(())
        }
        .boxed()
    }
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
