//! Command-line interface for drove.
//!
//! Each subcommand lives in its own module with its own `clap` argument
//! struct and an `execute` method taking a resolved [`CommandContext`].
//!
//! # Available Commands
//!
//! - `deps` - fetch every dependency of the enclosing project, transitively
//! - `env` - print the search-path variable for the enclosing project
//! - `exec` - run a program with the project's search path applied
//! - `root` - print the enclosing project's root directory
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - log level (`RUST_LOG` takes precedence)
//! - `--config` - path to the global configuration file
//! - `--manifest-path` - use this manifest instead of searching upward
//!
//! # Example
//!
//! ```bash
//! drove deps
//! drove --verbose deps
//! eval "export $(drove env)"
//! drove exec go build ./...
//! ```

pub mod common;
mod deps;
mod env;
mod exec;
mod root;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use common::CommandContext;

/// Runtime configuration derived from the global flags.
///
/// Built once from the parsed arguments so `main` can initialize logging
/// before any command runs, and so tests can inject their own values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Explicit global configuration file.
    pub config_path: Option<PathBuf>,

    /// Suppress informational output on stdout.
    pub quiet: bool,
}

impl CliConfig {
    /// Configuration with the default `info` level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            ..Self::default()
        }
    }

    /// Install the global `tracing` subscriber.
    ///
    /// `RUST_LOG` wins when set; otherwise [`Self::log_level`] is used. Logs go
    /// to stderr so command output on stdout stays machine-readable.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::EnvFilter::from_default_env()
        } else {
            tracing_subscriber::EnvFilter::new(&self.log_level)
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Transitive dependency fetcher for source projects.
#[derive(Parser, Debug)]
#[command(
    name = "drove",
    about = "Fetch a project's dependencies, and theirs, into one library",
    version,
    long_about = "drove reads drove.toml (or a legacy Drovefile), fetches every listed \
                  dependency with go get, git or hg into .drove/src, and follows nested \
                  manifests so the whole tree lands in the root project's library."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global configuration file.
    ///
    /// Overrides `DROVE_CONFIG` and the default `~/.drove/config.toml`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the manifest (drove.toml or Drovefile).
    ///
    /// By default drove searches the current directory and its parents. The
    /// manifest's directory becomes the project root.
    #[arg(long, global = true)]
    manifest_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch all dependencies listed in the manifest, transitively.
    ///
    /// See [`deps::DepsCommand`].
    Deps(deps::DepsCommand),

    /// Print the search-path variable for this project.
    ///
    /// See [`env::EnvCommand`].
    Env(env::EnvCommand),

    /// Run a program with this project's search path.
    ///
    /// See [`exec::ExecCommand`].
    Exec(exec::ExecCommand),

    /// Print the project root directory.
    Root(root::RootCommand),
}

impl Cli {
    /// Execute with the configuration built from the parsed flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
            quiet: self.quiet,
        }
    }

    /// Resolve the project and dispatch to the subcommand.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let ctx = CommandContext::resolve(self.manifest_path.as_deref(), config.config_path.clone())
            .await?;

        match self.command {
            Commands::Deps(cmd) => cmd.execute(&ctx, &config).await,
            Commands::Env(cmd) => cmd.execute(&ctx),
            Commands::Exec(cmd) => cmd.execute(&ctx).await,
            Commands::Root(cmd) => cmd.execute(&ctx),
        }
    }
}
