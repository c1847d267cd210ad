//! Fetch the project's dependency tree.
//!
//! ```bash
//! drove deps
//! drove --manifest-path ../service/drove.toml deps
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{CliConfig, CommandContext};
use crate::fetcher::DependencyFetcher;

/// Fetch every dependency listed in the manifest, then the dependencies of
/// any fetched project that has a manifest of its own.
#[derive(Args, Debug, Default)]
pub struct DepsCommand {}

impl DepsCommand {
    pub async fn execute(self, ctx: &CommandContext, config: &CliConfig) -> Result<()> {
        let mut env = ctx.environment()?;
        let direct = env.dependencies.len();

        let fetcher = DependencyFetcher::from_config(&ctx.config);
        fetcher.fetch_all(&mut env).await?;

        if !config.quiet {
            println!(
                "{} {} direct dependencies into {}",
                "Fetched".green().bold(),
                direct,
                env.source_dir().display()
            );
        }
        Ok(())
    }
}
