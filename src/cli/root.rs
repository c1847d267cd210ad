use anyhow::Result;
use clap::Args;

use super::CommandContext;

/// Print the directory holding the project's manifest.
#[derive(Args, Debug, Default)]
pub struct RootCommand {}

impl RootCommand {
    pub fn execute(self, ctx: &CommandContext) -> Result<()> {
        println!("{}", ctx.project_root.display());
        Ok(())
    }
}
