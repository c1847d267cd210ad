//! Print the project's search path.

use anyhow::Result;
use clap::Args;

use super::CommandContext;

/// Print `<VAR>=<library>:<project>[:<inherited>]`.
#[derive(Args, Debug, Default)]
pub struct EnvCommand {
    /// Print only the value, without the variable name.
    #[arg(long)]
    value_only: bool,
}

impl EnvCommand {
    pub fn execute(self, ctx: &CommandContext) -> Result<()> {
        let (var, value) = ctx.search_path_override();
        if self.value_only {
            println!("{value}");
        } else {
            println!("{var}={value}");
        }
        Ok(())
    }
}
