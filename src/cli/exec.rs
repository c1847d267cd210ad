//! Run a program inside the project's search path.
//!
//! The child inherits stdio and the current directory; only the search-path
//! variable is overridden. A non-zero exit status is passed through as
//! drove's own.
//!
//! ```bash
//! drove exec go build ./...
//! drove exec -- go test -run TestFetch
//! ```

use anyhow::Result;
use clap::Args;

use super::CommandContext;
use crate::core::DroveError;
use crate::process::{SystemRunner, ToolCommand, ToolRunner};

/// Run `program` with the project's search path applied.
#[derive(Args, Debug)]
pub struct ExecCommand {
    /// Program to run.
    pub(crate) program: String,

    /// Arguments passed to the program unchanged.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub(crate) args: Vec<String>,
}

impl ExecCommand {
    /// The command that will be run, with the search-path override applied.
    pub fn command(&self, ctx: &CommandContext) -> ToolCommand {
        let (var, value) = ctx.search_path_override();
        ToolCommand::new(&self.program)
            .args(&self.args)
            .env(var, value)
            .with_context("exec")
    }

    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let command = self.command(ctx);
        match SystemRunner.run(&command).await {
            Ok(_) => Ok(()),
            Err(err) => match err.downcast_ref::<DroveError>() {
                Some(DroveError::ExternalToolFailure {
                    code: Some(code),
                    ..
                }) => {
                    tracing::debug!("{} exited with status {}", self.program, code);
                    std::process::exit(*code)
                }
                _ => Err(err),
            },
        }
    }
}
