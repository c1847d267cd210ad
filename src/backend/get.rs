//! Package-index backend.

use anyhow::Result;

use super::FetchContext;
use crate::manifest::Dependency;
use crate::process::ToolRunner;

/// Runs the ecosystem's install command with the location as its only
/// positional argument.
///
/// There is no destination argument: the tool places the package according
/// to the search-path variable, which the fetcher points at the shared
/// library root. References are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBackend {
    command: Vec<String>,
}

impl GetBackend {
    /// `command` is the program followed by its leading arguments, e.g.
    /// `["go", "get"]`.
    #[must_use]
    pub const fn new(command: Vec<String>) -> Self {
        Self {
            command,
        }
    }

    pub(super) async fn fetch<R: ToolRunner>(
        &self,
        ctx: &FetchContext<'_, R>,
        dependency: &mut Dependency,
    ) -> Result<()> {
        let Some((program, leading)) = self.command.split_first() else {
            anyhow::bail!("No package install command configured");
        };

        ctx.run(
            ctx.command(program, dependency)
                .args(leading.iter().cloned())
                .arg(dependency.location.clone()),
        )
        .await
    }
}
