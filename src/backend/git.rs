//! Git backend.

use anyhow::Result;

use super::FetchContext;
use crate::constants::GIT_DEFAULT_REFERENCE;
use crate::manifest::Dependency;
use crate::process::ToolRunner;

/// Clones into `<library>/src/<path>`, then inside the clone fetches every
/// remote with pruning, checks out the reference and removes untracked files.
///
/// Each step is a separate invocation and the first failure stops the rest.
/// A failed clone may leave a partial directory behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitBackend {
    program: String,
}

impl GitBackend {
    /// Use `program` as the git executable.
    #[must_use]
    pub const fn new(program: String) -> Self {
        Self {
            program,
        }
    }

    pub(super) async fn fetch<R: ToolRunner>(
        &self,
        ctx: &FetchContext<'_, R>,
        dependency: &mut Dependency,
    ) -> Result<()> {
        let target = ctx.dependency_root(&dependency.path);
        let target_arg = target.display().to_string();

        ctx.run(ctx.command(&self.program, dependency).args([
            "clone",
            dependency.location.as_str(),
            target_arg.as_str(),
        ]))
        .await?;

        ctx.run(
            ctx.command(&self.program, dependency)
                .current_dir(&target)
                .args(["fetch", "-pv", "--all"]),
        )
        .await?;

        if dependency.reference.is_empty() {
            dependency.reference = GIT_DEFAULT_REFERENCE.to_string();
        }
        ctx.run(
            ctx.command(&self.program, dependency)
                .current_dir(&target)
                .args(["checkout", dependency.reference.as_str()]),
        )
        .await?;

        ctx.run(
            ctx.command(&self.program, dependency).current_dir(&target).args(["clean", "-f", "-d"]),
        )
        .await
    }
}
