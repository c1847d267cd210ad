//! Mercurial backend.

use anyhow::Result;

use super::FetchContext;
use crate::constants::HG_DEFAULT_REFERENCE;
use crate::manifest::Dependency;
use crate::process::ToolRunner;

/// Clones into `<library>/src/<path>`, pulls, then force-updates to the
/// reference (`tip` when none is declared).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HgBackend {
    program: String,
}

impl HgBackend {
    /// Use `program` as the hg executable.
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

        ctx.run(ctx.command(&self.program, dependency).current_dir(&target).arg("pull")).await?;

        if dependency.reference.is_empty() {
            dependency.reference = HG_DEFAULT_REFERENCE.to_string();
        }
        ctx.run(
            ctx.command(&self.program, dependency)
                .current_dir(&target)
                .args(["update", "-C", dependency.reference.as_str()]),
        )
        .await
    }
}
