//! Global gitignore.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::gitignore::{GitignoreMerger, SEPARATOR};
use crate::paths;

/// Rebuild the generated half of the managed global gitignore.
#[derive(Debug)]
pub struct UpdateGitignore;

impl Task for UpdateGitignore {
    fn name(&self) -> &'static str {
        "Update global gitignore"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.gitignore.urls.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let settings = &ctx.config.gitignore;
        let path = paths::resolve(&settings.file, &ctx.home, ctx.root());
        let merger = GitignoreMerger::new(&*ctx.fetcher).with_parallel(ctx.parallel);

        ctx.log.debug(&format!(
            "merging {} remote lists into {}",
            settings.urls.len(),
            path.display()
        ));

        if ctx.dry_run {
            let merged = merger.preview(&path, &settings.urls)?;
            let local_lines = merged
                .split(SEPARATOR)
                .next()
                .map_or(0, |local| local.lines().count());
            ctx.log.dry_run(&format!(
                "would rewrite {} ({local_lines} local lines kept, {} remote lists)",
                path.display(),
                settings.urls.len()
            ));
            return Ok(TaskResult::DryRun);
        }

        let merged = merger.merge(&path, &settings.urls)?;
        ctx.log.info(&format!(
            "wrote {} ({} bytes from {} remote lists)",
            path.display(),
            merged.len(),
            settings.urls.len()
        ));
        Ok(TaskResult::Ok)
    }
}
