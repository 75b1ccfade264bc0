//! Dotfile links.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::symlink::SymlinkResource;

/// Link every configured dotfile into place.
///
/// A link whose source does not exist yet is warned about and counted as
/// skipped.  A link that cannot be created is counted as failed; the
/// remaining links are still attempted and the task fails at the end.
#[derive(Debug)]
pub struct LinkDotfiles;

impl Task for LinkDotfiles {
    fn name(&self) -> &'static str {
        "Link dotfiles"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.symlinks.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resources = ctx.config.symlinks.iter().map(|symlink| {
            SymlinkResource::from_spec(&symlink.to_link_spec(), &ctx.home, ctx.root(), &*ctx.fs_ops)
        });
        process_resources(ctx, resources, &ProcessOpts::apply_all("link").no_bail())
    }
}
