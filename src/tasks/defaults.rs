//! macOS preferences.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::defaults::DefaultsResource;

/// Write every configured `defaults` preference that differs.
#[derive(Debug)]
pub struct ApplyDefaults;

impl Task for ApplyDefaults {
    fn name(&self) -> &'static str {
        "Apply macOS defaults"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos() && !ctx.config.defaults.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resources = ctx.config.defaults.iter().map(|entry| {
            if let Some(description) = &entry.description {
                ctx.log.debug(&format!("{}: {description}", entry.key));
            }
            DefaultsResource::new(
                entry.domain.as_str(),
                entry.key.as_str(),
                entry.value.clone(),
                &*ctx.executor,
            )
            .with_sudo(entry.sudo)
        });
        process_resources(
            ctx,
            resources,
            &ProcessOpts::apply_all("write").no_bail().sequential(),
        )
    }
}
