//! Computer name.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::computer_name::ComputerNameResource;

/// Give the Mac the configured sharing, host and Bonjour name.
#[derive(Debug)]
pub struct SetComputerName;

impl Task for SetComputerName {
    fn name(&self) -> &'static str {
        "Set computer name"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos() && !ctx.config.identity.computer_name.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource =
            ComputerNameResource::new(ctx.config.identity.computer_name.as_str(), &*ctx.executor);
        process_resources(ctx, [resource], &ProcessOpts::apply_all("rename to"))
    }
}
