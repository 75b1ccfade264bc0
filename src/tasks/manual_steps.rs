//! Setup that cannot be automated.
use anyhow::Result;

use super::{Context, Task, TaskResult};

/// Log the `manual_steps` from `install.toml` so they end up on screen and in
/// the log file.
#[derive(Debug)]
pub struct ListManualSteps;

impl Task for ListManualSteps {
    fn name(&self) -> &'static str {
        "List manual steps"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.install.manual_steps.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let steps = &ctx.config.install.manual_steps;
        ctx.log
            .info(&format!("{} things are left to do by hand:", steps.len()));
        for step in steps {
            ctx.log.info(&format!("  - {step}"));
        }
        Ok(TaskResult::Ok)
    }
}
