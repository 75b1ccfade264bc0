//! Operating system and App Store updates.
use anyhow::Result;

use super::{Context, Task, TaskResult};

/// Install every pending macOS update, then upgrade App Store apps when `mas`
/// is installed.
///
/// Opt-in through `software_update` in `install.toml`: updates can take long
/// and some only finish after a restart.
#[derive(Debug)]
pub struct UpdateMacos;

impl Task for UpdateMacos {
    fn name(&self) -> &'static str {
        "Update macOS"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos() && ctx.config.install.software_update
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if !ctx.executor.which("softwareupdate") {
            return Ok(TaskResult::Skipped("softwareupdate not found".to_string()));
        }
        let mas = ctx.executor.which("mas");

        if ctx.dry_run {
            ctx.log.dry_run("would install all available macOS updates");
            if mas {
                ctx.log.dry_run("would upgrade App Store apps");
            }
            return Ok(TaskResult::DryRun);
        }

        ctx.executor
            .run("sudo", &["softwareupdate", "--install", "--all"])?;
        if mas {
            ctx.executor.run("mas", &["upgrade"])?;
        } else {
            ctx.log.debug("mas not installed, App Store apps left alone");
        }
        Ok(TaskResult::Ok)
    }
}
