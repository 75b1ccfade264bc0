//! Restarting applications after preference changes.
use anyhow::Result;

use super::{Context, Task, TaskResult};

/// `killall` applications so they reload freshly written preferences.
///
/// Best effort: an application that is not running is not an error.
#[derive(Debug)]
pub struct RestartApps;

impl Task for RestartApps {
    fn name(&self) -> &'static str {
        "Restart affected applications"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos() && !ctx.config.restart.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.dry_run {
            for app in &ctx.config.restart {
                ctx.log.dry_run(&format!("would restart {app}"));
            }
            return Ok(TaskResult::DryRun);
        }

        let mut restarted = 0u32;
        for app in &ctx.config.restart {
            match ctx.executor.run_unchecked("killall", &[app.as_str()]) {
                Ok(result) if result.success => {
                    ctx.log.debug(&format!("restarted {app}"));
                    restarted += 1;
                }
                Ok(_) => ctx.log.debug(&format!("{app} was not running")),
                Err(e) => ctx.log.debug(&format!("killall {app}: {e}")),
            }
        }
        ctx.log.info(&format!(
            "{restarted} of {} applications restarted",
            ctx.config.restart.len()
        ));
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{empty_config, mac_context, mac_context_with};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn apps() -> Config {
        Config {
            restart: vec!["Dock".to_string(), "Finder".to_string(), "SystemUIServer".to_string()],
            ..empty_config(PathBuf::from("/repo"))
        }
    }

    #[test]
    fn not_running_apps_do_not_fail() {
        let executor = Arc::new(MockExecutor::with_responses(vec![
            (true, String::new()),
            (false, String::new()),
            (true, String::new()),
        ]));
        let ctx = mac_context_with(apps(), Arc::clone(&executor) as _);

        let result = RestartApps.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(
            executor.calls(),
            vec!["killall Dock", "killall Finder", "killall SystemUIServer"]
        );
    }

    #[test]
    fn dry_run_kills_nothing() {
        // the default test executor panics on any command
        let mut ctx = mac_context(apps());
        ctx.dry_run = true;
        assert!(matches!(RestartApps.run(&ctx).unwrap(), TaskResult::DryRun));
    }
}
