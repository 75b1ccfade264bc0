//! Git identity.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::git_config::GitSetting;

/// Write `user.name`, `user.email` and `github.user` to the global git config.
#[derive(Debug)]
pub struct ConfigureGitIdentity;

impl Task for ConfigureGitIdentity {
    fn name(&self) -> &'static str {
        "Configure git identity"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.identity.git_settings().is_empty() && ctx.executor.which("git")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resources = ctx
            .config
            .identity
            .git_settings()
            .into_iter()
            .map(|(key, value)| GitSetting::new(key, value, &*ctx.executor));
        // git locks ~/.gitconfig for every write
        process_resources(ctx, resources, &ProcessOpts::apply_all("set").sequential())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::config::identity::Identity;
    use crate::platform::Os;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{empty_config, mac_context_with, context_on};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn ada() -> Config {
        Config {
            identity: Identity {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                ..Identity::default()
            },
            ..empty_config(PathBuf::from("/repo"))
        }
    }

    #[test]
    fn requires_git_and_some_identity() {
        assert!(ConfigureGitIdentity.should_run(&context_on(ada(), Os::MacOs, true)));
        assert!(!ConfigureGitIdentity.should_run(&context_on(ada(), Os::MacOs, false)));
        assert!(!ConfigureGitIdentity.should_run(&context_on(
            empty_config(PathBuf::from("/repo")),
            Os::MacOs,
            true
        )));
    }

    #[test]
    fn sets_only_what_differs() {
        let executor = Arc::new(MockExecutor::with_responses(vec![
            (true, "Ada Lovelace\n".to_string()),
            (false, String::new()),
            (true, String::new()),
        ]));
        let ctx = mac_context_with(ada(), Arc::clone(&executor) as _);

        let result = ConfigureGitIdentity.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(
            executor.calls(),
            vec![
                "git config --global --get user.name",
                "git config --global --get user.email",
                "git config --global user.email ada@example.com",
            ]
        );
    }

    #[test]
    fn write_failure_fails_the_task() {
        let executor = Arc::new(MockExecutor::with_responses(vec![(false, String::new())]));
        let ctx = mac_context_with(ada(), Arc::clone(&executor) as _);

        assert!(ConfigureGitIdentity.run(&ctx).is_err());
    }
}
