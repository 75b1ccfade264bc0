//! GitHub API token, kept out of the shared git config.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::git_config::GitSetting;
use crate::resources::{Resource, ResourceState};

/// Environment variable the token is taken from.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Git config file holding the token, relative to the repository root.
///
/// Link it into the home directory from `symlinks.toml` and include it from
/// `.gitconfig`.
pub const PRIVATE_GITCONFIG: &str = ".gitconfig.private";

const KEY: &str = "github.token";

/// Store `$GITHUB_TOKEN` as `github.token` in [`PRIVATE_GITCONFIG`].
///
/// An already stored token is kept when the variable is unset.
#[derive(Debug)]
pub struct StoreGithubToken;

impl Task for StoreGithubToken {
    fn name(&self) -> &'static str {
        "Store GitHub token"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.identity.github_user.is_empty() && ctx.executor.which("git")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty());
        store_token(ctx, token.as_deref())
    }
}

fn store_token(ctx: &Context, token: Option<&str>) -> Result<TaskResult> {
    let file = ctx.root().join(PRIVATE_GITCONFIG);
    let Some(token) = token else {
        let stored = GitSetting::new(KEY, "", &*ctx.executor)
            .in_file(&file)
            .secret()
            .current_state()?;
        if stored == ResourceState::Missing {
            return Ok(TaskResult::Skipped(format!(
                "no {KEY} in {}; export {TOKEN_ENV} to store one",
                file.display()
            )));
        }
        ctx.log.debug(&format!("{KEY} already stored"));
        return Ok(TaskResult::Ok);
    };

    let setting = GitSetting::new(KEY, token.trim(), &*ctx.executor)
        .in_file(&file)
        .secret();
    process_resources(ctx, [setting], &ProcessOpts::apply_all("store"))
}
