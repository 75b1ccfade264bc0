//! `dotfyles install`: run the setup tasks in order.
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks_to_completion};
use crate::cli::{GlobalOpts, InstallOpts};
use crate::exec::KeepAwake;
use crate::logging::Logger;
use crate::tasks::{self, Context, Task};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any task fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("dotfyles {}", super::version::version()));

    let ctx = CommandSetup::init(global, log)?.into_context(global, log)?;

    let all_tasks = tasks::all_install_tasks();
    let selected = select_tasks(&all_tasks, opts);
    log.debug(&format!(
        "running {} of {} tasks",
        selected.len(),
        all_tasks.len()
    ));

    let _awake = keep_awake(&ctx);
    run_tasks_to_completion(selected, &ctx, log)
}

/// A [`KeepAwake`] guard for real runs on macOS with `keep_awake` set.
///
/// Failing to start one only costs a warning.
fn keep_awake(ctx: &Context) -> Option<KeepAwake> {
    if ctx.dry_run || !ctx.platform.is_macos() || !ctx.config.install.keep_awake {
        return None;
    }
    let guard = KeepAwake::start(&*ctx.executor)
        .inspect_err(|e| ctx.log.warn(&format!("cannot keep the Mac awake: {e:#}")))
        .ok()
        .flatten();
    if guard.is_some() {
        ctx.log.debug("caffeinate holds the Mac awake until the run ends");
    }
    guard
}

/// Apply `--only` (takes precedence) or `--skip` to the task list.
///
/// Matching is a case-insensitive substring match on the task name, so
/// `--only homebrew` selects every Homebrew task.
#[must_use]
pub fn select_tasks<'a>(all: &'a [Box<dyn Task>], opts: &InstallOpts) -> Vec<&'a dyn Task> {
    let matches_any = |name: &str, words: &[String]| {
        words
            .iter()
            .any(|word| name.contains(&word.to_lowercase()))
    };
    all.iter()
        .filter(|task| {
            let name = task.name().to_lowercase();
            if !opts.only.is_empty() {
                return matches_any(&name, &opts.only);
            }
            !matches_any(&name, &opts.skip)
        })
        .map(AsRef::as_ref)
        .collect()
}
