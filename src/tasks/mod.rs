//! Named tasks that orchestrate resource changes, run in a fixed order.
pub mod computer_name;
mod context;
pub mod defaults;
pub mod git_identity;
pub mod github_token;
pub mod gitignore;
pub mod manual_steps;
pub mod packages;
mod processing;
pub mod restart;
pub mod software_update;
pub mod symlinks;

pub use context::Context;
pub use processing::{
    ProcessOpts, TaskResult, TaskStats, process_resource_states, process_resources,
};

use anyhow::Result;

use crate::logging::TaskStatus;

/// One step of `install`.
pub trait Task: Send + Sync {
    /// Label used in stage headers and the summary.
    fn name(&self) -> &str;

    /// False when the task has nothing to do on this machine or with this
    /// configuration; it is then recorded as not applicable.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Do the work.
    ///
    /// # Errors
    ///
    /// A command, file operation, or download failed badly enough that the
    /// task as a whole did not complete.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the install command, in execution order.
///
/// System updates run first. Identity comes before anything clones, links
/// come before packages so tools installed later find their dotfiles, and
/// applications restart after every preference write. Manual steps close the
/// run so they are the last thing on screen before the summary.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(software_update::UpdateMacos),
        Box::new(computer_name::SetComputerName),
        Box::new(git_identity::ConfigureGitIdentity),
        Box::new(github_token::StoreGithubToken),
        Box::new(gitignore::UpdateGitignore),
        Box::new(symlinks::LinkDotfiles),
        Box::new(packages::UpdateHomebrew),
        Box::new(packages::InstallFormulae),
        Box::new(packages::InstallBundle),
        Box::new(defaults::ApplyDefaults),
        Box::new(packages::CleanupHomebrew),
        Box::new(restart::RestartApps),
        Box::new(manual_steps::ListManualSteps),
    ]
}

/// Run `task` if it applies and record how it ended.
///
/// Errors are logged and recorded, never returned: one failing task does not
/// stop the ones after it.
pub fn execute(task: &dyn Task, ctx: &Context) {
    let name = task.name();
    if !task.should_run(ctx) {
        ctx.log.debug(&format!("{name}: not applicable"));
        ctx.log.record_task(name, TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(name);
    let (status, message) = match task.run(ctx) {
        Ok(TaskResult::Ok) => (TaskStatus::Ok, None),
        Ok(TaskResult::DryRun) => (TaskStatus::DryRun, None),
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            (TaskStatus::Skipped, Some(reason))
        }
        Err(e) => {
            let reason = format!("{e:#}");
            ctx.log.error(&format!("{name}: {reason}"));
            (TaskStatus::Failed, Some(reason))
        }
    };
    ctx.log.record_task(name, status, message.as_deref());
}
