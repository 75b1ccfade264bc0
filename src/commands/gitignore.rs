//! `dotfyles gitignore`.
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks_to_completion};
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::gitignore::UpdateGitignore;

/// Run only the gitignore merge.
///
/// # Errors
///
/// Returns an error if configuration loading, a download, or the write fails.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let ctx = CommandSetup::init(global, log)?.into_context(global, log)?;
    let task: &dyn Task = &UpdateGitignore;
    run_tasks_to_completion([task], &ctx, log)
}
