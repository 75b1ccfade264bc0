//! Subcommand entry points and their shared setup.
pub mod gitignore;
pub mod install;
pub mod link;
pub mod version;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::{Config, validation};
use crate::error::{ConfigError, TaskError};
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

/// Environment variable naming the repository root.
pub const ROOT_ENV: &str = "DOTFYLES_ROOT";

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates platform detection, root resolution and configuration
/// loading so that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Detected OS.
    pub platform: Platform,
    /// Everything under `conf/`.
    pub config: Config,
}

impl CommandSetup {
    /// Detect the platform, locate the repository and load all configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be determined or any
    /// configuration file fails to parse.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let platform = Platform::detect();
        let root = resolve_root(global)?;
        log.debug(&format!("platform: {}", platform.os));
        log.debug(&format!("root: {}", root.display()));

        log.stage("Loading configuration");
        let config = Config::load(&root)?;
        log.info(&format!(
            "loaded {} links, {} formulae, {} preferences",
            config.symlinks.len(),
            config.packages.formulae.len(),
            config.defaults.len()
        ));

        Ok(Self { platform, config })
    }

    /// Build the task [`Context`] and report configuration warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOME` is not set.
    pub fn into_context(self, global: &GlobalOpts, log: &Arc<Logger>) -> Result<Context> {
        let ctx = Context::new(
            Arc::new(self.config),
            Arc::new(self.platform),
            Arc::clone(log) as Arc<dyn Log>,
            global.dry_run,
            Arc::new(SystemExecutor),
            global.parallel,
        )?;
        report_warnings(&ctx.config, &ctx.home, log.as_ref());
        Ok(ctx)
    }
}

fn report_warnings(config: &Config, home: &Path, log: &dyn Log) {
    let warnings = validation::validate(config, home);
    if warnings.is_empty() {
        return;
    }
    log.warn(&format!("found {} configuration warning(s):", warnings.len()));
    for warning in &warnings {
        log.warn(&format!("  {warning}"));
    }
}

/// Resolve the repository root.
///
/// Tried in order: `--root`, `$DOTFYLES_ROOT`, the directory the binary was
/// built into or installed under, and the current directory.  Only the last
/// two are checked for a `conf/` directory.
///
/// # Errors
///
/// Returns [`ConfigError::RootNotFound`] if no candidate qualifies.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }

    if let Ok(root) = std::env::var(ROOT_ENV) {
        return Ok(PathBuf::from(root));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        let candidates = [
            parent.join("../.."), // target/release/ → repo root
            parent.join(".."),    // bin/ → repo root
        ];
        for candidate in &candidates {
            if candidate.join("conf").is_dir() {
                return Ok(dunce::canonicalize(candidate)?);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    if cwd.join("conf").is_dir() {
        return Ok(cwd);
    }

    Err(ConfigError::RootNotFound.into())
}

/// Execute every task in order, print the summary, and fail if any task failed.
///
/// # Errors
///
/// Returns [`TaskError::RunFailed`] if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        return Err(TaskError::RunFailed(count).into());
    }
    Ok(())
}
