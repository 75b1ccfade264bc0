//! Homebrew formulae and bundle.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resource_states, process_resources};
use crate::resources::package::{Bundle, Formula, installed_formulae};

/// Run each `brew` subcommand in turn, or only announce them in a dry run.
fn brew_each(ctx: &Context, subcommands: &[&str]) -> Result<TaskResult> {
    if !ctx.executor.which("brew") {
        return Ok(TaskResult::Skipped("brew not found".to_string()));
    }
    for &sub in subcommands {
        if ctx.dry_run {
            ctx.log.dry_run(&format!("would run brew {sub}"));
            continue;
        }
        ctx.log.debug(&format!("brew {sub}"));
        ctx.executor.run("brew", &[sub])?;
    }
    Ok(if ctx.dry_run {
        TaskResult::DryRun
    } else {
        TaskResult::Ok
    })
}

/// `brew update` then `brew upgrade`, so installs start from current formulae.
#[derive(Debug)]
pub struct UpdateHomebrew;

impl Task for UpdateHomebrew {
    fn name(&self) -> &'static str {
        "Update Homebrew"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.packages.update && ctx.config.packages.any()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        brew_each(ctx, &["update", "upgrade"])
    }
}

/// `brew cleanup`: drop outdated versions and the download cache.
#[derive(Debug)]
pub struct CleanupHomebrew;

impl Task for CleanupHomebrew {
    fn name(&self) -> &'static str {
        "Clean up Homebrew"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.packages.cleanup && ctx.config.packages.any()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        brew_each(ctx, &["cleanup"])
    }
}

/// `brew install` every configured formula that is not installed yet.
///
/// `brew list` runs once for the whole batch, not once per formula.
#[derive(Debug)]
pub struct InstallFormulae;

impl Task for InstallFormulae {
    fn name(&self) -> &'static str {
        "Install Homebrew formulae"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.packages.formulae.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if !ctx.executor.which("brew") {
            return Ok(TaskResult::Skipped("brew not found".to_string()));
        }

        let formulae = &ctx.config.packages.formulae;
        let installed = installed_formulae(&*ctx.executor)?;
        ctx.log.debug(&format!(
            "{} formulae installed, {} configured",
            installed.len(),
            formulae.len()
        ));

        let resource_states = formulae.iter().map(|name| {
            let formula = Formula::new(name, &*ctx.executor);
            let state = formula.state_in(&installed);
            (formula, state)
        });

        process_resource_states(
            ctx,
            resource_states,
            &ProcessOpts::install_missing("install").sequential(),
        )
    }
}

/// `brew bundle install` the configured Brewfile.
#[derive(Debug)]
pub struct InstallBundle;

impl Task for InstallBundle {
    fn name(&self) -> &'static str {
        "Install Homebrew bundle"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.packages.brewfile.is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(brewfile) = ctx.config.packages.brewfile.as_deref() else {
            return Ok(TaskResult::Skipped("no Brewfile configured".to_string()));
        };
        if !ctx.executor.which("brew") {
            return Ok(TaskResult::Skipped("brew not found".to_string()));
        }

        let path = crate::paths::resolve(brewfile, &ctx.home, ctx.root());
        process_resources(
            ctx,
            [Bundle::new(path, &*ctx.executor)],
            &ProcessOpts::apply_all("install"),
        )
    }
}
