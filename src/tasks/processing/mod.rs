//! The loop shared by every task that manages a list of resources: read each
//! resource's state, decide, apply, and total up what happened.
//!
//! Independent resources are fanned out over Rayon when both the context and
//! the task allow it; otherwise they are handled in input order.

mod step;

use std::ops::Add;

use anyhow::Result;
use rayon::prelude::*;

use super::Context;
use crate::resources::{Resource, ResourceState};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use dotfyles::tasks::TaskResult;
///
/// let skipped = TaskResult::Skipped("brew not found".into());
/// assert!(matches!(skipped, TaskResult::Skipped(ref why) if why == "brew not found"));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task had nothing it could do (missing tool, empty configuration).
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Per-item counters of a resource batch.
///
/// Skipped and failed items only show up in the summary when non-zero:
///
/// ```
/// use dotfyles::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 2, already_ok: 7, skipped: 0, failed: 0 };
/// assert_eq!(stats.summary(false), "2 changed, 7 already ok");
/// assert_eq!(stats.summary(true), "2 would change, 7 already ok");
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3, failed: 1 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped, 1 failed");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Applied (or, in a dry run, would be).
    pub changed: u32,
    /// Already in the desired state.
    pub already_ok: u32,
    /// Left alone, e.g. a link whose source does not exist yet.
    pub skipped: u32,
    /// Apply returned an error.
    pub failed: u32,
}

impl TaskStats {
    const fn changed() -> Self {
        Self {
            changed: 1,
            already_ok: 0,
            skipped: 0,
            failed: 0,
        }
    }

    const fn already_ok() -> Self {
        Self {
            changed: 0,
            already_ok: 1,
            skipped: 0,
            failed: 0,
        }
    }

    const fn skipped() -> Self {
        Self {
            changed: 0,
            already_ok: 0,
            skipped: 1,
            failed: 0,
        }
    }

    const fn failed() -> Self {
        Self {
            changed: 0,
            already_ok: 0,
            skipped: 0,
            failed: 1,
        }
    }

    /// One-line description of the counters.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut parts = vec![
            format!("{} {verb}", self.changed),
            format!("{} already ok", self.already_ok),
        ];
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped));
        }
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        parts.join(", ")
    }

    /// Log the summary and turn the counters into the task's result.
    ///
    /// # Errors
    ///
    /// Fails when any item failed. Every item has been attempted by then.
    pub fn finish(self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.info(&self.summary(ctx.dry_run));
        if self.failed > 0 {
            anyhow::bail!("{} item(s) failed", self.failed);
        }
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }
}

impl Add for TaskStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            changed: self.changed + other.changed,
            already_ok: self.already_ok + other.already_ok,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}

/// How a task wants its resources handled.
///
/// # Examples
///
/// ```
/// use dotfyles::tasks::ProcessOpts;
///
/// let opts = ProcessOpts::apply_all("link").no_bail();
/// assert!(opts.fix_incorrect && opts.fix_missing && !opts.bail_on_error);
///
/// let opts = ProcessOpts::install_missing("install").sequential();
/// assert!(!opts.fix_incorrect && opts.fix_missing && !opts.parallel);
/// ```
#[derive(Debug)]
pub struct ProcessOpts<'a> {
    /// Verb for log lines ("install", "link", "write").
    pub verb: &'a str,
    /// Apply resources that exist in the wrong state.
    pub fix_incorrect: bool,
    /// Apply resources that do not exist.
    pub fix_missing: bool,
    /// Stop at the first apply error instead of counting it as failed.
    pub bail_on_error: bool,
    /// Allow applying several resources at once.
    pub parallel: bool,
}

impl<'a> ProcessOpts<'a> {
    /// Fix missing and incorrect resources; the first error aborts.
    #[must_use]
    pub const fn apply_all(verb: &'a str) -> Self {
        Self {
            verb,
            fix_incorrect: true,
            fix_missing: true,
            bail_on_error: true,
            parallel: true,
        }
    }

    /// Only create what is missing; errors are collected.
    #[must_use]
    pub const fn install_missing(verb: &'a str) -> Self {
        Self {
            verb,
            fix_incorrect: false,
            fix_missing: true,
            bail_on_error: false,
            parallel: true,
        }
    }

    /// Count apply errors as failed and keep going.
    #[must_use]
    pub const fn no_bail(mut self) -> Self {
        self.bail_on_error = false;
        self
    }

    /// Apply one resource at a time.
    ///
    /// `brew` and `git config` both take a lock, so concurrent writes fail.
    #[must_use]
    pub const fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Read every resource's state and apply the ones that need it.
///
/// # Errors
///
/// Fails if a state check fails, if an apply fails with `bail_on_error`, or,
/// once everything was attempted, if any apply failed.
pub fn process_resources<R: Resource + Send>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    let resources: Vec<R> = resources.into_iter().collect();
    run_batch(ctx, resources, opts, |resource| {
        let state = resource.current_state()?;
        step::settle(ctx, &resource, state, opts)
    })
}

/// Like [`process_resources`], with states already known from a batch query
/// (one `brew list` for every formula).
///
/// # Errors
///
/// As [`process_resources`], minus the state check.
pub fn process_resource_states<R: Resource + Send>(
    ctx: &Context,
    resource_states: impl IntoIterator<Item = (R, ResourceState)>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    let resource_states: Vec<(R, ResourceState)> = resource_states.into_iter().collect();
    run_batch(ctx, resource_states, opts, |(resource, state)| {
        step::settle(ctx, &resource, state, opts)
    })
}

fn run_batch<T: Send>(
    ctx: &Context,
    items: Vec<T>,
    opts: &ProcessOpts,
    one: impl Fn(T) -> Result<TaskStats> + Sync + Send,
) -> Result<TaskResult> {
    let stats = if ctx.parallel && opts.parallel && items.len() > 1 {
        ctx.log
            .debug(&format!("processing {} resources in parallel", items.len()));
        items
            .into_par_iter()
            .map(&one)
            .try_reduce(TaskStats::default, |a, b| Ok(a + b))?
    } else {
        items
            .into_iter()
            .try_fold(TaskStats::default(), |total, item| Ok::<_, anyhow::Error>(total + one(item)?))?
    };
    stats.finish(ctx)
}
