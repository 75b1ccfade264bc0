//! What to do with one resource, and doing it.

use anyhow::Result;

use super::{ProcessOpts, TaskStats};
use crate::resources::{Resource, ResourceChange, ResourceState};
use crate::tasks::Context;

/// Decision for a resource in a known state.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Step {
    /// Already as desired.
    Keep,
    /// Left alone and counted as skipped; `warning` is set for invalid resources.
    Pass { warning: Option<String> },
    /// To be applied; `current` describes what is there now.
    Fix { current: Option<String> },
}

pub(super) fn plan(state: ResourceState, opts: &ProcessOpts) -> Step {
    match state {
        ResourceState::Correct => Step::Keep,
        ResourceState::Invalid { reason } => Step::Pass {
            warning: Some(reason),
        },
        ResourceState::Missing if opts.fix_missing => Step::Fix { current: None },
        ResourceState::Incorrect { current } if opts.fix_incorrect => Step::Fix {
            current: Some(current),
        },
        ResourceState::Missing | ResourceState::Incorrect { .. } => Step::Pass { warning: None },
    }
}

/// Plan and carry out `resource`, returning the counters it contributes.
pub(super) fn settle<R: Resource>(
    ctx: &Context,
    resource: &R,
    state: ResourceState,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    match plan(state, opts) {
        Step::Keep => {
            ctx.log.debug(&format!("ok: {desc}"));
            Ok(TaskStats::already_ok())
        }
        Step::Pass { warning } => {
            match warning {
                Some(reason) => ctx.log.warn(&format!("skipping {desc}: {reason}")),
                None => ctx.log.debug(&format!("leaving {desc} as it is")),
            }
            Ok(TaskStats::skipped())
        }
        Step::Fix { current } if ctx.dry_run => {
            let suffix = current.map_or_else(String::new, |c| format!(" (currently {c})"));
            ctx.log.dry_run(&format!("would {} {desc}{suffix}", opts.verb));
            Ok(TaskStats::changed())
        }
        Step::Fix { .. } => fix(ctx, resource, &desc, opts),
    }
}

fn fix<R: Resource>(ctx: &Context, resource: &R, desc: &str, opts: &ProcessOpts) -> Result<TaskStats> {
    match resource.apply() {
        Ok(ResourceChange::Applied) => {
            ctx.log.debug(&format!("{}: {desc}", opts.verb));
            Ok(TaskStats::changed())
        }
        Ok(ResourceChange::AlreadyCorrect) => Ok(TaskStats::already_ok()),
        Ok(ResourceChange::Skipped { reason }) => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            Ok(TaskStats::skipped())
        }
        Err(e) if opts.bail_on_error => Err(e),
        Err(e) => {
            ctx.log.warn(&format!("failed to {} {desc}: {e:#}", opts.verb));
            Ok(TaskStats::failed())
        }
    }
}
