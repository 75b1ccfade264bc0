//! `dotfyles link`: reconcile one link outside the configured set.
use std::path::Path;

use anyhow::Result;

use crate::cli::{GlobalOpts, LinkOpts};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::resources::symlink::{LinkSpec, Reconciliation, SymlinkResource};
use crate::resources::{Resource, ResourceState};

/// Link one source to one destination.
///
/// Relative paths are resolved against the current directory, not the
/// repository root, so no configuration is loaded.
///
/// # Errors
///
/// Returns an error if `HOME` is unset or the link cannot be created.
pub fn run(global: &GlobalOpts, opts: &LinkOpts, log: &dyn Log) -> Result<()> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?;
    let cwd = std::env::current_dir()?;
    let spec = opts.destination.as_ref().map_or_else(
        || LinkSpec::to_home(opts.source.clone()),
        |destination| LinkSpec::new(opts.source.clone(), destination.clone()),
    );
    link_one(
        &spec,
        Path::new(&home),
        &cwd,
        &SystemFileSystemOps,
        global.dry_run,
        log,
    )
}

/// Reconcile (or, in a dry run, inspect) a single link and report the outcome.
fn link_one(
    spec: &LinkSpec,
    home: &Path,
    base: &Path,
    fs: &dyn FileSystemOps,
    dry_run: bool,
    log: &dyn Log,
) -> Result<()> {
    let resource = SymlinkResource::from_spec(spec, home, base, fs);
    let desc = format!("{} -> {}", resource.target.display(), resource.source.display());

    if dry_run {
        match resource.current_state()? {
            ResourceState::Correct => log.info(&format!("already linked: {desc}")),
            ResourceState::Invalid { reason } => log.warn(&format!("nothing to link: {reason}")),
            ResourceState::Missing => log.dry_run(&format!("would link {desc}")),
            ResourceState::Incorrect { current } => {
                log.dry_run(&format!("would link {desc} (currently {current})"));
            }
        }
        return Ok(());
    }

    match resource.reconcile()? {
        Reconciliation::Linked(_) => log.info(&format!("linked {desc}")),
        Reconciliation::Skipped => log.warn(&format!(
            "nothing to link: source does not exist: {}",
            resource.source.display()
        )),
    }
    Ok(())
}
