//! Homebrew formulae and Brewfile bundles.
use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::ResourceError;
use crate::exec::Executor;

/// `brew <args>`, with a failure reported against `package`.
fn brew_install(brew: &dyn Executor, package: String, args: &[&str]) -> Result<ResourceChange> {
    match brew.run("brew", args) {
        Ok(_) => Ok(ResourceChange::Applied),
        Err(e) => Err(ResourceError::PackageInstall {
            package,
            source: e.into(),
        }
        .into()),
    }
}

/// Names printed by `brew list --formula -1`, or nothing when brew fails.
///
/// One query serves every formula; an empty set makes each formula look
/// missing and `brew install` then reports the real problem.
///
/// # Errors
///
/// `brew` cannot be spawned.
pub fn installed_formulae(brew: &dyn Executor) -> Result<HashSet<String>> {
    let out = brew.run_unchecked("brew", &["list", "--formula", "-1"])?;
    if !out.success {
        return Ok(HashSet::new());
    }
    Ok(out
        .stdout
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect())
}

/// A formula that should be installed, optionally tap-qualified
/// (`owner/tap/name`).
#[derive(Debug)]
pub struct Formula<'a> {
    name: &'a str,
    brew: &'a dyn Executor,
}

impl<'a> Formula<'a> {
    /// Formula `name`, queried and installed through `brew`.
    #[must_use]
    pub const fn new(name: &'a str, brew: &'a dyn Executor) -> Self {
        Self { name, brew }
    }

    /// Name as `brew list` prints it.
    #[must_use]
    pub fn listed_name(&self) -> &'a str {
        self.name.rsplit('/').next().unwrap_or(self.name)
    }

    /// State according to an [`installed_formulae`] snapshot.
    #[must_use]
    pub fn state_in(&self, installed: &HashSet<String>) -> ResourceState {
        if installed.contains(self.listed_name()) {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        }
    }
}

impl Applicable for Formula<'_> {
    fn description(&self) -> String {
        format!("formula {}", self.name)
    }

    fn apply(&self) -> Result<ResourceChange> {
        brew_install(self.brew, self.name.to_string(), &["install", self.name])
    }
}

impl Resource for Formula<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let out = self.brew.run_unchecked("brew", &["list", "--versions", self.name])?;
        Ok(if out.success && !out.stdout.trim().is_empty() {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        })
    }
}

/// Everything a Brewfile lists.
#[derive(Debug)]
pub struct Bundle<'a> {
    brewfile: PathBuf,
    brew: &'a dyn Executor,
}

impl<'a> Bundle<'a> {
    /// Bundle described by `brewfile`.
    #[must_use]
    pub const fn new(brewfile: PathBuf, brew: &'a dyn Executor) -> Self {
        Self { brewfile, brew }
    }

    fn bundle(&self, verb: &str) -> [String; 3] {
        [
            "bundle".to_string(),
            verb.to_string(),
            format!("--file={}", self.brewfile.display()),
        ]
    }
}

impl Applicable for Bundle<'_> {
    fn description(&self) -> String {
        format!("bundle {}", self.brewfile.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let argv = self.bundle("install");
        let args: Vec<&str> = argv.iter().map(String::as_str).collect();
        brew_install(self.brew, self.brewfile.display().to_string(), &args)
    }
}

impl Resource for Bundle<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.brewfile.is_file() {
            return Ok(ResourceState::Invalid {
                reason: format!("no Brewfile at {}", self.brewfile.display()),
            });
        }
        let argv = self.bundle("check");
        let args: Vec<&str> = argv.iter().map(String::as_str).collect();
        let out = self.brew.run_unchecked("brew", &args)?;
        Ok(if out.success {
            ResourceState::Correct
        } else {
            ResourceState::Incorrect {
                current: "dependencies not satisfied".to_string(),
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    #[test]
    fn tap_prefix_is_not_part_of_the_listed_name() {
        let brew = MockExecutor::ok("");
        assert_eq!(
            Formula::new("homebrew/cask-fonts/font-fira-code", &brew).listed_name(),
            "font-fira-code"
        );
        assert_eq!(Formula::new("ripgrep", &brew).listed_name(), "ripgrep");
    }

    #[test]
    fn snapshot_lookup() {
        let brew = MockExecutor::ok("git\nmas\n\n  dockutil \n");
        let installed = installed_formulae(&brew).unwrap();
        assert_eq!(installed.len(), 3);
        assert_eq!(brew.calls(), ["brew list --formula -1"]);

        let states: Vec<_> = ["mas", "someone/tap/dockutil", "ripgrep"]
            .into_iter()
            .map(|name| Formula::new(name, &brew).state_in(&installed))
            .collect();
        assert_eq!(
            states,
            [
                ResourceState::Correct,
                ResourceState::Correct,
                ResourceState::Missing
            ]
        );
    }

    #[test]
    fn failing_list_means_nothing_installed() {
        assert!(installed_formulae(&MockExecutor::fail()).unwrap().is_empty());
    }

    #[test]
    fn single_formula_lookup_uses_versions() {
        let brew = MockExecutor::with_responses(vec![
            (true, "mas 1.8.6\n".to_string()),
            (false, String::new()),
        ]);
        let mas = Formula::new("mas", &brew);
        assert_eq!(mas.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(mas.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(brew.calls()[0], "brew list --versions mas");
    }

    #[test]
    fn install_failure_names_the_formula() {
        let brew = MockExecutor::fail();
        let err = Formula::new("not-a-formula", &brew).apply().unwrap_err();
        assert_eq!(err.to_string(), "Package installation failed: not-a-formula");
        assert_eq!(brew.calls(), ["brew install not-a-formula"]);
    }

    #[test]
    fn bundle_without_brewfile_runs_nothing() {
        let brew = MockExecutor::ok("");
        let bundle = Bundle::new(PathBuf::from("/nonexistent/Brewfile"), &brew);
        assert!(matches!(
            bundle.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
        assert_eq!(brew.call_count(), 0);
    }

    #[test]
    fn bundle_checks_then_installs() {
        let dir = tempfile::tempdir().unwrap();
        let brewfile = dir.path().join("Brewfile");
        std::fs::write(&brewfile, "brew \"mas\"\n").unwrap();
        let brew = MockExecutor::with_responses(vec![(false, String::new()), (true, String::new())]);
        let bundle = Bundle::new(brewfile.clone(), &brew);

        assert!(matches!(
            bundle.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
        assert_eq!(bundle.apply().unwrap(), ResourceChange::Applied);
        let file = brewfile.display();
        assert_eq!(
            brew.calls(),
            [
                format!("brew bundle check --file={file}"),
                format!("brew bundle install --file={file}"),
            ]
        );
    }
}
