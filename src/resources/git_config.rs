//! Global git configuration entries.
use std::path::Path;

use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::{ExecResult, Executor};

/// Stands in for secret values in descriptions and reported state.
const HIDDEN: &str = "<hidden>";

/// One `git config` entry, e.g. `user.email`.
///
/// Written to `~/.gitconfig` unless [`in_file`](Self::in_file) names another
/// config file.
#[derive(Debug)]
pub struct GitSetting<'a> {
    key: &'a str,
    value: &'a str,
    file: Option<&'a Path>,
    secret: bool,
    git: &'a dyn Executor,
}

impl<'a> GitSetting<'a> {
    /// Setting `key` to `value` through `git`.
    #[must_use]
    pub const fn new(key: &'a str, value: &'a str, git: &'a dyn Executor) -> Self {
        Self {
            key,
            value,
            file: None,
            secret: false,
            git,
        }
    }

    /// Read and write `file` (`git config -f`) instead of the global config.
    #[must_use]
    pub const fn in_file(mut self, file: &'a Path) -> Self {
        self.file = Some(file);
        self
    }

    /// Never show the value, old or new, in descriptions or state.
    #[must_use]
    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    const fn shown<'v>(&self, value: &'v str) -> &'v str {
        if self.secret { HIDDEN } else { value }
    }

    fn config(&self, args: &[&str]) -> Result<ExecResult> {
        let scope = self.file.map_or_else(
            || vec!["--global".to_string()],
            |file| vec!["-f".to_string(), file.display().to_string()],
        );
        let mut argv = vec!["config"];
        argv.extend(scope.iter().map(String::as_str));
        argv.extend_from_slice(args);
        if args.first() == Some(&"--get") {
            self.git.run_unchecked("git", &argv)
        } else {
            self.git.run("git", &argv)
        }
    }
}

impl Applicable for GitSetting<'_> {
    fn description(&self) -> String {
        format!("git {}={}", self.key, self.shown(self.value))
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.config(&[self.key, self.value])?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for GitSetting<'_> {
    /// An unset key makes `git config --get` exit 1 with no output; both that
    /// and an empty value count as missing.
    fn current_state(&self) -> Result<ResourceState> {
        let out = self.config(&["--get", self.key])?;
        let current = out.stdout.trim();
        Ok(match current {
            _ if !out.success || current.is_empty() => ResourceState::Missing,
            _ if current == self.value => ResourceState::Correct,
            _ => ResourceState::Incorrect {
                current: self.shown(current).to_string(),
            },
        })
    }
}
