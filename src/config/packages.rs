//! Homebrew package configuration (`packages.toml`).
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use super::toml_loader;

/// Packages to install.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Packages {
    /// Brewfile for `brew bundle`, relative to the repository root.
    pub brewfile: Option<String>,
    /// Individual formulae for `brew install`.
    pub formulae: Vec<String>,
    /// `brew update` and `brew upgrade` before installing.
    pub update: bool,
    /// `brew cleanup` once everything is installed.
    pub cleanup: bool,
}

impl Default for Packages {
    fn default() -> Self {
        Self {
            brewfile: None,
            formulae: Vec::new(),
            update: true,
            cleanup: true,
        }
    }
}

impl Packages {
    /// Whether anything is installed through Homebrew at all.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.brewfile.is_some() || !self.formulae.is_empty()
    }
}

/// Load `packages.toml`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load(path: &Path) -> Result<Packages> {
    toml_loader::load_config(path)
}
