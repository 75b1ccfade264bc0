//! Configuration loaded from `conf/*.toml`.
pub mod defaults;
pub mod gitignore;
pub mod identity;
pub mod install;
pub mod packages;
pub mod restart;
pub mod symlinks;
pub mod toml_loader;
pub mod validation;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// All loaded configuration from the `conf/` directory.
#[derive(Debug, Default)]
pub struct Config {
    /// Repository root the files were read from.
    pub root: PathBuf,
    /// `identity.toml`
    pub identity: identity::Identity,
    /// `symlinks.toml`
    pub symlinks: Vec<symlinks::Symlink>,
    /// `gitignore.toml`
    pub gitignore: gitignore::GitignoreConfig,
    /// `packages.toml`
    pub packages: packages::Packages,
    /// `defaults.toml`
    pub defaults: Vec<defaults::DefaultsEntry>,
    /// Applications from `restart.toml`.
    pub restart: Vec<String>,
    /// `install.toml`
    pub install: install::InstallSettings,
}

impl Config {
    /// Load all configuration from `<root>/conf/`.
    ///
    /// Missing files yield empty (or defaulted) sections.
    ///
    /// # Errors
    ///
    /// Returns an error if any present file cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let conf = root.join("conf");

        let identity =
            identity::load(&conf.join("identity.toml")).context("loading identity.toml")?;

        let symlinks =
            symlinks::load(&conf.join("symlinks.toml")).context("loading symlinks.toml")?;

        let gitignore =
            gitignore::load(&conf.join("gitignore.toml")).context("loading gitignore.toml")?;

        let packages =
            packages::load(&conf.join("packages.toml")).context("loading packages.toml")?;

        let defaults =
            defaults::load(&conf.join("defaults.toml")).context("loading defaults.toml")?;

        let restart = restart::load(&conf.join("restart.toml")).context("loading restart.toml")?;

        let install = install::load(&conf.join("install.toml")).context("loading install.toml")?;

        Ok(Self {
            root: root.to_path_buf(),
            identity,
            symlinks,
            gitignore,
            packages,
            defaults,
            restart,
            install,
        })
    }
}
