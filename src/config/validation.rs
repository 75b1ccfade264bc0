//! Non-fatal configuration checks, reported as warnings before a run.
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use super::Config;
use crate::paths;

/// Longest computer name `scutil` accepts without truncating the local
/// hostname.
const MAX_COMPUTER_NAME: usize = 63;

/// Something suspicious in one of the `conf/*.toml` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// File the entry came from, e.g. `symlinks.toml`.
    pub file: &'static str,
    /// The offending value.
    pub item: String,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.file, self.item, self.message)
    }
}

struct Checker<'a> {
    config: &'a Config,
    home: &'a Path,
    found: Vec<Warning>,
}

impl Checker<'_> {
    fn flag(&mut self, file: &'static str, item: &str, message: impl Into<String>) {
        self.found.push(Warning {
            file,
            item: item.to_string(),
            message: message.into(),
        });
    }

    fn symlinks(&mut self) {
        let (config, home) = (self.config, self.home);
        let root = &config.root;
        let mut destinations = HashSet::new();
        for link in &config.symlinks {
            let source = paths::resolve(&link.source, home, root);
            if !source.exists() {
                self.flag(
                    "symlinks.toml",
                    &link.source,
                    format!("source does not exist: {}", source.display()),
                );
            }
            let destination = paths::resolve(&link.destination(), home, root);
            if !destinations.insert(destination.clone()) {
                self.flag(
                    "symlinks.toml",
                    &link.source,
                    format!("duplicate destination: {}", destination.display()),
                );
            }
        }
    }

    fn identity(&mut self) {
        let config = self.config;
        let identity = &config.identity;
        if !identity.email.is_empty() && !identity.email.contains('@') {
            self.flag("identity.toml", &identity.email, "email address has no '@'");
        }
        if identity.computer_name.len() > MAX_COMPUTER_NAME {
            self.flag(
                "identity.toml",
                &identity.computer_name,
                format!("computer name longer than {MAX_COMPUTER_NAME} characters"),
            );
        }
    }

    fn defaults(&mut self) {
        let config = self.config;
        for entry in &config.defaults {
            let item = format!("{} {}", entry.domain, entry.key);
            if entry.domain.trim().is_empty() || entry.key.trim().is_empty() {
                self.flag(
                    "defaults.toml",
                    &item,
                    "preference domain and key must not be empty",
                );
            }
            if entry.domain.starts_with("/Library/") && !entry.sudo {
                self.flag(
                    "defaults.toml",
                    &item,
                    "system-wide preference without sudo = true",
                );
            }
        }
    }

    fn gitignore(&mut self) {
        let config = self.config;
        for url in &config.gitignore.urls {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                self.flag("gitignore.toml", url, "URL must use http or https");
            }
        }
    }

    fn packages(&mut self) {
        let config = self.config;
        if let Some(brewfile) = &config.packages.brewfile
            && !paths::resolve(brewfile, self.home, &config.root).exists()
        {
            self.flag("packages.toml", brewfile, "Brewfile does not exist");
        }
    }
}

/// Every warning for `config`, grouped by file in load order.
#[must_use]
pub fn validate(config: &Config, home: &Path) -> Vec<Warning> {
    let mut checker = Checker {
        config,
        home,
        found: Vec::new(),
    };
    checker.symlinks();
    checker.identity();
    checker.defaults();
    checker.gitignore();
    checker.packages();
    checker.found
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::defaults::{DefaultsEntry, DefaultsValue};
    use crate::config::symlinks::Symlink;
    use std::path::PathBuf;

    fn in_dir(dir: &Path) -> Config {
        Config {
            root: dir.to_path_buf(),
            ..Config::default()
        }
    }

    fn link(source: &str) -> Symlink {
        Symlink {
            source: source.to_string(),
            target: None,
        }
    }

    #[test]
    fn clean_config_has_no_warnings() {
        assert!(validate(&Config::default(), Path::new("/Users/ada")).is_empty());
    }

    #[test]
    fn missing_link_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".zshrc"), "").unwrap();
        let config = Config {
            symlinks: vec![link(".zshrc"), link(".missing")],
            ..in_dir(dir.path())
        };
        let warnings = validate(&config, Path::new("/Users/ada"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, ".missing");
    }

    #[test]
    fn two_links_to_one_destination() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("other")).unwrap();
        std::fs::write(dir.path().join("a"), "").unwrap();
        std::fs::write(dir.path().join("other/a"), "").unwrap();
        let config = Config {
            symlinks: vec![link("a"), link("other/a")],
            ..in_dir(dir.path())
        };
        let warnings = validate(&config, Path::new("/Users/ada"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("duplicate destination"));
    }

    #[test]
    fn identity_checks() {
        let mut config = Config::default();
        config.identity.email = "ada.example.com".to_string();
        config.identity.computer_name = "m".repeat(MAX_COMPUTER_NAME + 1);
        let files: Vec<_> = validate(&config, Path::new("/"))
            .iter()
            .map(|w| w.file)
            .collect();
        assert_eq!(files, ["identity.toml", "identity.toml"]);
    }

    #[test]
    fn system_preference_needs_sudo() {
        let config = Config {
            defaults: vec![DefaultsEntry {
                domain: "/Library/Preferences/com.apple.commerce".to_string(),
                key: "AutoUpdateRestartRequired".to_string(),
                value: DefaultsValue::Bool(true),
                description: None,
                sudo: false,
            }],
            ..Config::default()
        };
        let warnings = validate(&config, Path::new("/"));
        assert_eq!(
            warnings[0].to_string(),
            "defaults.toml [/Library/Preferences/com.apple.commerce AutoUpdateRestartRequired]: \
             system-wide preference without sudo = true"
        );
    }

    #[test]
    fn non_http_url_and_missing_brewfile() {
        let mut config = in_dir(&PathBuf::from("/nonexistent"));
        config.gitignore.urls = vec!["ftp://example.com/x".to_string()];
        config.packages.brewfile = Some("Brewfile".to_string());
        let files: Vec<_> = validate(&config, Path::new("/Users/ada"))
            .into_iter()
            .map(|w| w.file)
            .collect();
        assert_eq!(files, ["gitignore.toml", "packages.toml"]);
    }
}
