//! Symlink configuration loading (`symlinks.toml`).
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use super::toml_loader;
use crate::paths;
use crate::resources::symlink::LinkSpec;

/// A symlink to create: target → source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Symlink {
    /// Path of the linked file, relative to the repository root or `~`-prefixed.
    pub source: String,
    /// Where the link goes; `~/<basename of source>` when absent.
    pub target: Option<String>,
}

impl Symlink {
    /// The effective destination of the link.
    #[must_use]
    pub fn destination(&self) -> String {
        self.target
            .clone()
            .unwrap_or_else(|| paths::home_destination(&self.source))
    }

    /// Convert into the reconciler's input.
    #[must_use]
    pub fn to_link_spec(&self) -> LinkSpec {
        LinkSpec::new(self.source.clone(), self.destination())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SymlinksFile {
    symlinks: Vec<Symlink>,
}

/// Load symlinks from `symlinks.toml`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load(path: &Path) -> Result<Vec<Symlink>> {
    let file: SymlinksFile = toml_loader::load_config(path)?;
    Ok(file.symlinks)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::test_helpers::{assert_load_missing_returns_empty, write_temp_toml};

    #[test]
    fn load_symlinks_with_and_without_target() {
        let (_dir, path) = write_temp_toml(
            r#"[[symlinks]]
source = ".zshrc"

[[symlinks]]
source = "vscode/settings.json"
target = "~/Library/Application Support/Code/User/settings.json"
"#,
        );
        let symlinks = load(&path).unwrap();
        assert_eq!(symlinks.len(), 2);
        assert_eq!(symlinks[0].destination(), "~/.zshrc");
        assert_eq!(
            symlinks[1].destination(),
            "~/Library/Application Support/Code/User/settings.json"
        );
    }

    #[test]
    fn to_link_spec_uses_default_destination() {
        let symlink = Symlink {
            source: "git/.gitconfig".to_string(),
            target: None,
        };
        assert_eq!(
            symlink.to_link_spec(),
            LinkSpec::new("git/.gitconfig", "~/.gitconfig")
        );
    }

    #[test]
    fn entry_without_source_is_rejected() {
        let (_dir, path) = write_temp_toml("[[symlinks]]\ntarget = \"~/.x\"\n");
        assert!(load(&path).is_err());
    }

    #[test]
    fn load_missing_file_returns_empty() {
        assert_load_missing_returns_empty(load);
    }
}
