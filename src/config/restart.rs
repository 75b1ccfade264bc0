//! Applications restarted at the end of a run (`restart.toml`).
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use super::toml_loader;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RestartFile {
    apps: Vec<String>,
}

/// Load the process names to `killall`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load(path: &Path) -> Result<Vec<String>> {
    let file: RestartFile = toml_loader::load_config(path)?;
    Ok(file.apps)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::test_helpers::{assert_load_missing_returns_empty, write_temp_toml};

    #[test]
    fn load_apps() {
        let (_dir, path) = write_temp_toml("apps = [\"Dock\", \"Finder\", \"SystemUIServer\"]\n");
        assert_eq!(load(&path).unwrap(), vec!["Dock", "Finder", "SystemUIServer"]);
    }

    #[test]
    fn load_missing_file_returns_empty() {
        assert_load_missing_returns_empty(load);
    }
}
