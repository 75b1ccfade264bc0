//! Run-wide settings (`install.toml`).
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use super::toml_loader;

/// How `install` behaves as a whole, beyond the individual tasks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallSettings {
    /// Hold a `caffeinate` assertion so the Mac does not sleep mid-run.
    pub keep_awake: bool,
    /// Install pending macOS and App Store updates before anything else.
    pub software_update: bool,
    /// Things left to do by hand, listed at the end of a run.
    pub manual_steps: Vec<String>,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            keep_awake: true,
            software_update: false,
            manual_steps: Vec::new(),
        }
    }
}

/// Load `install.toml`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load(path: &Path) -> Result<InstallSettings> {
    toml_loader::load_config(path)
}
