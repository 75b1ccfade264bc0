//! Global gitignore settings (`gitignore.toml`).
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::toml_loader;
use crate::fetch::DEFAULT_TIMEOUT;
use crate::gitignore::DEFAULT_URLS;

/// Where the managed ignore file lives and which remote lists feed it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitignoreConfig {
    /// Managed file, relative to the repository root or `~`-prefixed.
    pub file: String,
    /// Remote lists, merged in this order.
    pub urls: Vec<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitignoreConfig {
    fn default() -> Self {
        Self {
            file: ".gitignore".to_string(),
            urls: DEFAULT_URLS.iter().map(ToString::to_string).collect(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl GitignoreConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Load `gitignore.toml`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load(path: &Path) -> Result<GitignoreConfig> {
    toml_loader::load_config(path)
}
