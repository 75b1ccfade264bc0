//! macOS preference configuration (`defaults.toml`).
use anyhow::Result;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use super::toml_loader;

/// Tolerance when comparing a read-back float with the desired one.
const FLOAT_TOLERANCE: f64 = 1e-6;

/// A typed preference value, mapped from the TOML value type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultsValue {
    /// `-bool`; `defaults read` reports it as `1` / `0`.
    Bool(bool),
    /// `-int`
    Int(i64),
    /// `-float`
    Float(f64),
    /// `-string`
    String(String),
}

impl DefaultsValue {
    /// Type flag for `defaults write`.
    #[must_use]
    pub const fn type_flag(&self) -> &'static str {
        match self {
            Self::Bool(_) => "-bool",
            Self::Int(_) => "-int",
            Self::Float(_) => "-float",
            Self::String(_) => "-string",
        }
    }

    /// Value argument for `defaults write`.
    #[must_use]
    pub fn to_arg(&self) -> String {
        self.to_string()
    }

    /// `true` if `read` (trimmed `defaults read` output) already holds this value.
    #[must_use]
    pub fn matches(&self, read: &str) -> bool {
        match self {
            Self::Bool(b) => match read {
                "1" | "true" | "YES" => *b,
                "0" | "false" | "NO" => !*b,
                _ => false,
            },
            Self::Int(n) => read.parse::<i64>().is_ok_and(|v| v == *n),
            Self::Float(f) => read
                .parse::<f64>()
                .is_ok_and(|v| (v - f).abs() < FLOAT_TOLERANCE),
            Self::String(s) => read == s,
        }
    }
}

impl fmt::Display for DefaultsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// One preference to apply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsEntry {
    /// Preference domain (`com.apple.dock`, `NSGlobalDomain`, or a plist path).
    pub domain: String,
    /// Preference key.
    pub key: String,
    /// Desired value.
    pub value: DefaultsValue,
    /// What the setting does, shown in logs.
    #[serde(default)]
    pub description: Option<String>,
    /// Write with `sudo` (system-wide preferences).
    #[serde(default)]
    pub sudo: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DefaultsFile {
    defaults: Vec<DefaultsEntry>,
}

/// Load `defaults.toml`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load(path: &Path) -> Result<Vec<DefaultsEntry>> {
    let file: DefaultsFile = toml_loader::load_config(path)?;
    Ok(file.defaults)
}
