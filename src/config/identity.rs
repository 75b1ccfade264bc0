//! Personal identity loading (`identity.toml`).
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use super::toml_loader;

/// Who owns this machine.
///
/// Empty fields mean "not configured"; tasks that need a field skip
/// themselves when it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Identity {
    /// Full name, written to `user.name`.
    pub name: String,
    /// Email address, written to `user.email`.
    pub email: String,
    /// GitHub login, written to `github.user`.
    pub github_user: String,
    /// Sharing name of the Mac.
    pub computer_name: String,
}

impl Identity {
    /// Global git settings derived from this identity, empty fields omitted.
    #[must_use]
    pub fn git_settings(&self) -> Vec<(&'static str, &str)> {
        [
            ("user.name", self.name.as_str()),
            ("user.email", self.email.as_str()),
            ("github.user", self.github_user.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// Load `identity.toml`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load(path: &Path) -> Result<Identity> {
    toml_loader::load_config(path)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::test_helpers::write_temp_toml;

    #[test]
    fn load_full_identity() {
        let (_dir, path) = write_temp_toml(
            r#"name = "Ada Lovelace"
email = "ada@example.com"
github_user = "ada"
computer_name = "Analytical Engine"
"#,
        );
        let identity = load(&path).unwrap();
        assert_eq!(identity.name, "Ada Lovelace");
        assert_eq!(identity.computer_name, "Analytical Engine");
        assert_eq!(identity.git_settings().len(), 3);
    }

    #[test]
    fn git_settings_skip_empty_fields() {
        let identity = Identity {
            email: "ada@example.com".to_string(),
            ..Identity::default()
        };
        assert_eq!(identity.git_settings(), vec![("user.email", "ada@example.com")]);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let (_dir, path) = write_temp_toml("nmae = \"typo\"\n");
        assert!(load(&path).is_err());
    }

    #[test]
    fn load_missing_file_returns_default() {
        assert_eq!(
            load(Path::new("/nonexistent/identity.toml")).unwrap(),
            Identity::default()
        );
    }
}
