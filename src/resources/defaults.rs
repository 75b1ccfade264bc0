//! macOS `defaults` preference resource.
use anyhow::{Context as _, Result};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::defaults::DefaultsValue;
use crate::error::ResourceError;
use crate::exec::Executor;

/// A single preference (`domain` / `key`) that should hold a typed value.
#[derive(Debug)]
pub struct DefaultsResource<'a> {
    /// Preference domain (e.g. `com.apple.dock`, `NSGlobalDomain`, or a plist path).
    pub domain: String,
    /// Preference key.
    pub key: String,
    /// Desired value.
    pub value: DefaultsValue,
    /// Write through `sudo` (system-wide plists under `/Library`).
    sudo: bool,
    executor: &'a dyn Executor,
}

impl<'a> DefaultsResource<'a> {
    /// Create a new preference resource.
    #[must_use]
    pub fn new(
        domain: impl Into<String>,
        key: impl Into<String>,
        value: DefaultsValue,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            domain: domain.into(),
            key: key.into(),
            value,
            sudo: false,
            executor,
        }
    }

    /// Write the preference with elevated privileges.
    #[must_use]
    pub const fn with_sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }
}

impl Applicable for DefaultsResource<'_> {
    fn description(&self) -> String {
        format!("{} {} = {}", self.domain, self.key, self.value)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let arg = self.value.to_arg();
        let write = [
            "write",
            self.domain.as_str(),
            self.key.as_str(),
            self.value.type_flag(),
            arg.as_str(),
        ];
        let result = if self.sudo {
            let mut args = vec!["defaults"];
            args.extend_from_slice(&write);
            self.executor.run("sudo", &args)
        } else {
            self.executor.run("defaults", &write)
        };
        result.with_context(|| ResourceError::Defaults {
            domain: self.domain.clone(),
            key: self.key.clone(),
        })?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DefaultsResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let result = self
            .executor
            .run_unchecked("defaults", &["read", &self.domain, &self.key])?;
        if !result.success {
            return Ok(ResourceState::Missing);
        }

        let current = result.stdout.trim();
        if self.value.matches(current) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: current.to_string(),
            })
        }
    }
}
