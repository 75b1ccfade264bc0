//! macOS computer name resource.
use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

const SMB_SERVER_PLIST: &str = "/Library/Preferences/SystemConfiguration/com.apple.smb.server";

/// The Mac's sharing name, host name and Bonjour name.
#[derive(Debug)]
pub struct ComputerNameResource<'a> {
    /// Desired computer name.
    pub name: String,
    executor: &'a dyn Executor,
}

impl<'a> ComputerNameResource<'a> {
    /// Create a new computer name resource.
    #[must_use]
    pub fn new(name: impl Into<String>, executor: &'a dyn Executor) -> Self {
        Self {
            name: name.into(),
            executor,
        }
    }

    /// `LocalHostName` only allows letters, digits and hyphens.
    #[must_use]
    pub fn local_host_name(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
            .collect()
    }
}

impl Applicable for ComputerNameResource<'_> {
    fn description(&self) -> String {
        format!("computer name = {}", self.name)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let local = self.local_host_name();
        self.executor
            .run("sudo", &["scutil", "--set", "ComputerName", &self.name])?;
        self.executor
            .run("sudo", &["scutil", "--set", "HostName", &self.name])?;
        self.executor
            .run("sudo", &["scutil", "--set", "LocalHostName", &local])?;
        self.executor.run(
            "sudo",
            &[
                "defaults",
                "write",
                SMB_SERVER_PLIST,
                "NetBIOSName",
                "-string",
                &self.name,
            ],
        )?;
        // cache flush is cosmetic; a failure does not undo the rename
        self.executor.run_unchecked("dscacheutil", &["-flushcache"])?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ComputerNameResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let result = self
            .executor
            .run_unchecked("scutil", &["--get", "ComputerName"])?;
        let current = result.stdout.trim_end_matches(['\n', '\r']).to_string();
        if !result.success || current.is_empty() {
            Ok(ResourceState::Missing)
        } else if current == self.name {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect { current })
        }
    }
}
