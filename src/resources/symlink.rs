//! Symlink reconciliation.
//!
//! Makes a destination path a symbolic link to a source path, replacing a
//! regular file or stale link that is in the way.  Reconciling an already
//! correct link performs no filesystem mutation.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::ResourceError;
use crate::operations::FileSystemOps;
use crate::paths;

/// A desired link, as written by the user: paths may start with `~` and may
/// be relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    /// What the link points to.
    pub source: String,
    /// Where the link is created.
    pub destination: String,
}

impl LinkSpec {
    /// Create a link spec with an explicit destination.
    #[must_use]
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Link `source` into the home directory under its own file name.
    #[must_use]
    pub fn to_home(source: impl Into<String>) -> Self {
        let source = source.into();
        let destination = paths::home_destination(&source);
        Self {
            source,
            destination,
        }
    }
}

/// Outcome of reconciling one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The destination is (now) a link to the source.
    Linked(PathBuf),
    /// The source does not exist yet; nothing was touched.
    Skipped,
}

/// A symlink resource that can be checked and applied.
#[derive(Debug, Clone)]
pub struct SymlinkResource<'a> {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
    fs: &'a dyn FileSystemOps,
}

impl<'a> SymlinkResource<'a> {
    /// Create a new symlink resource from already absolute paths.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf, fs: &'a dyn FileSystemOps) -> Self {
        Self { source, target, fs }
    }

    /// Resolve a [`LinkSpec`] against `home` (for `~`) and `base` (for
    /// relative paths).
    #[must_use]
    pub fn from_spec(spec: &LinkSpec, home: &Path, base: &Path, fs: &'a dyn FileSystemOps) -> Self {
        Self::new(
            paths::resolve(&spec.source, home, base),
            paths::resolve(&spec.destination, home, base),
            fs,
        )
    }

    /// Make the target a link to the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing target cannot be removed (e.g. it is
    /// not writable, or it is a real directory) or the link cannot be created.
    pub fn reconcile(&self) -> Result<Reconciliation> {
        Ok(match self.apply()? {
            ResourceChange::Skipped { .. } => Reconciliation::Skipped,
            ResourceChange::Applied | ResourceChange::AlreadyCorrect => {
                Reconciliation::Linked(self.target.clone())
            }
        })
    }

    /// `true` if the target already resolves to the source: a link to it,
    /// the source path itself, or a path through a linked parent directory.
    fn points_at_source(&self) -> bool {
        match (
            self.fs.canonicalize(&self.target),
            self.fs.canonicalize(&self.source),
        ) {
            (Ok(resolved), Ok(source)) => resolved == source,
            _ => false,
        }
    }

    fn replace(&self) -> Result<()> {
        if let Some(parent) = self.target.parent()
            && !self.fs.exists(parent)
        {
            self.fs
                .create_dir_all(parent)
                .with_context(|| format!("create parent: {}", parent.display()))?;
        }

        if self.fs.is_real_dir(&self.target) {
            return Err(ResourceError::DirectoryInTheWay(self.target.display().to_string()).into());
        }

        if self.fs.entry_exists(&self.target) {
            self.fs
                .remove(&self.target)
                .with_context(|| format!("remove existing: {}", self.target.display()))?;
        }

        self.fs
            .symlink(&self.source, &self.target)
            .with_context(|| {
                format!(
                    "create link: {} -> {}",
                    self.target.display(),
                    self.source.display()
                )
            })?;
        Ok(())
    }
}

impl Applicable for SymlinkResource<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        match self.current_state()? {
            ResourceState::Invalid { reason } => Ok(ResourceChange::Skipped { reason }),
            ResourceState::Correct => Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Missing | ResourceState::Incorrect { .. } => {
                self.replace()?;
                Ok(ResourceChange::Applied)
            }
        }
    }
}

impl Resource for SymlinkResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.fs.exists(&self.source) {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        // never remove the target when it is the source under another name
        if self.points_at_source() {
            return Ok(ResourceState::Correct);
        }

        if self.fs.is_symlink(&self.target) {
            let current = self.fs.read_link(&self.target).map_or_else(
                |_| "unreadable symlink".to_string(),
                |existing| format!("points to {}", existing.display()),
            );
            return Ok(ResourceState::Incorrect { current });
        }

        if self.fs.is_real_dir(&self.target) {
            return Ok(ResourceState::Incorrect {
                current: "target is a real directory".to_string(),
            });
        }

        if self.fs.exists(&self.target) {
            return Ok(ResourceState::Incorrect {
                current: "target is a regular file".to_string(),
            });
        }

        Ok(ResourceState::Missing)
    }
}

/// Reconcile one [`LinkSpec`] against the filesystem.
///
/// # Errors
///
/// See [`SymlinkResource::reconcile`].
pub fn reconcile(
    spec: &LinkSpec,
    home: &Path,
    base: &Path,
    fs: &dyn FileSystemOps,
) -> Result<Reconciliation> {
    SymlinkResource::from_spec(spec, home, base, fs).reconcile()
}
