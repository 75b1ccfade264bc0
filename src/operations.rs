//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that symlink reconciliation can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`, which also counts
//! mutating calls.

use std::io;
use std::path::{Path, PathBuf};

/// Abstraction over the filesystem queries and mutations used by resources.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` itself is a symbolic link (dangling or not).
    fn is_symlink(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a real directory (not a symlink to one).
    fn is_real_dir(&self, path: &Path) -> bool;

    /// Returns `true` if anything (file, directory, symlink) sits at `path`.
    fn entry_exists(&self, path: &Path) -> bool {
        self.exists(path) || self.is_symlink(path)
    }

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Resolve `path` to an absolute path with every symlink followed.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` (or a link along the way) does not exist.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Remove the file or symlink at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails (e.g. permission denied).
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` pointing to `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()>;

    /// Create `path` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok_and(|m| m.is_symlink())
    }

    fn is_real_dir(&self, path: &Path) -> bool {
        path.symlink_metadata()
            .is_ok_and(|m| m.is_dir() && !m.is_symlink())
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        dunce::canonicalize(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        // A symlink to a directory is still removed with remove_file on Unix.
        std::fs::remove_file(path)
    }

    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(source, link)
        }
        #[cfg(windows)]
        {
            if source.is_dir() {
                std::os::windows::fs::symlink_dir(source, link)
            } else {
                std::os::windows::fs::symlink_file(source, link)
            }
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// A node of the in-memory filesystem used by [`MockFileSystemOps`].
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEntry {
    /// Regular file.
    File,
    /// Real directory.
    Dir,
    /// Symbolic link to the given path.
    Symlink(PathBuf),
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Paths are treated as already absolute; only the final path component is
/// resolved when following links.  Every mutating call (`remove`, `symlink`,
/// `create_dir_all`) is counted so tests can assert idempotence.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    entries: std::sync::Mutex<std::collections::HashMap<PathBuf, MockEntry>>,
    mutations: std::sync::atomic::AtomicUsize,
    read_only: Vec<PathBuf>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular file at `path`.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::File);
        self
    }

    /// Add a real directory at `path`.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::Dir);
        self
    }

    /// Add a symlink at `path` pointing to `target`.
    #[must_use]
    pub fn with_symlink(self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::Symlink(target.into()));
        self
    }

    /// Make `remove` fail with `PermissionDenied` for `path`.
    #[must_use]
    pub fn with_read_only(mut self, path: impl Into<PathBuf>) -> Self {
        self.read_only.push(path.into());
        self
    }

    /// Number of mutating calls made so far.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// The entry currently stored at `path`, if any.
    #[must_use]
    pub fn entry(&self, path: &Path) -> Option<MockEntry> {
        self.lock().get(path).cloned()
    }

    fn insert(&self, path: PathBuf, entry: MockEntry) {
        self.lock().insert(path, entry);
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, std::collections::HashMap<PathBuf, MockEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn mutate(&self) {
        self.mutations
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.canonicalize(path).is_ok()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Symlink(_)))
    }

    fn is_real_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Dir))
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        match self.lock().get(path) {
            Some(MockEntry::Symlink(target)) => Ok(target.clone()),
            Some(_) => Err(io::Error::from(io::ErrorKind::InvalidInput)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let entries = self.lock();
        let mut current = path.to_path_buf();
        for _ in 0..40 {
            match entries.get(&current) {
                Some(MockEntry::Symlink(target)) => current = target.clone(),
                Some(_) => return Ok(current),
                None => return Err(io::Error::from(io::ErrorKind::NotFound)),
            }
        }
        Err(io::Error::other("too many levels of symbolic links"))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.mutate();
        if self.read_only.iter().any(|p| p == path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
        self.mutate();
        let mut entries = self.lock();
        if entries.contains_key(link) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        entries.insert(link.to_path_buf(), MockEntry::Symlink(source.to_path_buf()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.mutate();
        self.lock()
            .entry(path.to_path_buf())
            .or_insert(MockEntry::Dir);
        Ok(())
    }
}
