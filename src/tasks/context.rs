use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::config::Config;
use crate::exec::Executor;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Platform;

/// Everything a task may touch.
///
/// Side effects only happen through the trait objects held here, so tests
/// replace them with doubles. Cloning is cheap: every field is shared.
#[derive(Clone)]
pub struct Context {
    /// Parsed `conf/*.toml`, never reloaded during a run.
    pub config: Arc<Config>,
    /// Which OS this is.
    pub platform: Arc<Platform>,
    /// Console and log file sink, also records task outcomes.
    pub log: Arc<dyn Log>,
    /// Report what would change without changing it.
    pub dry_run: bool,
    /// Target for `~` in link destinations.
    pub home: PathBuf,
    /// Runs `brew`, `defaults`, `git` and friends.
    pub executor: Arc<dyn Executor>,
    /// Allow rayon fan-out for resources and downloads.
    pub parallel: bool,
    /// Link and directory primitives.
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Downloads remote ignore lists.
    pub fetcher: Arc<dyn Fetcher>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.config.root)
            .field("home", &self.home)
            .field("platform", &self.platform)
            .field("dry_run", &self.dry_run)
            .field("parallel", &self.parallel)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .context("HOME is not set")
}

impl Context {
    /// Context backed by the real filesystem and an HTTP fetcher that uses
    /// the configured download timeout.
    ///
    /// # Errors
    ///
    /// `HOME` is unset or empty.
    pub fn new(
        config: Arc<Config>,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
        parallel: bool,
    ) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.gitignore.timeout()));
        Ok(Self {
            home: home_dir()?,
            fs_ops: Arc::new(SystemFileSystemOps),
            fetcher,
            config,
            platform,
            log,
            dry_run,
            executor,
            parallel,
        })
    }

    /// Repository root, where `conf/` lives and link sources resolve from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Same context, different logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self { log, ..self.clone() }
    }

    /// Same context, different filesystem primitives.
    #[must_use]
    pub fn with_fs_ops(&self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            fs_ops,
            ..self.clone()
        }
    }

    /// Same context, different downloader.
    #[must_use]
    pub fn with_fetcher(&self, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            ..self.clone()
        }
    }
}
