// Shared helpers for integration tests.
//
// Provides a throwaway repository (with `conf/`) and home directory, a
// canned HTTP fetcher, and an executor that pretends no tools are installed,
// so each integration test can drive real tasks against the real filesystem
// without touching the machine it runs on.
#![allow(dead_code, clippy::expect_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;
use dotfyles::config::Config;
use dotfyles::error::FetchError;
use dotfyles::exec::{ExecResult, Executor};
use dotfyles::fetch::Fetcher;
use dotfyles::logging::{Log, Logger};
use dotfyles::operations::SystemFileSystemOps;
use dotfyles::platform::{Os, Platform};
use dotfyles::tasks::Context;

/// Fetcher serving fixed bodies; any other URL fails like a network error.
#[derive(Debug, Default)]
pub struct CannedFetcher {
    bodies: HashMap<String, String>,
}

impl CannedFetcher {
    pub fn new(bodies: &[(&str, &str)]) -> Self {
        Self {
            bodies: bodies
                .iter()
                .map(|(url, body)| ((*url).to_string(), (*body).to_string()))
                .collect(),
        }
    }
}

impl Fetcher for CannedFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Request {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

/// Executor for a machine with no external tools at all.
#[derive(Debug)]
pub struct NoToolsExecutor;

impl Executor for NoToolsExecutor {
    fn run(&self, program: &str, _: &[&str]) -> anyhow::Result<ExecResult> {
        bail!("{program}: not installed")
    }

    fn run_unchecked(&self, program: &str, _: &[&str]) -> anyhow::Result<ExecResult> {
        bail!("{program}: not installed")
    }

    fn which(&self, _: &str) -> bool {
        false
    }
}

/// A temporary repository root plus a temporary home directory.
///
/// Both directories are deleted when the value is dropped.
pub struct TestRepo {
    pub root: tempfile::TempDir,
    pub home: tempfile::TempDir,
}

impl TestRepo {
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// Load configuration from this repository's `conf/`.
    pub fn load_config(&self) -> Config {
        Config::load(self.root.path()).expect("load config")
    }

    /// Build a task context for `os` using the real filesystem.
    pub fn context(&self, os: Os, fetcher: CannedFetcher, dry_run: bool) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::new("test"));
        let ctx = Context {
            config: Arc::new(self.load_config()),
            platform: Arc::new(Platform::new(os)),
            log: Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            home: self.home.path().to_path_buf(),
            executor: Arc::new(NoToolsExecutor),
            parallel: false,
            fs_ops: Arc::new(SystemFileSystemOps),
            fetcher: Arc::new(fetcher),
        };
        (ctx, log)
    }
}

/// Fluent builder for [`TestRepo`].
pub struct TestRepoBuilder {
    repo: TestRepo,
}

impl TestRepoBuilder {
    /// Begin with an empty `conf/` directory.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create root dir");
        let home = tempfile::tempdir().expect("create home dir");
        std::fs::create_dir_all(root.path().join("conf")).expect("create conf dir");
        Self {
            repo: TestRepo { root, home },
        }
    }

    /// Write `content` to `conf/<filename>`.
    pub fn with_config_file(self, filename: &str, content: &str) -> Self {
        let path = self.repo.root.path().join("conf").join(filename);
        std::fs::write(path, content).expect("write config file");
        self
    }

    /// Create a file at `relative` inside the repository.
    pub fn with_source_file(self, relative: &str, content: &str) -> Self {
        let path = self.repo.root.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(&path, content).expect("write source file");
        self
    }

    /// Create a file at `relative` inside the home directory.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        let path = self.repo.home.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create home parent");
        }
        std::fs::write(&path, content).expect("write home file");
        self
    }

    pub fn build(self) -> TestRepo {
        self.repo
    }
}

/// Path of `relative` under `dir`.
pub fn under(dir: &Path, relative: &str) -> PathBuf {
    dir.join(relative)
}
