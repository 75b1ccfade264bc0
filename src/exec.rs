//! Running the external tools the setup drives (`brew`, `defaults`, `git`,
//! `scutil`, `killall`).
use anyhow::{Context, Result, bail};
use std::process::{Child, Command, Output, Stdio};

/// Captured outcome of a finished process.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Whether the exit status was zero.
    pub success: bool,
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// Turn a non-zero exit into an error naming `program`.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the exit code and trimmed stderr when the
    /// process did not succeed.
    pub fn require_success(self, program: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let code = self
            .code
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        bail!("{program} failed (exit {code}): {}", self.stderr.trim())
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Capability to run external programs.
///
/// Resources and tasks receive an `&dyn Executor` instead of spawning
/// processes themselves, so tests can substitute a recording mock.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run to completion and require a zero exit.
    ///
    /// # Errors
    ///
    /// The program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run to completion and hand back whatever happened.
    ///
    /// # Errors
    ///
    /// Only when the program cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Whether `program` is on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.run_unchecked(program, args)?.require_success(program)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        tracing::trace!("exec: {program} {}", args.join(" "));
        Command::new(program)
            .args(args)
            .output()
            .map(ExecResult::from)
            .with_context(|| format!("failed to execute: {program}"))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Holds a `caffeinate` power assertion until dropped, so the Mac neither
/// sleeps nor dims its display during a long run.
#[derive(Debug)]
pub struct KeepAwake {
    child: Child,
}

impl KeepAwake {
    /// Start `caffeinate`, or do nothing when it is not installed.
    ///
    /// `-w` also ends the assertion when this process exits.
    ///
    /// # Errors
    ///
    /// `caffeinate` is on `PATH` but cannot be spawned.
    pub fn start(executor: &dyn Executor) -> Result<Option<Self>> {
        if !executor.which("caffeinate") {
            return Ok(None);
        }
        let pid = std::process::id().to_string();
        Self::spawn("caffeinate", &["-i", "-d", "-w", &pid]).map(Some)
    }

    fn spawn(program: &str, args: &[&str]) -> Result<Self> {
        tracing::trace!("spawn: {program} {}", args.join(" "));
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(Self { child })
    }

    fn stop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for KeepAwake {
    fn drop(&mut self) {
        self.stop();
    }
}
