//! Task outcomes and the [`Log`] trait.

/// Outcome of one task, kept for the end-of-run summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name as shown in the summary.
    pub name: String,
    /// How it ended.
    pub status: TaskStatus,
    /// Skip reason or error text.
    pub message: Option<String>,
}

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Ran and finished.
    Ok,
    /// Does not apply on this machine or with this configuration.
    NotApplicable,
    /// Applied, but had nothing it could do (for example a missing tool).
    Skipped,
    /// Ran in dry-run mode.
    DryRun,
    /// Returned an error.
    Failed,
}

impl TaskStatus {
    /// Single-character marker shown in the summary.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::NotApplicable => "·",
            Self::Skipped => "○",
            Self::DryRun => "~",
            Self::Failed => "✗",
        }
    }
}

/// Per-status task counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// [`TaskStatus::Ok`]
    pub ok: usize,
    /// [`TaskStatus::NotApplicable`]
    pub not_applicable: usize,
    /// [`TaskStatus::Skipped`]
    pub skipped: usize,
    /// [`TaskStatus::DryRun`]
    pub dry_run: usize,
    /// [`TaskStatus::Failed`]
    pub failed: usize,
}

impl Tally {
    /// Number of tasks counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.ok + self.not_applicable + self.skipped + self.dry_run + self.failed
    }
}

impl<'a> FromIterator<&'a TaskEntry> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a TaskEntry>>(entries: I) -> Self {
        let mut tally = Self::default();
        for entry in entries {
            let slot = match entry.status {
                TaskStatus::Ok => &mut tally.ok,
                TaskStatus::NotApplicable => &mut tally.not_applicable,
                TaskStatus::Skipped => &mut tally.skipped,
                TaskStatus::DryRun => &mut tally.dry_run,
                TaskStatus::Failed => &mut tally.failed,
            };
            *slot += 1;
        }
        tally
    }
}

/// Sink for everything tasks report.
///
/// Tasks only see `&dyn Log`, so tests can record what was said without a
/// global subscriber.
pub trait Log: Send + Sync {
    /// Section header.
    fn stage(&self, msg: &str);
    /// Progress line.
    fn info(&self, msg: &str);
    /// Hidden on the console unless `--verbose`.
    fn debug(&self, msg: &str);
    /// Something was left undone.
    fn warn(&self, msg: &str);
    /// Something failed.
    fn error(&self, msg: &str);
    /// A change that would have been made.
    fn dry_run(&self, msg: &str);
    /// Remember a task outcome for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
