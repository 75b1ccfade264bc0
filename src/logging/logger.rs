use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::style::{Tone, default_log_path, paint};
use super::types::{Log, Tally, TaskEntry, TaskStatus};
use super::{DRY_RUN_TARGET, STAGE_TARGET};

/// Emits `tracing` events and remembers task outcomes for the summary.
///
/// The file copy of every message (see [`init_subscriber`](super::init_subscriber))
/// lives at `$XDG_CACHE_HOME/dotfyles/<command>.log`; the summary ends with
/// that path.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Logger for `command`, pointing the summary at its default log file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::writing_to(default_log_path(command))
    }

    #[must_use]
    pub(crate) const fn writing_to(log_file: Option<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Where the file copy of this run is written, if anywhere.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Recorded task outcomes, oldest first.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Error line, on stderr.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Warning line, on stderr.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Section header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Plain progress line.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Shown on the console only with `--verbose`.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// A change that would have been made.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Remember a task outcome for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(ToString::to_string),
            });
        }
    }

    /// Number of tasks recorded as [`TaskStatus::Failed`].
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries.lock().map_or(0, |entries| {
            entries
                .iter()
                .filter(|entry| entry.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Print one line per recorded task, then the totals.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let entries = self.task_entries();
        if entries.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");
        for entry in &entries {
            let line = entry.message.as_ref().map_or_else(
                || format!("{} {}", entry.status.marker(), entry.name),
                |msg| format!("{} {} ({msg})", entry.status.marker(), entry.name),
            );
            self.info(&paint(tone_of(entry.status), &line));
        }

        let tally: Tally = entries.iter().collect();
        println!();
        self.info(&format!(
            "{} tasks: {}, {}, {}, {}, {}",
            tally.total(),
            paint(Tone::Green, &format!("{} ok", tally.ok)),
            paint(Tone::Dim, &format!("{} n/a", tally.not_applicable)),
            paint(Tone::Yellow, &format!("{} skipped", tally.skipped)),
            paint(Tone::Dim, &format!("{} dry-run", tally.dry_run)),
            paint(Tone::Red, &format!("{} failed", tally.failed)),
        ));
        if let Some(path) = &self.log_file {
            self.info(&paint(Tone::Dim, &format!("log: {}", path.display())));
        }
    }
}

const fn tone_of(status: TaskStatus) -> Tone {
    match status {
        TaskStatus::Ok => Tone::Green,
        TaskStatus::NotApplicable | TaskStatus::DryRun => Tone::Dim,
        TaskStatus::Skipped => Tone::Yellow,
        TaskStatus::Failed => Tone::Red,
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        Self::stage(self, msg);
    }

    fn info(&self, msg: &str) {
        Self::info(self, msg);
    }

    fn debug(&self, msg: &str) {
        Self::debug(self, msg);
    }

    fn warn(&self, msg: &str) {
        Self::warn(self, msg);
    }

    fn error(&self, msg: &str) {
        Self::error(self, msg);
    }

    fn dry_run(&self, msg: &str) {
        Self::dry_run(self, msg);
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        Self::record_task(self, name, status, message);
    }
}
