//! `tracing` layers: a coloured console format and a plain-text log file.
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::style::{Tone, default_log_path, paint, strip_ansi, timestamp};
use super::{DRY_RUN_TARGET, STAGE_TARGET};

/// Pulls the formatted `message` field out of an event.
#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.0, "{value:?}");
        }
    }
}

/// What an event is, as far as rendering is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Error,
    Warn,
    Info,
    Debug,
}

impl Kind {
    fn of(event: &tracing::Event<'_>) -> Self {
        let meta = event.metadata();
        match (*meta.level(), meta.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("{} {}", paint(Tone::Blue, "==>"), paint(Tone::Bold, msg)),
            Self::DryRun => format!("  {} {msg}", paint(Tone::Yellow, "[DRY RUN]")),
            Self::Error => format!("{} {msg}", paint(Tone::Red, "ERROR")),
            Self::Warn => format!("{}  {msg}", paint(Tone::Yellow, "WARN")),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  {}", paint(Tone::Dim, msg)),
        }
    }

    fn file_line(self, time: &str, msg: &str) -> String {
        let tag = match self {
            Self::Stage => return format!("[{time}] ==> {msg}"),
            Self::DryRun => "dry-run ",
            Self::Error => "error   ",
            Self::Warn => "warn    ",
            Self::Info => "",
            Self::Debug => "debug   ",
        };
        format!("[{time}]     {tag}{msg}")
    }
}

fn message_of(event: &tracing::Event<'_>) -> String {
    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    visitor.0
}

/// Appends every event it sees to a log file, without colour codes.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate `path`, write a run header, and keep it open for appending.
    pub(super) fn open(path: &Path) -> std::io::Result<Self> {
        let version =
            option_env!("DOTFYLES_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(42);
        fs::write(
            path,
            format!("{rule}\ndotfyles {version} {}\n{rule}\n", timestamp(true)),
        )?;
        let file = fs::OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _: tracing_subscriber::layer::Context<'_, S>) {
        let line = Kind::of(event).file_line(&timestamp(false), &strip_ansi(&message_of(event)));
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }
}

/// Console rendering: stage arrows, dry-run tags and coloured levels.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        writeln!(writer, "{}", Kind::of(event).console_line(&message_of(event)))
    }
}

/// Install the global subscriber. Call once, before anything logs.
///
/// Warnings and errors go to stderr, everything else to stdout; `debug`
/// reaches the console only when `verbose`.  The log file at
/// `$XDG_CACHE_HOME/dotfyles/<command>.log` always gets `debug` and up.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));
    let console = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(writer)
        .with_filter(console_level);

    let file = default_log_path(command)
        .and_then(|path| FileLayer::open(&path).ok())
        .map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();
}
