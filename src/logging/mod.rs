//! Console and file logging on top of `tracing`.

mod logger;
mod style;
mod subscriber;
mod types;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, Tally, TaskEntry, TaskStatus};

/// `tracing` target of stage headers.
const STAGE_TARGET: &str = "dotfyles::stage";
/// `tracing` target of dry-run notices.
const DRY_RUN_TARGET: &str = "dotfyles::dry_run";

/// A [`Logger`] writing to a file in a fresh temp dir through a
/// thread-local subscriber.
///
/// Keep the guard alive for the whole test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn file_backed_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.log");
    let layer = subscriber::FileLayer::open(&path).expect("open log file");
    let subscriber = tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (Logger::writing_to(Some(path)), dir, guard)
}
