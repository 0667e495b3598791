use std::path::Path;

use anyhow::{Context, Result};
use tracing::Dispatch;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, format::Writer, time::FormatTime};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Local wall-clock timestamps, millisecond precision.
struct LogTimer;

impl FormatTime for LogTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Owned log sink. Events are routed to it only inside [`LogHandle::in_scope`].
pub struct LogHandle {
    dispatch: Dispatch,
}

impl LogHandle {
    /// Console plus an append-only log file. Level comes from `RUST_LOG`, default `info`.
    pub fn init(log_file: &Path) -> Result<Self> {
        let dir = log_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = log_file
            .file_name()
            .with_context(|| format!("Log file path has no file name: {:?}", log_file))?
            .to_string_lossy()
            .into_owned();

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(dir)
            .with_context(|| format!("Failed to open log file {:?}", log_file))?;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let file_layer = fmt::layer()
            .with_writer(appender)
            .with_timer(LogTimer)
            .with_target(false)
            .with_ansi(false);
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_timer(LogTimer)
            .with_target(false);

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer);

        Ok(LogHandle {
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// Drops every event.
    #[cfg(test)]
    pub fn disabled() -> Self {
        LogHandle {
            dispatch: Dispatch::none(),
        }
    }

    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etl_pipeline.log");

        let log = LogHandle::init(&path).unwrap();
        log.in_scope(|| tracing::warn!("card P002 skipped"));
        drop(log);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("WARN"));
        assert!(text.contains("card P002 skipped"));
    }

    #[test]
    fn appends_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etl_pipeline.log");

        LogHandle::init(&path).unwrap().in_scope(|| tracing::error!("first run"));
        LogHandle::init(&path).unwrap().in_scope(|| tracing::error!("second run"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("first run"));
        assert!(text.contains("second run"));
    }

    #[test]
    fn path_without_file_name() {
        assert!(LogHandle::init(Path::new("/")).is_err());
    }
}
