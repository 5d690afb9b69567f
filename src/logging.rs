use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Sets up tracing output: console always, plus a daily-rolling file when a
/// log directory is configured. The returned guard must stay alive for the
/// lifetime of the process or buffered file output is lost.
pub fn init(log_directory: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());

    match log_directory {
        Some(dir) => {
            std::fs::create_dir_all(dir).expect("Failed to create log directory");
            let file_appender =
                RollingFileAppender::new(Rotation::DAILY, dir, "github_notify_logs");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}
