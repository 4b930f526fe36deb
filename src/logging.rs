use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the background log writer alive; logs are flushed when dropped.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logs to a daily file under `log_dir`. The terminal UI owns the screen, so
/// nothing is written to stdout. Falls back to stderr if the directory cannot
/// be created.
pub fn init_file_tracing(log_level: &str, log_dir: &Path) -> Option<FileLogGuard> {
    if let Err(err) = std::fs::create_dir_all(log_dir) {
        eprintln!("failed to create log directory {}: {err}", log_dir.display());
        init_stderr_tracing(log_level);
        return None;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "lexdrill.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(file_layer)
        .init();

    Some(FileLogGuard { _guard: guard })
}

/// Logs to stderr, for one-shot subcommands.
pub fn init_stderr_tracing(log_level: &str) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(stderr_layer)
        .init();
}
