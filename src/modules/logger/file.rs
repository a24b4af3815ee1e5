use crate::modules::logger::{validate_log_level, LocalTimer};
use crate::modules::settings::cli::SETTINGS;
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

pub static LOG_WORKER_GUARD: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

pub fn setup_file_logger() -> Result<(), String> {
    let level = validate_log_level(&SETTINGS.mailfiles_log_level);

    let (nonb, guard) = log_writer()?;
    let _ = LOG_WORKER_GUARD.set(vec![guard]);

    // Rolled files never carry ANSI escapes.
    if SETTINGS.mailfiles_json_logs {
        let layer = fmt::layer()
            .json()
            .with_timer(LocalTimer)
            .with_writer(nonb)
            .with_target(true);
        let subscriber = tracing_subscriber::registry()
            .with(LevelFilter::from_level(level))
            .with(layer);
        tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
    } else {
        let layer = fmt::layer()
            .with_timer(LocalTimer)
            .with_ansi(false)
            .with_level(true)
            .with_writer(nonb)
            .with_target(true);
        let subscriber = tracing_subscriber::registry()
            .with(LevelFilter::from_level(level))
            .with(layer);
        tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
    }
}

fn log_writer() -> Result<(NonBlocking, WorkerGuard), String> {
    let rolling = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("mailfiles")
        .max_log_files(SETTINGS.mailfiles_max_log_files)
        .build(&SETTINGS.mailfiles_log_dir)
        .map_err(|e| format!("failed to initialize rolling file appender: {}", e))?;
    Ok(tracing_appender::non_blocking(rolling))
}
