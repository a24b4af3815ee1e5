// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::logger::file::setup_file_logger;
use crate::modules::settings::cli::SETTINGS;
use chrono::Local;
use std::process;
use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

mod file;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

pub fn initialize_logging() {
    let result = if SETTINGS.mailfiles_log_to_file {
        setup_file_logger()
    } else {
        setup_stdout_logger()
    };
    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }
}

fn setup_stdout_logger() -> Result<(), String> {
    let level = validate_log_level(&SETTINGS.mailfiles_log_level);
    let with_ansi = SETTINGS.mailfiles_ansi_logs;

    // stdout is reserved for --json-progress output.
    let result = if SETTINGS.mailfiles_json_logs {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(level)
            .with_timer(LocalTimer)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let format = tracing_subscriber::fmt::format()
            .with_level(true)
            .with_target(true)
            .with_timer(LocalTimer);

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(with_ansi)
            .with_writer(std::io::stderr)
            .event_format(format)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    result.map_err(|e| e.to_string())
}

fn validate_log_level(value: &str) -> Level {
    match value.parse::<Level>() {
        Ok(level) => level,
        Err(_) => {
            eprintln!(
                "Invalid log level specified. Use one of: error, warn, info, debug, trace. 
        The log level you currently specified is 'mailfiles_log_level'='{}'",
                value
            );
            process::exit(1);
        }
    }
}
