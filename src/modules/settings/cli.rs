// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{builder::ValueParser, Parser};
use std::{path::PathBuf, sync::LazyLock, time::Duration};

use crate::{
    modules::{
        error::{code::ErrorCode, MailFilesResult},
        smtp::SmtpConfig,
    },
    raise_error,
};

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

#[derive(Debug, Parser)]
#[clap(
    name = "mailfiles",
    about = "Attach files and folders to an email and send them, reporting progress per file.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// mailfiles log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for mailfiles"
    )]
    pub mailfiles_log_level: String,

    /// Enable ANSI logs (default: true)
    #[clap(long, default_value = "true", env, help = "Enable ANSI formatted logs")]
    pub mailfiles_ansi_logs: bool,

    /// Enable JSON logs (default: false)
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable JSON formatted logs"
    )]
    pub mailfiles_json_logs: bool,

    /// Enable log file output (default: false)
    /// If false, logs are written to stderr
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable log file output (otherwise logs go to stderr)"
    )]
    pub mailfiles_log_to_file: bool,

    #[clap(
        long,
        default_value = "logs",
        env,
        help = "Directory for rolling log files when file output is enabled"
    )]
    pub mailfiles_log_dir: PathBuf,

    /// Maximum number of log files (default: 5)
    #[clap(
        long,
        default_value = "5",
        env,
        help = "Set the maximum number of retained log files"
    )]
    pub mailfiles_max_log_files: usize,

    #[clap(long, env, help = "SMTP server host used to deliver the message")]
    pub mailfiles_smtp_host: Option<String>,

    #[clap(
        long,
        default_value = "465",
        env,
        help = "SMTP server port",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub mailfiles_smtp_port: u16,

    /// When false the connection is upgraded with STARTTLS instead.
    #[clap(
        long,
        default_value = "true",
        env,
        help = "Use implicit TLS for the SMTP connection"
    )]
    pub mailfiles_smtp_implicit_tls: bool,

    #[clap(long, env, help = "SMTP login user name")]
    pub mailfiles_smtp_username: Option<String>,

    #[clap(long, env, hide_env_values = true, help = "SMTP login password")]
    pub mailfiles_smtp_password: Option<String>,

    #[clap(
        long,
        default_value = "60",
        env,
        help = "Timeout in seconds for each SMTP operation",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub mailfiles_smtp_timeout_secs: u64,

    /// Sender address; falls back to the SMTP user name.
    #[clap(long, env, help = "Sender address placed in the From header")]
    pub mailfiles_from: Option<String>,

    #[clap(
        long,
        env,
        help = "Write the assembled message as an .eml file into this directory instead of using SMTP",
        value_parser = ValueParser::new(|s: &str| {
            let path = PathBuf::from(s);
            if !path.exists() {
                return Err(format!("Outbox directory does not exist: {:?}", path));
            }
            if !path.is_dir() {
                return Err(format!("Outbox path is not a directory: {:?}", path));
            }
            let temp_file = path.join(".mailfiles_test_write");
            if std::fs::write(&temp_file, "").is_err() {
                return Err(format!("Outbox directory lacks write permission: {:?}", path));
            }
            let _ = std::fs::remove_file(&temp_file);
            Ok(path)
        })
    )]
    pub mailfiles_outbox_dir: Option<PathBuf>,

    #[clap(long, help = "Recipient address (defaults to the last used recipient)")]
    pub to: Option<String>,

    #[clap(long, help = "Message subject")]
    pub subject: Option<String>,

    #[clap(long, help = "Message body")]
    pub body: Option<String>,

    #[clap(
        long,
        value_delimiter = ',',
        help = "Zero-based index of a flattened file to leave out (repeatable or comma-separated)"
    )]
    pub exclude: Vec<usize>,

    #[clap(
        long,
        default_value = "false",
        help = "Print one JSON line per transfer event on stdout"
    )]
    pub json_progress: bool,

    #[clap(
        long,
        default_value = "false",
        help = "Print the flattened files with their indexes on stdout and exit without sending"
    )]
    pub list: bool,

    #[clap(required = true, num_args = 1.., help = "Files and folders to attach")]
    pub paths: Vec<PathBuf>,
}

/// Delivery collaborator selected from the settings.
#[derive(Clone, Debug, PartialEq)]
pub enum Transport {
    Smtp(SmtpConfig),
    Outbox { dir: PathBuf, from: String },
}

impl Settings {
    pub fn transport(&self) -> MailFilesResult<Transport> {
        let from = self
            .mailfiles_from
            .clone()
            .or_else(|| self.mailfiles_smtp_username.clone());

        if let Some(host) = &self.mailfiles_smtp_host {
            let from = from.ok_or_else(|| {
                raise_error!(
                    "A sender address is required: set --mailfiles-from or --mailfiles-smtp-username."
                        .into(),
                    ErrorCode::MissingConfiguration
                )
            })?;
            let credentials = match (&self.mailfiles_smtp_username, &self.mailfiles_smtp_password)
            {
                (Some(username), Some(password)) => Some((username.clone(), password.clone())),
                (None, None) => None,
                _ => {
                    return Err(raise_error!(
                        "SMTP user name and password must be configured together.".into(),
                        ErrorCode::MissingConfiguration
                    ))
                }
            };
            return Ok(Transport::Smtp(SmtpConfig {
                host: host.clone(),
                port: self.mailfiles_smtp_port,
                implicit_tls: self.mailfiles_smtp_implicit_tls,
                credentials,
                timeout: Duration::from_secs(self.mailfiles_smtp_timeout_secs),
                from,
            }));
        }

        if let Some(dir) = &self.mailfiles_outbox_dir {
            return Ok(Transport::Outbox {
                dir: dir.clone(),
                from: from.unwrap_or_else(|| "mailfiles@localhost".to_string()),
            });
        }

        Err(raise_error!(
            "No delivery configured: set --mailfiles-smtp-host or --mailfiles-outbox-dir.".into(),
            ErrorCode::MissingConfiguration
        ))
    }

    #[cfg(test)]
    fn new_for_test() -> Self {
        Self {
            mailfiles_log_level: "info".to_string(),
            mailfiles_ansi_logs: false,
            mailfiles_json_logs: false,
            mailfiles_log_to_file: false,
            mailfiles_log_dir: PathBuf::from("logs"),
            mailfiles_max_log_files: 5,
            mailfiles_smtp_host: None,
            mailfiles_smtp_port: 465,
            mailfiles_smtp_implicit_tls: true,
            mailfiles_smtp_username: None,
            mailfiles_smtp_password: None,
            mailfiles_smtp_timeout_secs: 60,
            mailfiles_from: None,
            mailfiles_outbox_dir: None,
            to: None,
            subject: None,
            body: None,
            exclude: Vec::new(),
            json_progress: false,
            list: false,
            paths: vec![PathBuf::from(".")],
        }
    }
}
