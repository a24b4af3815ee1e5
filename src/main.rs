// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{process, sync::Arc};

use mimalloc::MiMalloc;
use modules::{
    common::rustls::MailFilesTls,
    context::Initialize,
    dialog::{DialogDefaults, EmailFilesDialog},
    error::{MailFilesError, MailFilesResult},
    fileset::LocalFile,
    logger,
    monitor::{exit_code, ProgressReporter},
    settings::cli::{Transport, SETTINGS},
    smtp::{OutboxTransmitter, SmtpTransmitter},
    transfer::{JobLauncher, JobState, Transmitter},
};
use tracing::{debug, error, info, warn};

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    logger::initialize_logging();
    info!("Starting mailfiles");
    info!("Version:  {}", mailfiles_version!());
    info!("Git:      [{}]", env!("GIT_HASH"));

    let code = match run().await {
        Ok(Some(state)) => exit_code(state),
        Ok(None) => 0,
        Err(e) => {
            report_error(&e);
            e.code().exit_status()
        }
    };
    process::exit(code);
}

fn report_error(e: &MailFilesError) {
    error!(
        error_code = ?e.code(),
        error_location = ?e.location(),
        "{}", e
    );
}

/// Returns `None` when only the file listing was requested.
async fn run() -> MailFilesResult<Option<JobState>> {
    MailFilesTls::initialize().await?;

    let defaults = DialogDefaults::default();
    let roots = SETTINGS
        .paths
        .iter()
        .map(|path| LocalFile::handle(path.clone()))
        .collect::<MailFilesResult<Vec<_>>>()?;
    let mut dialog = EmailFilesDialog::open(&roots, &defaults)?;
    if let Some(to) = &SETTINGS.to {
        dialog.set_recipient(to.clone());
    }
    if let Some(subject) = &SETTINGS.subject {
        dialog.set_subject(subject.clone());
    }
    if let Some(body) = &SETTINGS.body {
        dialog.set_body(body.clone());
    }

    dialog
        .selection_mut()
        .subscribe(|aggregate| debug!("Selection changed: {}", aggregate));
    for index in &SETTINGS.exclude {
        dialog.selection_mut().set_included(*index, false)?;
    }

    let selection = dialog.selection();
    if SETTINGS.list {
        for label in selection.labels() {
            println!("{}", label);
        }
        println!("{}", selection.summary());
        return Ok(None);
    }
    if selection.is_empty() {
        warn!("No files found under the given paths; the message has no attachments");
    }
    for label in selection.labels() {
        info!("{}", label);
    }
    info!(
        "Sending {} of {} files ({}) to '{}', subject '{}', {} byte body",
        selection.aggregate().included_count,
        selection.len(),
        selection.summary(),
        dialog.recipient(),
        dialog.subject(),
        dialog.body().len()
    );

    let transmitter: Arc<dyn Transmitter> = match SETTINGS.transport()? {
        Transport::Smtp(config) => Arc::new(SmtpTransmitter::new(config)),
        Transport::Outbox { dir, from } => Arc::new(OutboxTransmitter::new(dir, from)),
    };
    let mut launcher = JobLauncher::new(transmitter, defaults);
    let handle = dialog.submit(&mut launcher)?;
    let state = ProgressReporter::new(SETTINGS.json_progress)
        .run(handle.clone())
        .await;
    if let Some(failure) = handle.failure() {
        report_error(&MailFilesError::from(failure));
    }
    Ok(Some(state))
}
