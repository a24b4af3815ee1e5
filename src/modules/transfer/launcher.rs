// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use tracing::{info, warn};

use crate::modules::{
    dialog::DialogDefaults,
    error::MailFilesResult,
    selection::SelectionState,
    transfer::{JobHandle, MailRequest, TransferJob, Transmitter},
};

/// Validates submissions and starts one `TransferJob` for each accepted one.
///
/// Also holds the last used recipient, subject and body so the next dialog
/// can start from them.
pub struct JobLauncher {
    transmitter: Arc<dyn Transmitter>,
    defaults: DialogDefaults,
    next_id: u64,
}

impl JobLauncher {
    pub fn new(transmitter: Arc<dyn Transmitter>, defaults: DialogDefaults) -> Self {
        Self {
            transmitter,
            defaults,
            next_id: 1,
        }
    }

    pub fn defaults(&self) -> &DialogDefaults {
        &self.defaults
    }

    /// Snapshots the included entries of `selection` and starts a job for them.
    ///
    /// An empty recipient is rejected before anything else happens. Zero
    /// included files is accepted and yields a message without attachments.
    pub fn submit(
        &mut self,
        recipient: &str,
        subject: &str,
        body: &str,
        selection: &SelectionState,
    ) -> MailFilesResult<JobHandle> {
        let request = MailRequest::new(recipient, subject, body, selection.included_files())
            .inspect_err(|e| warn!("Rejected submission: {}", e))?;

        self.defaults = DialogDefaults {
            recipient: request.recipient().to_string(),
            subject: request.subject().to_string(),
            body: request.body().to_string(),
        };

        let id = self.next_id;
        self.next_id += 1;

        let job = TransferJob::new(id, request, self.transmitter.clone());
        job.start()?;
        info!(
            "Started job {} for {} ({})",
            id,
            job.request().recipient(),
            selection.summary()
        );
        Ok(job.handle())
    }
}
