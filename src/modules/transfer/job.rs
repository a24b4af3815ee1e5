// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{panic::AssertUnwindSafe, sync::Arc, time::Instant};

use futures::FutureExt;

use tracing::{debug, info};

use crate::{
    modules::{
        error::{code::ErrorCode, MailFilesResult},
        transfer::{JobHandle, JobState, MailRequest, TransferFailure, Transmitter},
    },
    raise_error,
};

/// Sends the files of one `MailRequest` on a background task.
pub struct TransferJob {
    handle: JobHandle,
    request: Arc<MailRequest>,
    transmitter: Arc<dyn Transmitter>,
}

impl TransferJob {
    pub fn new(id: u64, request: MailRequest, transmitter: Arc<dyn Transmitter>) -> Self {
        let handle = JobHandle::new(id, request.files().len(), request.total_bytes());
        Self {
            handle,
            request: Arc::new(request),
            transmitter,
        }
    }

    pub fn handle(&self) -> JobHandle {
        self.handle.clone()
    }

    pub fn request(&self) -> &MailRequest {
        &self.request
    }

    /// Moves the job to `Running` and spawns the worker on the current tokio runtime.
    pub fn start(&self) -> MailFilesResult<()> {
        if !self.handle.transition(JobState::Created, JobState::Running) {
            return Err(raise_error!(
                format!(
                    "Job {} cannot be started from state {}",
                    self.handle.id(),
                    self.handle.state()
                ),
                ErrorCode::InvalidJobState
            ));
        }
        self.handle.emit_state(JobState::Running);

        let handle = self.handle.clone();
        let worker = Self::run(
            self.handle.clone(),
            self.request.clone(),
            self.transmitter.clone(),
        );
        tokio::spawn(async move {
            // A panicking transmission must not leave the job running forever.
            if let Err(panic) = AssertUnwindSafe(worker).catch_unwind().await {
                let cause = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                handle.fail(TransferFailure {
                    file: None,
                    cause: format!("transfer worker panicked: {}", cause),
                });
            }
        });
        Ok(())
    }

    async fn run(handle: JobHandle, request: Arc<MailRequest>, transmitter: Arc<dyn Transmitter>) {
        let start = Instant::now();
        let job_display_name = format!("{{'send_files'-{}}}", handle.id());
        info!(
            "Job {} sending {} files ({} bytes) to {}",
            job_display_name,
            request.files().len(),
            request.total_bytes(),
            request.recipient()
        );

        let mut transmission = transmitter.open(handle.id(), request.clone());
        for file in request.files() {
            if handle.is_interrupt_requested() {
                info!(
                    "Job {} interrupted after {} files",
                    job_display_name,
                    handle.progress().files_sent
                );
                handle.complete(JobState::Interrupted);
                return;
            }

            if let Err(e) = transmission.send_file(file).await {
                handle.fail(TransferFailure {
                    file: Some(file.path().to_path_buf()),
                    cause: e.to_string(),
                });
                return;
            }
            debug!("Job {} sent {:?}", job_display_name, file.path());
            handle.record_sent(file.path().to_path_buf(), file.size());
        }

        if handle.is_interrupt_requested() {
            info!(
                "Job {} interrupted before delivery of the assembled message",
                job_display_name
            );
            handle.complete(JobState::Interrupted);
            return;
        }

        if let Err(e) = transmission.finish().await {
            handle.fail(TransferFailure {
                file: None,
                cause: e.to_string(),
            });
            return;
        }

        info!(
            "Job {} finished in {:?}",
            job_display_name,
            start.elapsed()
        );
        handle.complete(JobState::Finished);
    }
}
