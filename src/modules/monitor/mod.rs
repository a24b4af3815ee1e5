// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{
    future::Future,
    time::{Duration, Instant},
};

use tracing::{error, info, warn};

use crate::modules::{
    transfer::{JobHandle, JobState, TransferEvent},
    utils::{format_size, shutdown::interrupt_signal},
};


const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

/// Follows one job to completion, reporting every event it publishes.
pub struct ProgressReporter {
    json: bool,
}

impl ProgressReporter {
    /// With `json` set, each event is printed to stdout as a single JSON line
    /// instead of being logged.
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Reports until the job ends. Ctrl+C or SIGTERM interrupts the job.
    pub async fn run(&self, handle: JobHandle) -> JobState {
        self.watch(handle, interrupt_signal()).await
    }

    pub async fn watch<F>(&self, handle: JobHandle, shutdown: F) -> JobState
    where
        F: Future<Output = ()>,
    {
        let Some(mut events) = handle.take_events() else {
            warn!(
                "Events of job {} are already consumed elsewhere; waiting for completion only",
                handle.id()
            );
            return handle.wait().await;
        };

        let mut shutdown = std::pin::pin!(shutdown);
        let mut interrupted = false;
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let start_time = Instant::now();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.report(&event),
                    None => break,
                },

                _ = &mut shutdown, if !interrupted => {
                    warn!(
                        "Interrupt received; job {} stops after the file in flight",
                        handle.id()
                    );
                    handle.interrupt();
                    interrupted = true;
                },

                _ = heartbeat.tick() => {
                    if !self.json {
                        let progress = handle.progress();
                        info!(
                            "Job {} has been running for {} seconds ({}/{} files).",
                            handle.id(),
                            start_time.elapsed().as_secs(),
                            progress.files_sent,
                            progress.total_files
                        );
                    }
                }
            }
        }
        handle.wait().await
    }

    fn report(&self, event: &TransferEvent) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("Failed to serialize transfer event: {}", e),
            }
            return;
        }

        match event {
            TransferEvent::StateChanged { job_id, state } => {
                info!("Job {} is {}", job_id, state)
            }
            TransferEvent::Progress(progress) => info!(
                "Job {} [{}/{}] sent {} ({} of {})",
                progress.job_id,
                progress.files_sent,
                progress.total_files,
                progress
                    .file
                    .as_ref()
                    .map(|f| f.display().to_string())
                    .unwrap_or_default(),
                format_size(progress.bytes_sent),
                format_size(progress.total_bytes)
            ),
            TransferEvent::Failed {
                job_id,
                file: Some(file),
                cause,
            } => error!("Job {} failed on {}: {}", job_id, file.display(), cause),
            TransferEvent::Failed {
                job_id,
                file: None,
                cause,
            } => error!("Job {} failed to deliver the message: {}", job_id, cause),
        }
    }
}

/// Process exit status for a job that ended in `state`.
pub fn exit_code(state: JobState) -> i32 {
    match state {
        JobState::Finished => 0,
        JobState::Interrupted => 130,
        _ => 1,
    }
}
