// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{
    fmt,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering},
        Arc, Mutex, OnceLock,
    },
};

use serde::Serialize;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, error, info};

use crate::modules::error::{MailFilesError, TransmissionSnafu};

pub mod job;
pub mod launcher;
pub mod request;
#[cfg(test)]
pub(crate) mod scripted;
pub mod transmit;

pub use job::TransferJob;
pub use launcher::JobLauncher;
pub use request::MailRequest;
pub use transmit::{Transmission, Transmitter};

/// Lifecycle of a transfer job.
///
/// `Created -> Running -> {Finished, Failed, Interrupted}`, with
/// `Created -> Interrupted` when a job is cancelled before it starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum JobState {
    Created = 0,
    Running = 1,
    Finished = 2,
    Failed = 3,
    Interrupted = 4,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Finished | JobState::Failed | JobState::Interrupted
        )
    }

}

impl TryFrom<u8> for JobState {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(JobState::Created),
            1 => Ok(JobState::Running),
            2 => Ok(JobState::Finished),
            3 => Ok(JobState::Failed),
            4 => Ok(JobState::Interrupted),
            other => Err(other),
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            JobState::Created => "Created",
            JobState::Running => "Running",
            JobState::Finished => "Finished",
            JobState::Failed => "Failed",
            JobState::Interrupted => "Interrupted",
        };
        write!(f, "{}", state_str)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TransferProgress {
    pub job_id: u64,
    pub files_sent: usize,
    pub bytes_sent: u64,
    pub total_files: usize,
    pub total_bytes: u64,
    /// The file whose transmission produced this tick.
    pub file: Option<PathBuf>,
}

/// Why a job ended in `Failed`. `file` is `None` when the failure is not tied
/// to one file: delivery of the assembled message, or a crashed worker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferFailure {
    pub file: Option<PathBuf>,
    pub cause: String,
}

impl From<TransferFailure> for MailFilesError {
    fn from(failure: TransferFailure) -> Self {
        TransmissionSnafu {
            file: failure.file,
            cause: failure.cause,
        }
        .build()
    }
}

/// Everything a job publishes, in the order it happened.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TransferEvent {
    StateChanged { job_id: u64, state: JobState },
    Progress(TransferProgress),
    Failed {
        job_id: u64,
        file: Option<PathBuf>,
        cause: String,
    },
}

impl TransferEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferEvent::StateChanged { state, .. } if state.is_terminal())
    }
}

/// Ordered event stream of a single job. Ends after the terminal state change.
#[derive(Debug)]
pub struct JobEvents {
    receiver: mpsc::UnboundedReceiver<TransferEvent>,
    done: bool,
}

impl JobEvents {
    pub async fn recv(&mut self) -> Option<TransferEvent> {
        if self.done {
            return None;
        }
        let event = self.receiver.recv().await?;
        if event.is_terminal() {
            self.done = true;
        }
        Some(event)
    }
}

#[derive(Debug)]
struct JobShared {
    id: u64,
    state: AtomicU8,
    cancel_requested: AtomicBool,
    files_sent: AtomicUsize,
    bytes_sent: AtomicU64,
    total_files: usize,
    total_bytes: u64,
    failure: OnceLock<TransferFailure>,
    terminal: Notify,
    sender: mpsc::UnboundedSender<TransferEvent>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<TransferEvent>>>,
}

/// Shared view of a transfer job, safe to clone into any observer.
///
/// State and the cancellation flag live in atomics; the worker is the only
/// writer of progress counters.
#[derive(Clone, Debug)]
pub struct JobHandle {
    shared: Arc<JobShared>,
}

impl JobHandle {
    pub(crate) fn new(id: u64, total_files: usize, total_bytes: u64) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(JobShared {
                id,
                state: AtomicU8::new(JobState::Created as u8),
                cancel_requested: AtomicBool::new(false),
                files_sent: AtomicUsize::new(0),
                bytes_sent: AtomicU64::new(0),
                total_files,
                total_bytes,
                failure: OnceLock::new(),
                terminal: Notify::new(),
                sender,
                receiver: Mutex::new(Some(receiver)),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.shared.id
    }

    pub fn state(&self) -> JobState {
        // Only `JobState as u8` is ever stored.
        JobState::try_from(self.shared.state.load(Ordering::Acquire)).unwrap_or_else(|raw| {
            error!("Job {} holds unknown state byte {}", self.shared.id, raw);
            JobState::Failed
        })
    }

    pub fn is_interrupt_requested(&self) -> bool {
        self.shared.cancel_requested.load(Ordering::Acquire)
    }

    pub fn progress(&self) -> TransferProgress {
        TransferProgress {
            job_id: self.shared.id,
            files_sent: self.shared.files_sent.load(Ordering::Acquire),
            bytes_sent: self.shared.bytes_sent.load(Ordering::Acquire),
            total_files: self.shared.total_files,
            total_bytes: self.shared.total_bytes,
            file: None,
        }
    }

    pub fn failure(&self) -> Option<TransferFailure> {
        self.shared.failure.get().cloned()
    }

    /// Hands out the event stream. Only the first caller receives it; events
    /// emitted before the call are buffered.
    pub fn take_events(&self) -> Option<JobEvents> {
        let mut guard = self
            .shared
            .receiver
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.take().map(|receiver| JobEvents {
            receiver,
            done: false,
        })
    }

    /// Requests cooperative cancellation.
    ///
    /// A job that has not started moves straight to `Interrupted`. A running
    /// job stops before its next file; the file in flight is allowed to
    /// complete. Terminal jobs are left untouched.
    pub fn interrupt(&self) {
        if self.shared.cancel_requested.swap(true, Ordering::AcqRel) {
            return;
        }
        if self.transition(JobState::Created, JobState::Interrupted) {
            info!("Job {} interrupted before it started", self.id());
            self.emit_state(JobState::Interrupted);
            self.shared.terminal.notify_waiters();
            return;
        }
        match self.state() {
            JobState::Running => info!("Interrupt requested for job {}", self.id()),
            state => debug!("Ignoring interrupt for job {} in state {}", self.id(), state),
        }
    }

    /// Waits until the job reaches a terminal state.
    pub async fn wait(&self) -> JobState {
        loop {
            let notified = self.shared.terminal.notified();
            let state = self.state();
            if state.is_terminal() {
                return state;
            }
            notified.await;
        }
    }

    pub(crate) fn transition(&self, from: JobState, to: JobState) -> bool {
        self.shared
            .state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn record_sent(&self, file: PathBuf, bytes: u64) {
        let files_sent = self.shared.files_sent.fetch_add(1, Ordering::AcqRel) + 1;
        let bytes_sent = self.shared.bytes_sent.fetch_add(bytes, Ordering::AcqRel) + bytes;
        self.emit(TransferEvent::Progress(TransferProgress {
            job_id: self.shared.id,
            files_sent,
            bytes_sent,
            total_files: self.shared.total_files,
            total_bytes: self.shared.total_bytes,
            file: Some(file),
        }));
    }

    /// Moves a running job to a terminal state and publishes it.
    pub(crate) fn complete(&self, state: JobState) {
        if self.transition(JobState::Running, state) {
            self.emit_state(state);
            self.shared.terminal.notify_waiters();
        } else {
            error!(
                "Job {} could not move to {} from {}",
                self.id(),
                state,
                self.state()
            );
        }
    }

    pub(crate) fn fail(&self, failure: TransferFailure) {
        error!(
            "Job {} failed{}: {}",
            self.id(),
            failure
                .file
                .as_ref()
                .map(|f| format!(" on {:?}", f))
                .unwrap_or_default(),
            failure.cause
        );
        self.emit(TransferEvent::Failed {
            job_id: self.shared.id,
            file: failure.file.clone(),
            cause: failure.cause.clone(),
        });
        let _ = self.shared.failure.set(failure);
        self.complete(JobState::Failed);
    }

    pub(crate) fn emit_state(&self, state: JobState) {
        self.emit(TransferEvent::StateChanged {
            job_id: self.shared.id,
            state,
        });
    }

    fn emit(&self, event: TransferEvent) {
        // The receiver may already be gone; the job keeps running regardless.
        if self.shared.sender.send(event).is_err() {
            debug!("Event stream of job {} has no subscriber", self.shared.id);
        }
    }
}
