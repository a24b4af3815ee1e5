use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use tokio::sync::Semaphore;

use crate::{
    modules::{
        error::code::ErrorCode,
        fileset::FileHandle,
        transfer::{
            transmit::TransmitFuture, MailRequest, Transmission, Transmitter,
        },
    },
    raise_error,
};

/// Transmitter double: records what it was given and fails where told to.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransmitter {
    /// Each `send_file` consumes one permit when set.
    pub gate: Option<Arc<Semaphore>>,
    /// Zero-based index of the file whose transmission fails.
    pub fail_at: Option<usize>,
    /// Zero-based index of the file whose transmission panics.
    pub panic_at: Option<usize>,
    pub fail_finish: bool,
    pub log: Arc<Mutex<ScriptLog>>,
    pub opened: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
pub(crate) struct ScriptLog {
    pub requests: Vec<(String, String, String, Vec<PathBuf>)>,
    pub sent: Vec<PathBuf>,
    pub finished: usize,
}

impl ScriptedTransmitter {
    pub(crate) fn gated(permits: usize) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(permits));
        (
            Self {
                gate: Some(gate.clone()),
                ..Default::default()
            },
            gate,
        )
    }

    pub(crate) fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Default::default()
        }
    }

    pub(crate) fn sent(&self) -> Vec<PathBuf> {
        self.log.lock().unwrap().sent.clone()
    }

    pub(crate) fn finished(&self) -> usize {
        self.log.lock().unwrap().finished
    }
}

impl Transmitter for ScriptedTransmitter {
    fn open(&self, _job_id: u64, request: Arc<MailRequest>) -> Box<dyn Transmission> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().requests.push((
            request.recipient().to_string(),
            request.subject().to_string(),
            request.body().to_string(),
            request
                .files()
                .iter()
                .map(|f| f.path().to_path_buf())
                .collect(),
        ));
        Box::new(ScriptedTransmission {
            script: self.clone(),
            index: 0,
        })
    }
}

struct ScriptedTransmission {
    script: ScriptedTransmitter,
    index: usize,
}

impl Transmission for ScriptedTransmission {
    fn send_file<'a>(&'a mut self, file: &'a FileHandle) -> TransmitFuture<'a> {
        Box::pin(async move {
            if let Some(gate) = &self.script.gate {
                gate.acquire()
                    .await
                    .map_err(|e| raise_error!(e.to_string(), ErrorCode::InternalError))?
                    .forget();
            }
            let index = self.index;
            self.index += 1;
            if self.script.panic_at == Some(index) {
                panic!("transmission of {} blew up", file.name());
            }
            if self.script.fail_at == Some(index) {
                return Err(raise_error!(
                    format!("connection reset while sending {}", file.name()),
                    ErrorCode::NetworkError
                ));
            }
            self.script
                .log
                .lock()
                .unwrap()
                .sent
                .push(file.path().to_path_buf());
            Ok(())
        })
    }

    fn finish(self: Box<Self>) -> TransmitFuture<'static> {
        Box::pin(async move {
            if self.script.fail_finish {
                return Err(raise_error!(
                    "550 mailbox unavailable".into(),
                    ErrorCode::SmtpCommandFailed
                ));
            }
            self.script.log.lock().unwrap().finished += 1;
            Ok(())
        })
    }
}
