// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::info;

use crate::{
    current_datetime,
    modules::{
        error::{code::ErrorCode, MailFilesResult},
        fileset::FileHandle,
        smtp::MessageAssembly,
        transfer::{transmit::TransmitFuture, MailRequest, Transmission, Transmitter},
    },
    raise_error,
};

/// Writes each job's message as `<timestamp>-<job id>.eml` into a directory.
pub struct OutboxTransmitter {
    dir: PathBuf,
    from: String,
}

impl OutboxTransmitter {
    pub fn new(dir: PathBuf, from: String) -> Self {
        Self { dir, from }
    }
}

impl Transmitter for OutboxTransmitter {
    fn open(&self, job_id: u64, request: Arc<MailRequest>) -> Box<dyn Transmission> {
        Box::new(OutboxTransmission {
            job_id,
            dir: self.dir.clone(),
            assembly: MessageAssembly::new(self.from.clone(), request),
        })
    }
}

struct OutboxTransmission {
    job_id: u64,
    dir: PathBuf,
    assembly: MessageAssembly,
}

impl Transmission for OutboxTransmission {
    fn send_file<'a>(&'a mut self, file: &'a FileHandle) -> TransmitFuture<'a> {
        Box::pin(self.assembly.attach(file))
    }

    fn finish(self: Box<Self>) -> TransmitFuture<'static> {
        let OutboxTransmission {
            job_id,
            dir,
            assembly,
        } = *self;
        Box::pin(async move {
            let path = dir.join(format!("{}-{}.eml", current_datetime!(), job_id));
            let target = path.clone();
            tokio::task::spawn_blocking(move || write_message(assembly, &target))
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))??;
            info!("Job {} wrote {:?}", job_id, path);
            Ok(())
        })
    }
}

/// A partially written message is removed again.
fn write_message(assembly: MessageAssembly, path: &Path) -> MailFilesResult<()> {
    let result = File::create(path)
        .map_err(|e| {
            raise_error!(
                format!("Failed to create {:?}: {}", path, e),
                ErrorCode::InternalError
            )
        })
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            assembly.write_eml(&mut writer)?;
            writer.flush().map_err(|e| {
                raise_error!(
                    format!("Failed to write {:?}: {}", path, e),
                    ErrorCode::InternalError
                )
            })
        });
    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}
