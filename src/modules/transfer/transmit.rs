// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::modules::{error::MailFilesResult, fileset::FileHandle, transfer::MailRequest};

pub type TransmitFuture<'a> = BoxFuture<'a, MailFilesResult<()>>;

/// Delivery collaborator. Opens one `Transmission` per job.
pub trait Transmitter: Send + Sync {
    fn open(&self, job_id: u64, request: Arc<MailRequest>) -> Box<dyn Transmission>;
}

/// Per-job sink fed one file at a time, in request order.
///
/// `finish` is called only after every file was accepted and no interrupt was
/// requested; an interrupted or failed job simply drops the transmission.
pub trait Transmission: Send {
    fn send_file<'a>(&'a mut self, file: &'a FileHandle) -> TransmitFuture<'a>;

    fn finish(self: Box<Self>) -> TransmitFuture<'static>;
}
