// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{sync::Arc, time::Instant};

use mail_send::{mail_builder::MessageBuilder, Credentials, SmtpClientBuilder};
use tracing::{info, warn};

use crate::{
    modules::{
        error::{code::ErrorCode, MailFilesResult},
        fileset::FileHandle,
        smtp::{MessageAssembly, SmtpConfig},
        transfer::{transmit::TransmitFuture, MailRequest, Transmission, Transmitter},
    },
    raise_error,
};

/// Delivers each job as one message through an SMTP relay.
///
/// Files are read and attached as the job hands them over; the connection is
/// only opened once the last file has been accepted.
pub struct SmtpTransmitter {
    config: Arc<SmtpConfig>,
}

impl SmtpTransmitter {
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Transmitter for SmtpTransmitter {
    fn open(&self, job_id: u64, request: Arc<MailRequest>) -> Box<dyn Transmission> {
        Box::new(SmtpTransmission {
            job_id,
            config: self.config.clone(),
            assembly: MessageAssembly::new(self.config.from.clone(), request),
        })
    }
}

struct SmtpTransmission {
    job_id: u64,
    config: Arc<SmtpConfig>,
    assembly: MessageAssembly,
}

impl Transmission for SmtpTransmission {
    fn send_file<'a>(&'a mut self, file: &'a FileHandle) -> TransmitFuture<'a> {
        Box::pin(self.assembly.attach(file))
    }

    fn finish(self: Box<Self>) -> TransmitFuture<'static> {
        let SmtpTransmission {
            job_id,
            config,
            assembly,
        } = *self;
        Box::pin(async move {
            let start = Instant::now();
            let attachments = assembly.attachment_count();
            deliver(&config, assembly.build()).await?;
            info!(
                "Job {} delivered {} attachments via {}:{} in {:?}",
                job_id,
                attachments,
                config.host,
                config.port,
                start.elapsed()
            );
            Ok(())
        })
    }
}

async fn deliver(config: &SmtpConfig, message: MessageBuilder<'static>) -> MailFilesResult<()> {
    let mut builder = SmtpClientBuilder::new(config.host.clone(), config.port)
        .implicit_tls(config.implicit_tls)
        .timeout(config.timeout);
    if let Some((username, password)) = &config.credentials {
        builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }

    let mut client = builder.connect().await.map_err(|e| {
        let code = match &e {
            mail_send::Error::Timeout => ErrorCode::ConnectionTimeout,
            mail_send::Error::Io(_) => ErrorCode::NetworkError,
            _ => ErrorCode::SmtpConnectionFailed,
        };
        raise_error!(format!("{:#?}", e), code)
    })?;
    client
        .send(message)
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed))?;
    if let Err(e) = client.quit().await {
        warn!("SMTP QUIT to {} failed after delivery: {:#?}", config.host, e);
    }
    Ok(())
}
