// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{io, path::Path, sync::Arc};

use mail_send::mail_builder::MessageBuilder;
use tracing::debug;

use crate::{
    modules::{
        error::{code::ErrorCode, MailFilesError, MailFilesResult},
        fileset::FileHandle,
        transfer::MailRequest,
    },
    raise_error,
};

struct Attachment {
    content_type: String,
    file_name: String,
    content: Vec<u8>,
}

/// Collects the attachments of one request and turns them into a single message.
pub struct MessageAssembly {
    from: String,
    request: Arc<MailRequest>,
    attachments: Vec<Attachment>,
}

impl MessageAssembly {
    pub fn new(from: impl Into<String>, request: Arc<MailRequest>) -> Self {
        Self {
            from: from.into(),
            request,
            attachments: Vec::new(),
        }
    }

    /// Reads `file` and appends it as an attachment. The MIME type is guessed
    /// from the extension.
    ///
    /// A symbolic link to a directory is never traversed; it is attached as a
    /// `text/plain` part holding the link target, which is exactly the link's
    /// own size.
    pub async fn attach(&mut self, file: &FileHandle) -> MailFilesResult<()> {
        let (content_type, content) = if file.is_symlink() && file.is_directory() {
            let target = tokio::fs::read_link(file.path())
                .await
                .map_err(|e| read_error(file.path(), e))?;
            (
                "text/plain".to_string(),
                target.into_os_string().into_encoded_bytes(),
            )
        } else {
            let content = tokio::fs::read(file.path())
                .await
                .map_err(|e| read_error(file.path(), e))?;
            let content_type = mime_guess::from_path(file.path())
                .first_or_octet_stream()
                .to_string();
            (content_type, content)
        };
        debug!(
            "Attached {} ({}, {} bytes)",
            file.name(),
            content_type,
            content.len()
        );
        self.attachments.push(Attachment {
            content_type,
            file_name: file.name(),
            content,
        });
        Ok(())
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    pub fn build(self) -> MessageBuilder<'static> {
        let mut builder = MessageBuilder::new()
            .from(self.from)
            .to(self.request.recipient().to_string())
            .subject(self.request.subject().to_string())
            .text_body(self.request.body().to_string());
        for attachment in self.attachments {
            builder = builder.attachment(
                attachment.content_type,
                attachment.file_name,
                attachment.content,
            );
        }
        builder
    }

    /// Renders the message in RFC 5322 form straight into `output`, so no
    /// second copy of the attachments is built in memory.
    pub fn write_eml(self, output: impl io::Write) -> MailFilesResult<()> {
        self.build()
            .write_to(output)
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
    }
}

fn read_error(path: &Path, e: io::Error) -> MailFilesError {
    let code = match e.kind() {
        io::ErrorKind::NotFound => ErrorCode::ResourceNotFound,
        _ => ErrorCode::InternalError,
    };
    raise_error!(format!("Failed to read {:?}: {}", path, e), code)
}
