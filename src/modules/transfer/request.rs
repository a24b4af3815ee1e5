// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::{
    error::{MailFilesResult, ValidationSnafu},
    fileset::FileHandle,
};

/// Immutable snapshot of what a job delivers.
#[derive(Clone, Debug)]
pub struct MailRequest {
    recipient: String,
    subject: String,
    body: String,
    files: Vec<FileHandle>,
}

impl MailRequest {
    /// Trims `recipient` and rejects it when nothing is left. Subject and body
    /// are taken as they are, empty included.
    pub fn new(
        recipient: &str,
        subject: &str,
        body: &str,
        files: Vec<FileHandle>,
    ) -> MailFilesResult<Self> {
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return ValidationSnafu { field: "recipient" }.fail();
        }
        Ok(Self {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            files,
        })
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size()).sum()
    }
}
