// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::{error, info};

use crate::modules::{
    error::MailFilesResult,
    fileset::{flatten, FileHandle},
    selection::SelectionState,
    transfer::{JobHandle, JobLauncher},
};


/// Last used field values, carried from one dialog to the next.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DialogDefaults {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// One "email files" session: the flattened selection plus the message fields.
#[derive(Debug)]
pub struct EmailFilesDialog {
    recipient: String,
    subject: String,
    body: String,
    selection: SelectionState,
}

impl EmailFilesDialog {
    /// Flattens `roots` and pre-fills the fields from `defaults`.
    ///
    /// A directory that cannot be listed makes the whole selection unusable.
    pub fn open(roots: &[FileHandle], defaults: &DialogDefaults) -> MailFilesResult<Self> {
        let files = flatten(roots).inspect_err(|e| {
            error!("Unable to read files in subfolders: {}", e);
        })?;
        let selection = SelectionState::new(files);
        info!("Selected {}", selection.summary());
        Ok(Self {
            recipient: defaults.recipient.clone(),
            subject: defaults.subject.clone(),
            body: defaults.body.clone(),
            selection,
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

    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.recipient = recipient.into();
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn submit(&self, launcher: &mut JobLauncher) -> MailFilesResult<JobHandle> {
        launcher.submit(&self.recipient, &self.subject, &self.body, &self.selection)
    }
}
