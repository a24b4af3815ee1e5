// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;

use code::ErrorCode;
use snafu::{Location, Snafu};

pub mod code;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MailFilesError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },

    /// User input rejected before any job is created.
    #[snafu(display("'{field}' must not be empty"))]
    Validation {
        field: &'static str,
        #[snafu(implicit)]
        location: Location,
    },

    /// A directory (or one of its entries) could not be read while flattening a selection.
    #[snafu(display("unable to read '{}': {source}", path.display()))]
    Enumeration {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("index {index} is out of range for a selection of {len} entries"))]
    IndexOutOfRange {
        index: usize,
        len: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "transmission failed{}: {cause}",
        file.as_ref().map(|f| format!(" for '{}'", f.display())).unwrap_or_default()
    ))]
    Transmission {
        file: Option<PathBuf>,
        cause: String,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type MailFilesResult<T, E = MailFilesError> = std::result::Result<T, E>;

impl MailFilesError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MailFilesError::Generic { code, .. } => *code,
            MailFilesError::Validation { .. } => ErrorCode::InvalidParameter,
            MailFilesError::Enumeration { .. } => ErrorCode::EnumerationFailed,
            MailFilesError::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            MailFilesError::Transmission { .. } => ErrorCode::TransmissionFailed,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            MailFilesError::Generic { location, .. }
            | MailFilesError::Validation { location, .. }
            | MailFilesError::Enumeration { location, .. }
            | MailFilesError::IndexOutOfRange { location, .. }
            | MailFilesError::Transmission { location, .. } => location,
        }
    }
}
