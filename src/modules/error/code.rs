// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,
    MissingConfiguration = 10020,
    IndexOutOfRange = 10030,

    // Resource errors (30000–30999)
    ResourceNotFound = 30000,
    EnumerationFailed = 30010,

    // Network connection errors (40000–40999)
    NetworkError = 40000,
    ConnectionTimeout = 40010,

    // Mail service errors (50000–50999)
    SmtpCommandFailed = 50030,
    SmtpConnectionFailed = 50040,
    TransmissionFailed = 50090,

    // Job lifecycle errors (60000–60999)
    InvalidJobState = 60000,

    // Internal system errors (70000–70999)
    InternalError = 70000,
}

impl ErrorCode {
    /// Process exit status used by the binary when an error of this kind escapes `main`.
    pub fn exit_status(&self) -> i32 {
        match self {
            ErrorCode::InvalidParameter
            | ErrorCode::MissingConfiguration
            | ErrorCode::IndexOutOfRange => 2,
            ErrorCode::ResourceNotFound | ErrorCode::EnumerationFailed => 3,
            ErrorCode::NetworkError
            | ErrorCode::ConnectionTimeout
            | ErrorCode::SmtpCommandFailed
            | ErrorCode::SmtpConnectionFailed
            | ErrorCode::TransmissionFailed => 1,
            ErrorCode::InvalidJobState | ErrorCode::InternalError => 70,
        }
    }
}
