// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

pub mod client;
pub mod composer;
pub mod outbox;
#[cfg(test)]
mod tests;

pub use client::SmtpTransmitter;
pub use composer::MessageAssembly;
pub use outbox::OutboxTransmitter;

/// Connection parameters for the relay that delivers the assembled message.
#[derive(Clone, Debug, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// `true` for SMTPS, `false` for STARTTLS.
    pub implicit_tls: bool,
    pub credentials: Option<(String, String)>,
    pub timeout: Duration,
    pub from: String,
}
