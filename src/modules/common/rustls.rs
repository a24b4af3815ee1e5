// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

use crate::{
    modules::{
        context::Initialize,
        error::{code::ErrorCode, MailFilesResult},
    },
    raise_error,
};

/// Installs the ring provider used by every TLS connection the SMTP client opens.
pub struct MailFilesTls;

impl Initialize for MailFilesTls {
    async fn initialize() -> MailFilesResult<()> {
        rustls::crypto::CryptoProvider::install_default(rustls::crypto::ring::default_provider())
            .map_err(|_| {
                raise_error!(
                    "failed to set crypto provider".into(),
                    ErrorCode::InternalError
                )
            })?;
        debug!("Installed ring as the default rustls crypto provider");
        Ok(())
    }
}
