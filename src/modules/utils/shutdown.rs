// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use tokio::signal;
use tracing::warn;

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed never resolves.
pub(crate) async fn interrupt_signal() {
    let ctrl_c_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Error installing Ctrl+C signal handler: {:?}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate_signal = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Error installing terminate signal handler: {:?}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate_signal = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c_signal => {},
        _ = terminate_signal => {},
    };
}
