//! Ctrl+C and SIGTERM handling.

use std::future::pending;
use std::time::Duration;

use tokio::signal::ctrl_c;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Resolves once the process is asked to stop.
///
/// A signal whose handler cannot be installed never fires instead of
/// stopping the server right away.
pub async fn shutdown_signal(drain_timeout: Duration) {
    let signal = tokio::select! {
        () = interrupt() => "SIGINT",
        () = terminate() => "SIGTERM",
    };

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal,
        drain_timeout_secs = drain_timeout.as_secs(),
        "draining connections"
    );
}

async fn interrupt() {
    if let Err(error) = ctrl_c().await {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            %error,
            "cannot listen for Ctrl+C"
        );
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                %error,
                "cannot listen for SIGTERM"
            );
            pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    pending::<()>().await;
}
