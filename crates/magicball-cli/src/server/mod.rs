//! HTTP server startup with graceful shutdown and lifecycle logging.

mod lifecycle;
mod shutdown;

use std::io;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};
use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::shutdown::shutdown_signal;

/// Binds to the configured address and serves `app` until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails while
/// running.
pub async fn serve(app: Router, config: &ServerConfig) -> io::Result<()> {
    let server_addr = config.server_addr();

    let listener = TcpListener::bind(server_addr).await.inspect_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    let shutdown_timeout = config.shutdown_timeout();
    let (draining_tx, draining_rx) = oneshot::channel::<()>();
    let shutdown = async move {
        shutdown_signal(shutdown_timeout).await;
        let _ = draining_tx.send(());
    };

    serve_with_shutdown(config, || async move {
        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .into_future();

        // In-flight requests get `shutdown_timeout` to finish once draining starts.
        let deadline = async move {
            match draining_rx.await {
                Ok(()) => tokio::time::sleep(shutdown_timeout).await,
                Err(_) => std::future::pending().await,
            }
        };

        tokio::select! {
            result = server => result,
            () = deadline => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Shutdown timeout elapsed, dropping remaining connections"
                );
                Ok(())
            }
        }
    })
    .await
}
