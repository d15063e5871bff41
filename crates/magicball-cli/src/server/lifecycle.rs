//! Startup warnings and the final outcome of a server run.

use std::future::Future;
use std::io;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Runs `serve_fn` to completion and logs how the run ended.
pub async fn serve_with_shutdown<F>(
    server_config: &ServerConfig,
    serve_fn: impl FnOnce() -> F,
) -> io::Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            host = %server_config.host,
            "listening on every interface"
        );
    }

    let started = Instant::now();
    let result = serve_fn().await;
    let uptime_secs = started.elapsed().as_secs();

    match &result {
        Ok(()) => tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            uptime_secs,
            "server stopped"
        ),
        Err(error) => tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            %error,
            kind = ?error.kind(),
            hint = bind_hint(error.kind()),
            uptime_secs,
            "server failed"
        ),
    }

    result
}

/// Operator hint for the errors a listener typically hits.
fn bind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("pick a port above 1024"),
        io::ErrorKind::AddrInUse => Some("another process holds the port"),
        io::ErrorKind::AddrNotAvailable => Some("the host address is not on this machine"),
        _ => None,
    }
}
