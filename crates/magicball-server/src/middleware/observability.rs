//! Request ids, sensitive header redaction and request tracing.

use axum::Router;
use axum::http::{HeaderName, header};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Name of the header carrying the per-request id.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers observability middleware for request tracing and logging.
    ///
    /// Generates a UUID request id (or keeps the caller's), wraps each request
    /// in a tracing span, echoes the id on the response and redacts the
    /// `Authorization` and `Cookie` headers from logs.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

        self.layer(PropagateRequestIdLayer::new(request_id_header.clone()))
            .layer(SetSensitiveRequestHeadersLayer::new([
                header::AUTHORIZATION,
                header::COOKIE,
            ]))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    #[tokio::test]
    async fn request_id_is_generated_and_echoed() -> anyhow::Result<()> {
        let router = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_observability();
        let server = TestServer::new(router)?;

        let response = server.get("/").await;
        response.assert_status_ok();
        assert!(!response.header(REQUEST_ID_HEADER).is_empty());

        let response = server
            .get("/")
            .add_header(
                HeaderName::from_static(REQUEST_ID_HEADER),
                HeaderValue::from_static("caller-id"),
            )
            .await;
        assert_eq!(response.header(REQUEST_ID_HEADER), "caller-id");

        Ok(())
    }
}
