use std::borrow::Cow;

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON body of every error response.
///
/// The status code is carried alongside but not serialized. Every
/// `401 Unauthorized` response also carries a `WWW-Authenticate: Bearer`
/// challenge.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// The error name/type identifier
    pub name: Cow<'a, str>,
    /// User-friendly error message safe for client display
    pub message: Cow<'a, str>,
    /// The resource that the error relates to (optional, set by handler)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// Additional detail, such as the offending field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "The request could not be processed due to invalid data",
        StatusCode::BAD_REQUEST,
    );
    pub const EXPIRED_AUTH_TOKEN: Self = Self::new(
        "expired_auth_token",
        "Token has expired",
        StatusCode::UNAUTHORIZED,
    );
    pub const INVALID_CREDENTIALS: Self = Self::new(
        "invalid_credentials",
        "Invalid credentials",
        StatusCode::UNAUTHORIZED,
    );
    pub const MALFORMED_AUTH_TOKEN: Self = Self::new(
        "malformed_auth_token",
        "Invalid token",
        StatusCode::UNAUTHORIZED,
    );
    pub const MISSING_AUTH_TOKEN: Self = Self::new(
        "missing_auth_token",
        "Not authenticated",
        StatusCode::UNAUTHORIZED,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "The requested resource was not found",
        StatusCode::NOT_FOUND,
    );
    pub const REQUEST_TIMEOUT: Self = Self::new(
        "request_timeout",
        "The request took too long to process",
        StatusCode::REQUEST_TIMEOUT,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "An internal server error occurred. Please try again later",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            context: None,
            status,
        }
    }

    /// Sets the resource the error relates to.
    /// If a resource already exists, it merges them with a separator.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        let new_resource = resource.into();
        self.resource = Some(match self.resource {
            Some(existing) => Cow::Owned(format!("{existing}/{new_resource}")),
            None => new_resource,
        });
        self
    }

    /// Replaces the user-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{existing}; {new_context}")),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut response = (status, Json(self)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_merging_resource() {
        let response = ErrorResponse::NOT_FOUND
            .with_resource("question")
            .with_resource("answer");

        assert_eq!(response.resource.as_deref(), Some("question/answer"));
    }

    #[test]
    fn error_response_replacing_message() {
        let response = ErrorResponse::BAD_REQUEST.with_message("Missing field 'text'");
        assert_eq!(&response.message, "Missing field 'text'");
    }

    #[test]
    fn error_response_merging_context() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("Database connection failed")
            .with_context("Pool exhausted");

        assert_eq!(
            response.context.as_deref(),
            Some("Database connection failed; Pool exhausted")
        );
    }

    #[test]
    fn error_response_serialization() -> anyhow::Result<()> {
        let response = ErrorResponse::BAD_REQUEST
            .with_resource("question")
            .with_context("Test context");

        let json = serde_json::to_value(&response)?;

        assert_eq!(json["name"], "bad_request");
        assert_eq!(json["resource"], "question");
        assert_eq!(json["context"], "Test context");
        assert!(json.get("status").is_none());

        Ok(())
    }

    #[test]
    fn optional_fields_are_omitted() -> anyhow::Result<()> {
        let json = serde_json::to_value(ErrorResponse::NOT_FOUND)?;
        assert!(json.get("resource").is_none());
        assert!(json.get("context").is_none());
        Ok(())
    }

    #[test]
    fn unauthorized_responses_carry_bearer_challenge() {
        for preset in [
            ErrorResponse::MISSING_AUTH_TOKEN,
            ErrorResponse::MALFORMED_AUTH_TOKEN,
            ErrorResponse::EXPIRED_AUTH_TOKEN,
            ErrorResponse::INVALID_CREDENTIALS,
        ] {
            let response = preset.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE),
                Some(&HeaderValue::from_static("Bearer"))
            );
        }
    }

    #[test]
    fn other_responses_carry_no_challenge() {
        let response = ErrorResponse::NOT_FOUND.into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
