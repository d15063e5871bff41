//! Service error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::utility::tracing_targets::HANDLER_ERROR as TRACING_TARGET;

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        use crate::ErrorKind as ServiceErrorKind;

        match error.kind() {
            ServiceErrorKind::External => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "external service failed"
                );
            }
            ServiceErrorKind::Config | ServiceErrorKind::Auth | ServiceErrorKind::Internal => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %error.kind(),
                    "service operation failed"
                );
            }
        }

        // Service failures never leak their details to the client.
        ErrorKind::InternalServerError.into_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_become_internal_server_errors() {
        for error in [
            crate::Error::config("missing secret"),
            crate::Error::external("postgres", "connection refused"),
            crate::Error::auth("hashing failed"),
            crate::Error::internal("unexpected"),
        ] {
            let http_error = HttpError::from(error);
            assert_eq!(http_error.kind(), ErrorKind::InternalServerError);
            assert!(http_error.context().is_none());
        }
    }
}
