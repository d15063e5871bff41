//! Service layer error types.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Category of a service layer error.
///
/// Separated from [`Error`] to allow matching on the category without
/// inspecting the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or missing configuration.
    Config,
    /// Failure of an external collaborator such as the database.
    External,
    /// Authentication machinery failure (signing, hashing).
    Auth,
    /// Internal service logic errors.
    Internal,
}

impl ErrorKind {
    /// Returns the error kind as a string for categorization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::External => "external_service",
            Self::Auth => "auth",
            Self::Internal => "internal_service",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service layer error with a kind, a message and an optional source.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    #[inline]
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source error to this error.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creates a new configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Creates a new external service error.
    #[inline]
    pub fn external(
        service: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let full_message = format!("{}: {}", service.into(), message.into());
        Self::new(ErrorKind::External, full_message)
    }

    /// Creates a new authentication error.
    #[inline]
    pub fn auth(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    /// Creates a new internal error.
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl From<magicball_postgres::PgError> for Error {
    fn from(error: magicball_postgres::PgError) -> Self {
        use magicball_postgres::PgError;

        match error {
            PgError::Config(_) => Self::config("invalid postgres configuration").with_source(error),
            _ => Self::external("postgres", "database operation failed").with_source(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let error = Error::config("jwt secret is empty");
        assert_eq!(error.to_string(), "config error: jwt secret is empty");
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn external_prefixes_service_name() {
        let error = Error::external("postgres", "connection refused");
        assert_eq!(error.message(), "postgres: connection refused");
        assert_eq!(error.kind().as_str(), "external_service");
    }

    #[test]
    fn source_is_preserved() {
        let error = Error::internal("hashing failed").with_source(io::Error::other("rng"));
        assert!(StdError::source(&error).is_some());
    }

    #[test]
    fn pg_errors_map_to_kinds() {
        use magicball_postgres::PgError;

        let config: Error = PgError::Config("empty".into()).into();
        assert_eq!(config.kind(), ErrorKind::Config);

        let query: Error = PgError::Unexpected("closed".into()).into();
        assert_eq!(query.kind(), ErrorKind::External);
    }
}
