//! Tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters, e.g.
//! `RUST_LOG=info,magicball_server::authentication=debug`.

/// Login attempts, bearer token extraction and validation.
pub const AUTHENTICATION: &str = "magicball_server::authentication";

/// Password hashing and verification operations.
pub const PASSWORD_HASHER: &str = "magicball_server::password_hasher";

/// Token issuance and decoding.
pub const TOKEN_SERVICE: &str = "magicball_server::token_service";

/// Question recording and answer picking.
pub const MAGIC_BALL: &str = "magicball_server::magic_ball";

/// Service state construction and configuration.
pub const SERVICE: &str = "magicball_server::service";

/// Conversions from service and storage errors into HTTP errors.
pub const HANDLER_ERROR: &str = "magicball_server::handler::error";

/// Request extraction failures.
pub const EXTRACT: &str = "magicball_server::extract";

/// Error recovery including middleware errors and request timeouts.
pub const RECOVERY_ERROR: &str = "magicball_server::recovery::error";

/// Panic recovery in handlers.
pub const RECOVERY_PANIC: &str = "magicball_server::recovery::panic";
