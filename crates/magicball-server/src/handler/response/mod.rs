//! Response types for HTTP handlers.

mod authentication;
mod error_response;
mod magic_ball;
mod monitors;

pub use authentication::*;
pub use error_response::ErrorResponse;
pub use magic_ball::*;
pub use monitors::*;

use serde::{Deserialize, Serialize};

/// Plain acknowledgment carrying a single message.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
