//! Authentication response types.

use serde::{Deserialize, Serialize};

/// Access token issued after a successful login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl LoginResponse {
    /// Wraps an access token.
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_owned(),
        }
    }
}
