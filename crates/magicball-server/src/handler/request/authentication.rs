//! Authentication request types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Login credentials, submitted as an urlencoded form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username, matched exactly.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
