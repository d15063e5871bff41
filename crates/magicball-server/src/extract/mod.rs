//! Request extractors with JSON error rejections.
//!
//! - [`AuthState`] - bearer token extraction and validation
//! - [`Form`] - urlencoded form data with descriptive rejections
//! - [`Json`] - JSON bodies with descriptive rejections
//! - [`ValidateJson`] - JSON bodies checked with `validator` rules

pub mod auth;
pub mod reject;

pub use crate::extract::auth::AuthState;
pub use crate::extract::reject::{Form, Json, ValidateJson};
