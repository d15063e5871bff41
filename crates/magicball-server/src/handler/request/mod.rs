//! Request types for HTTP handlers.

mod authentication;
mod magic_ball;

pub use authentication::*;
pub use magic_ball::*;
