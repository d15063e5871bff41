//! Middleware for `axum::Router`.
//!
//! ```rust,no_run
//! use magicball_server::handler::routes;
//! use magicball_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
//!
//! let app = routes()
//!     .with_recovery(&RecoveryConfig::default())
//!     .with_observability();
//! ```

mod observability;
mod recovery;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
