//! Application state and dependency injection.

mod auth;
mod config;
mod magic_ball;

use std::sync::Arc;

pub use crate::service::auth::{
    AccessClaims, CredentialVerifier, PasswordHasher, TokenConfig, TokenError, TokenService,
    UserStore,
};
pub use crate::service::config::ServiceConfig;
pub use crate::service::magic_ball::{AnswerBook, QuestionStore};
use crate::utility::tracing_targets::SERVICE as TRACING_TARGET;
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Shared handle to the question store.
pub type SharedQuestionStore = Arc<dyn QuestionStore>;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    token_service: TokenService,
    credential_verifier: CredentialVerifier,
    question_store: SharedQuestionStore,
    answer_book: AnswerBook,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Validates the configuration, connects to Postgres and brings the schema
    /// up to date.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let token_service = config.create_token_service()?;
        let postgres = config.connect_postgres().await?;

        let service_state = Self::new(
            token_service,
            Arc::new(postgres.clone()),
            Arc::new(postgres),
        );

        tracing::info!(target: TRACING_TARGET, "service state initialized");
        Ok(service_state)
    }

    /// Assembles application state from explicit parts.
    pub fn new(
        token_service: TokenService,
        user_store: Arc<dyn UserStore>,
        question_store: SharedQuestionStore,
    ) -> Self {
        Self {
            token_service,
            credential_verifier: CredentialVerifier::new(user_store, PasswordHasher::new()),
            question_store,
            answer_book: AnswerBook::new(),
        }
    }
}

impl std::fmt::Debug for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceState")
            .field("token_service", &self.token_service)
            .field("credential_verifier", &self.credential_verifier)
            .finish_non_exhaustive()
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(token_service: TokenService);
impl_di!(credential_verifier: CredentialVerifier);
impl_di!(question_store: SharedQuestionStore);
impl_di!(answer_book: AnswerBook);
