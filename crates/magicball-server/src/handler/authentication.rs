//! Login and bearer-protected acknowledgment handlers.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};

use crate::extract::{AuthState, Form, Json};
use crate::handler::request::LoginRequest;
use crate::handler::response::{LoginResponse, MessageResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{CredentialVerifier, ServiceState, TokenService};
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

/// Exchanges a username and password for an access token.
#[tracing::instrument(skip_all)]
async fn login(
    State(credential_verifier): State<CredentialVerifier>,
    State(token_service): State<TokenService>,
    Form(request): Form<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let verified = credential_verifier
        .verify(&request.username, &request.password)
        .await?;

    if !verified {
        tracing::warn!(
            target: TRACING_TARGET,
            username = %request.username,
            "login failed"
        );
        return Err(ErrorKind::InvalidCredentials.into_error());
    }

    let access_token = token_service.issue(&request.username, token_service.default_ttl())?;

    tracing::info!(
        target: TRACING_TARGET,
        username = %request.username,
        "login succeeded"
    );

    Ok(Json(LoginResponse::bearer(access_token)))
}

/// Acknowledges a request carrying a valid bearer token.
#[tracing::instrument(skip_all, fields(username = %auth_state.username()))]
async fn protected_resource(auth_state: AuthState) -> Json<MessageResponse> {
    tracing::debug!(target: TRACING_TARGET, "protected resource accessed");
    Json(MessageResponse::new("Access granted to protected resource"))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/login", post(login))
        .route("/protected_resource", get(protected_resource))
}
