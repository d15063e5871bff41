//! Authenticated request state extracted from a bearer token.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use derive_more::Deref;

use crate::handler::{Error, ErrorKind, Result};
use crate::service::{AccessClaims, TokenError, TokenService};
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

/// Claims of a validated access token.
///
/// Extraction reads `Authorization: Bearer <token>` and decodes it with the
/// [`TokenService`] from state. Fails with:
///
/// - [`ErrorKind::MissingAuthToken`] when no bearer token is presented,
/// - [`ErrorKind::ExpiredAuthToken`] when a genuine token has expired,
/// - [`ErrorKind::MalformedAuthToken`] for anything else.
///
/// The result is cached in the request extensions.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AccessClaims);

impl AuthState {
    /// Returns the authenticated username.
    #[inline]
    pub fn username(&self) -> &str {
        &self.0.subject
    }

    /// Validates a raw bearer token.
    fn from_token(token: &str, token_service: &TokenService) -> Result<Self> {
        let claims = token_service.decode(token).map_err(|error| {
            tracing::debug!(
                target: TRACING_TARGET,
                expired = matches!(error, TokenError::Expired),
                "bearer token rejected"
            );
            Error::from(error)
        })?;

        Ok(Self(claims))
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    TokenService: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;

        let bearer_header = AuthBearerHeader::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection.reason() {
                TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken.into_error(),
                _ => ErrorKind::MalformedAuthToken.into_error(),
            })?;

        let token_service = TokenService::from_ref(state);
        let auth_state = Self::from_token(bearer_header.token(), &token_service)?;

        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}
