//! Issuance and validation of signed, time-limited access tokens.

use std::fmt;
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::TOKEN_SERVICE as TRACING_TARGET;
use crate::{Error, Result};

/// Signing secret and lifetime of issued access tokens.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct TokenConfig {
    /// Secret used to sign and verify access tokens (HS256).
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "JWT_SECRET", hide_env_values = true)
    )]
    pub jwt_secret: String,

    /// Lifetime of issued access tokens in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "TOKEN_TTL_SECS", default_value_t = TokenConfig::DEFAULT_TTL_SECS)
    )]
    #[serde(default = "TokenConfig::default_ttl_secs")]
    pub token_ttl_secs: u64,
}

impl TokenConfig {
    /// Default token lifetime: 30 minutes.
    pub const DEFAULT_TTL_SECS: u64 = 1800;

    /// Creates a configuration with the default token lifetime.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: Self::DEFAULT_TTL_SECS,
        }
    }

    /// Sets the token lifetime in seconds.
    pub fn with_ttl_secs(mut self, token_ttl_secs: u64) -> Self {
        self.token_ttl_secs = token_ttl_secs;
        self
    }

    fn default_ttl_secs() -> u64 {
        Self::DEFAULT_TTL_SECS
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a config error if the secret is empty or the lifetime is not
    /// a positive number of seconds that fits a signed duration.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            return Err(Error::config("jwt secret cannot be empty"));
        }

        if self.token_ttl_secs == 0 {
            return Err(Error::config("token ttl must be greater than 0 seconds"));
        }

        if i64::try_from(self.token_ttl_secs).is_err() {
            return Err(Error::config("token ttl is too large"));
        }

        Ok(())
    }

    /// Returns the configured token lifetime.
    pub fn ttl(&self) -> SignedDuration {
        SignedDuration::from_secs(i64::try_from(self.token_ttl_secs).unwrap_or(i64::MAX))
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("jwt_secret", &"***")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// The authenticated username.
    #[serde(rename = "sub")]
    pub subject: String,
    /// Issue time, in seconds since the Unix epoch.
    #[serde(default)]
    pub iat: i64,
    /// Expiry time, in seconds since the Unix epoch.
    pub exp: i64,
}

impl AccessClaims {
    /// Returns `true` if the token is expired at the given instant.
    #[inline]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.as_second() >= self.exp
    }
}

/// Reasons a presented token is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The signature is valid but the expiry has passed.
    #[error("token has expired")]
    Expired,
    /// Bad signature, unparseable structure or a missing required claim.
    #[error("token is invalid")]
    Invalid,
}

/// Signs and validates access tokens with a process-wide HS256 secret.
///
/// Cheap to clone; the keys are shared.
#[derive(Clone)]
pub struct TokenService {
    inner: Arc<TokenServiceInner>,
}

struct TokenServiceInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: SignedDuration,
}

impl TokenService {
    /// Creates a token service from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a config error if [`TokenConfig::validate`] fails.
    pub fn new(config: &TokenConfig) -> Result<Self> {
        config.validate()?;

        let secret = config.jwt_secret.as_bytes();

        // Expiry is checked by hand so that it is only reported for tokens
        // whose signature and structure are already known to be good.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        tracing::debug!(
            target: TRACING_TARGET,
            token_ttl_secs = config.token_ttl_secs,
            "token service initialized"
        );

        let inner = TokenServiceInner {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl: config.ttl(),
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the configured token lifetime.
    #[inline]
    pub fn default_ttl(&self) -> SignedDuration {
        self.inner.default_ttl
    }

    /// Issues a token for `subject` valid for `ttl` from now.
    ///
    /// # Errors
    ///
    /// See [`TokenService::issue_at`].
    pub fn issue(&self, subject: &str, ttl: SignedDuration) -> Result<String> {
        self.issue_at(subject, ttl, Timestamp::now())
    }

    /// Issues a token for `subject` valid for `ttl` from `now`.
    ///
    /// Timestamps are truncated to whole seconds: `exp = iat + ttl`.
    ///
    /// # Errors
    ///
    /// Returns an error if `ttl` is shorter than one second or signing fails.
    pub fn issue_at(&self, subject: &str, ttl: SignedDuration, now: Timestamp) -> Result<String> {
        let ttl_secs = ttl.as_secs();
        if ttl_secs <= 0 {
            return Err(Error::internal("token ttl must be at least one second"));
        }

        let iat = now.as_second();
        let exp = iat
            .checked_add(ttl_secs)
            .ok_or_else(|| Error::internal("token expiry overflows"))?;

        let claims = AccessClaims {
            subject: subject.to_owned(),
            iat,
            exp,
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.inner.encoding_key,
        )
        .map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to sign access token"
            );
            Error::auth("failed to sign access token").with_source(e)
        })?;

        tracing::debug!(
            target: TRACING_TARGET,
            expires_at = exp,
            "access token issued"
        );

        Ok(token)
    }

    /// Decodes and validates a token at the current time.
    ///
    /// # Errors
    ///
    /// See [`TokenService::decode_at`].
    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.decode_at(token, Timestamp::now())
    }

    /// Decodes and validates a token as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for a bad signature, a malformed token
    /// or a missing `sub`/`exp` claim, and [`TokenError::Expired`] for an
    /// otherwise valid token once `now >= exp`.
    pub fn decode_at(&self, token: &str, now: Timestamp) -> Result<AccessClaims, TokenError> {
        let token_data = jsonwebtoken::decode::<AccessClaims>(
            token,
            &self.inner.decoding_key,
            &self.inner.validation,
        )
        .map_err(|e| {
            let reason = match e.kind() {
                JwtErrorKind::InvalidSignature => "invalid signature",
                JwtErrorKind::MissingRequiredClaim(_) => "missing required claim",
                _ => "malformed token",
            };
            tracing::debug!(
                target: TRACING_TARGET,
                error = %e,
                reason,
                "access token rejected"
            );
            TokenError::Invalid
        })?;

        let claims = token_data.claims;
        if claims.is_expired_at(now) {
            tracing::debug!(
                target: TRACING_TARGET,
                expired_at = claims.exp,
                "access token expired"
            );
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("default_ttl", &self.inner.default_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SECRET: &str = "test-secret";

    fn service() -> TokenService {
        TokenService::new(&TokenConfig::new(SECRET)).expect("valid token config")
    }

    fn at(second: i64) -> Timestamp {
        Timestamp::from_second(second).expect("valid timestamp")
    }

    #[test]
    fn config_rejects_empty_secret() {
        let result = TokenService::new(&TokenConfig::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn config_rejects_zero_ttl() {
        let config = TokenConfig::new(SECRET).with_ttl_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_debug_redacts_secret() {
        let config = TokenConfig::new("super-secret-value");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("1800"));
    }

    #[test]
    fn config_parses_from_args() {
        use clap::Parser;

        #[derive(Parser)]
        struct TestCli {
            #[clap(flatten)]
            token: TokenConfig,
        }

        let cli = TestCli::parse_from(["test", "--jwt-secret", "abc", "--token-ttl-secs", "60"]);
        assert_eq!(cli.token.jwt_secret, "abc");
        assert_eq!(cli.token.ttl(), SignedDuration::from_secs(60));
    }

    #[test]
    fn default_ttl_comes_from_config() -> anyhow::Result<()> {
        let service = TokenService::new(&TokenConfig::new(SECRET).with_ttl_secs(90))?;
        assert_eq!(service.default_ttl(), SignedDuration::from_secs(90));
        Ok(())
    }

    #[test]
    fn issued_token_round_trips() -> anyhow::Result<()> {
        let service = service();
        let token = service.issue("bob", SignedDuration::from_secs(3600))?;

        let claims = service.decode(&token)?;
        assert_eq!(claims.subject, "bob");
        assert_eq!(claims.exp - claims.iat, 3600);

        Ok(())
    }

    #[test]
    fn token_is_valid_strictly_before_expiry() -> anyhow::Result<()> {
        let service = service();
        let issued_at = at(1_700_000_000);
        let token = service.issue_at("alice", SignedDuration::from_secs(60), issued_at)?;

        let claims = service.decode_at(&token, at(1_700_000_059))?;
        assert_eq!(claims.subject, "alice");

        assert_eq!(
            service.decode_at(&token, at(1_700_000_060)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            service.decode_at(&token, at(1_700_000_061)),
            Err(TokenError::Expired)
        );

        Ok(())
    }

    #[test]
    fn issue_rejects_non_positive_ttl() {
        let service = service();
        assert!(service.issue("alice", SignedDuration::ZERO).is_err());
        assert!(service.issue("alice", SignedDuration::from_secs(-5)).is_err());
        assert!(service.issue("alice", SignedDuration::from_millis(500)).is_err());
    }

    #[test]
    fn altered_token_is_invalid_not_expired() -> anyhow::Result<()> {
        let service = service();
        let token = service.issue("alice", SignedDuration::from_secs(3600))?;

        for index in [0, token.len() / 2, token.len() - 1] {
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let altered = String::from_utf8(bytes)?;

            assert_eq!(service.decode(&altered), Err(TokenError::Invalid));
        }

        Ok(())
    }

    #[test]
    fn altered_expired_token_is_invalid() -> anyhow::Result<()> {
        let service = service();
        let token = service.issue_at("alice", SignedDuration::from_secs(60), at(1_000))?;

        let mut bytes = token.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
        let altered = String::from_utf8(bytes)?;

        assert_eq!(
            service.decode_at(&altered, at(10_000)),
            Err(TokenError::Invalid)
        );

        Ok(())
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() -> anyhow::Result<()> {
        let other = TokenService::new(&TokenConfig::new("another-secret"))?;
        let token = other.issue("alice", SignedDuration::from_secs(3600))?;

        assert_eq!(service().decode(&token), Err(TokenError::Invalid));
        Ok(())
    }

    #[test]
    fn token_without_subject_is_invalid() -> anyhow::Result<()> {
        let exp = Timestamp::now().as_second() + 3600;
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "exp": exp }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )?;

        assert_eq!(service().decode(&token), Err(TokenError::Invalid));
        Ok(())
    }

    #[test]
    fn token_without_expiry_is_invalid() -> anyhow::Result<()> {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "sub": "alice" }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )?;

        assert_eq!(service().decode(&token), Err(TokenError::Invalid));
        Ok(())
    }

    #[test]
    fn garbage_is_invalid() {
        let service = service();
        assert_eq!(service.decode(""), Err(TokenError::Invalid));
        assert_eq!(service.decode("not-a-token"), Err(TokenError::Invalid));
        assert_eq!(service.decode("a.b.c"), Err(TokenError::Invalid));
    }
}
