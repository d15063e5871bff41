//! Configuration of the services behind the HTTP handlers.

#[cfg(feature = "config")]
use clap::Args;
use magicball_postgres::{PgClient, PgConfig, run_pending_migrations};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::service::{TokenConfig, TokenService};
use crate::utility::tracing_targets::SERVICE as TRACING_TARGET;

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Postgres connection and pool settings.
    #[cfg_attr(feature = "config", clap(flatten))]
    pub postgres: PgConfig,

    /// Access token signing secret and lifetime.
    #[cfg_attr(feature = "config", clap(flatten))]
    pub token: TokenConfig,
}

impl ServiceConfig {
    /// Creates a new service configuration.
    pub fn new(postgres: PgConfig, token: TokenConfig) -> Self {
        Self { postgres, token }
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns a config error for an invalid postgres or token configuration.
    pub fn validate(&self) -> Result<()> {
        self.postgres.validate()?;
        self.token.validate()?;
        Ok(())
    }

    /// Connects to the Postgres database and runs pending migrations.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        let pg_client = PgClient::connect(self.postgres.clone()).await?;
        let migrations = run_pending_migrations(&pg_client).await?;

        tracing::info!(
            target: TRACING_TARGET,
            applied = migrations.applied_versions.len(),
            last_applied = ?migrations.last_applied_version(),
            duration = ?migrations.duration,
            "database schema is up to date"
        );

        Ok(pg_client)
    }

    /// Creates the access token service.
    pub fn create_token_service(&self) -> Result<TokenService> {
        TokenService::new(&self.token)
    }
}
