//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig      # Host, port, shutdown
//! ├── recovery: RecoveryConfig  # Request timeout
//! ├── service: ServiceConfig    # Postgres, token secret and lifetime
//! └── command: Option<Command>  # `create-user`, or serve when absent
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! magicball-cli --postgres-url "postgresql://..." --jwt-secret "..." --port 8080
//!
//! POSTGRES_URL="postgresql://..." JWT_SECRET="..." PORT=8080 magicball-cli
//! ```

mod server;

use std::{fmt, process};

use anyhow::Context;
use clap::{Parser, Subcommand};
use magicball_server::middleware::RecoveryConfig;
use magicball_server::service::ServiceConfig;
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "magicball")]
#[command(about = "Magic ball question and answer server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Panic and timeout recovery configuration.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Database and access token configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// One-off administrative command. Serves HTTP when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Administrative commands run instead of the server.
#[derive(Clone, Subcommand)]
pub enum Command {
    /// Provisions a user account with an argon2 hashed password.
    CreateUser {
        /// Login name of the new user.
        #[arg(long)]
        username: String,

        /// Plaintext password, hashed before it is stored.
        #[arg(long, env = "CREATE_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateUser { username, .. } => f
                .debug_struct("CreateUser")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded first so that clap's `env` fallbacks can see it.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with `RUST_LOG` filtering, `info` by default.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.recovery
            .validate()
            .context("invalid recovery configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;
        Ok(())
    }

    /// Logs configuration without secrets.
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            token_ttl_secs = self.service.token.token_ttl_secs,
            "Middleware and token configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            postgres_url = %self.service.postgres.database_url_masked(),
            postgres_max_connections = self.service.postgres.postgres_max_connections,
            "Database configuration"
        );
    }

    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
