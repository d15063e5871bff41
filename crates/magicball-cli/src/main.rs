#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::{Context, bail};
use axum::Router;
use magicball_postgres::model::NewUser;
use magicball_postgres::query::UserRepository;
use magicball_server::handler::routes;
use magicball_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
use magicball_server::service::{PasswordHasher, ServiceConfig, ServiceState};

use crate::config::{Cli, Command};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "magicball_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "magicball_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "magicball_cli::config";
pub const TRACING_TARGET_ADMIN: &str = "magicball_cli::admin";

const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_unique";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting magic ball server"
    );

    cli.log();
    cli.validate()?;

    match cli.command {
        Some(Command::CreateUser { username, password }) => {
            create_user(&cli.service, username, &password).await
        }
        None => {
            let state = ServiceState::from_config(&cli.service)
                .await
                .context("failed to create service state")?;
            let router = create_router(state, &cli.recovery);

            server::serve(router, &cli.server).await?;
            Ok(())
        }
    }
}

/// Creates the router with all middleware layers applied.
///
/// Recovery is added last and becomes the outermost layer, so the request
/// timeout covers the whole stack.
fn create_router(state: ServiceState, recovery: &RecoveryConfig) -> Router {
    routes()
        .with_state(state)
        .with_observability()
        .with_recovery(recovery)
}

/// Provisions a user account out of band.
async fn create_user(
    config: &ServiceConfig,
    username: String,
    password: &str,
) -> anyhow::Result<()> {
    if username.is_empty() || password.is_empty() {
        bail!("username and password cannot be empty");
    }

    let pg_client = config
        .connect_postgres()
        .await
        .context("failed to connect to the database")?;

    let password_hash = PasswordHasher::new()
        .hash_password(password)
        .context("failed to hash password")?;

    let mut conn = pg_client.get_connection().await?;
    let new_user = NewUser {
        username,
        password_hash,
    };

    let user = match conn.create_user(new_user).await {
        Ok(user) => user,
        Err(err) if err.constraint() == Some(USERNAME_UNIQUE_CONSTRAINT) => {
            bail!("username is already taken");
        }
        Err(err) => return Err(err).context("failed to create user"),
    };

    tracing::info!(
        target: TRACING_TARGET_ADMIN,
        user_id = user.id,
        username = %user.username,
        "user created"
    );

    Ok(())
}
