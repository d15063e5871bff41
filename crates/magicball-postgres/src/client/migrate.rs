//! Embedded schema migrations.

use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Total duration of the migration run.
    pub duration: Duration,
    /// Versions applied by this run, oldest first.
    pub applied_versions: Vec<String>,
}

impl MigrationResult {
    /// Returns whether the schema was already up to date.
    #[inline]
    pub fn is_no_op(&self) -> bool {
        self.applied_versions.is_empty()
    }

    /// Returns the last applied migration version, if any.
    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }
}

/// Applies all pending embedded migrations.
///
/// Migrations run synchronously on a blocking worker thread through
/// [`AsyncConnectionWrapper`]. Running this on an up-to-date schema is a no-op.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    tracing::info!(target: TRACING_TARGET_MIGRATION, "applying pending migrations");

    let start_time = Instant::now();
    let conn = pg.get_connection().await?.into_inner();
    let mut conn: AsyncConnectionWrapper<_> = conn.into();

    let versions = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS).map(|versions| {
            versions
                .into_iter()
                .map(|version| version.to_string())
                .collect::<Vec<_>>()
        })
    })
    .await
    .map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %err,
            "migration task panicked"
        );
        PgError::Migration(err.into())
    })?
    .map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %err,
            "migration failed"
        );
        PgError::Migration(err)
    })?;

    let result = MigrationResult {
        duration: start_time.elapsed(),
        applied_versions: versions,
    };

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?result.duration,
        applied = result.applied_versions.len(),
        last_version = result.last_applied_version(),
        "migrations completed"
    );

    Ok(result)
}
