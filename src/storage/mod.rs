//! Shared `PostgreSQL` plumbing for the diesel adapters.
//!
//! Every repository offloads synchronous diesel work to the blocking thread
//! pool through these helpers so the async executor is never blocked.

use crate::config::DatabaseConfig;
use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use std::sync::Arc;
use thiserror::Error;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
pub(crate) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// SQL creating the users, projects, and tasks tables.
pub const SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-02-01-000000_create_taskboard_tables/up.sql");

/// Errors raised while preparing storage.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// No database URL was configured.
    #[error("no database URL configured")]
    MissingUrl,

    /// The connection pool could not be built or yielded no connection.
    #[error("connection pool error: {0}")]
    Pool(Arc<PoolError>),

    /// Applying the schema failed.
    #[error("schema bootstrap failed: {0}")]
    Schema(Arc<diesel::result::Error>),
}

/// Builds a connection pool from configuration.
///
/// # Errors
///
/// Returns [`StorageError::MissingUrl`] when no URL is configured or
/// [`StorageError::Pool`] when the pool cannot connect.
pub fn build_pool(config: &DatabaseConfig) -> Result<PgPool, StorageError> {
    let url = config.url.as_deref().ok_or(StorageError::MissingUrl)?;
    let manager = ConnectionManager::<PgConnection>::new(url);
    Pool::builder()
        .max_size(config.max_connections)
        .build(manager)
        .map_err(|err| StorageError::Pool(Arc::new(err)))
}

/// Applies the schema to the database behind `pool`.
///
/// The statements are idempotent, so running this against an up-to-date
/// database is a no-op.
///
/// # Errors
///
/// Returns [`StorageError`] when no connection is available or a statement
/// fails.
pub fn apply_schema(pool: &PgPool) -> Result<(), StorageError> {
    let mut connection = pool.get().map_err(|err| StorageError::Pool(Arc::new(err)))?;
    connection
        .batch_execute(SCHEMA_SQL)
        .map_err(|err| StorageError::Schema(Arc::new(err)))
}

/// Runs a blocking task and maps join errors into the caller's error type.
pub(crate) async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Obtains a connection from the pool with a caller-provided error mapper.
pub(crate) fn get_conn_with<E, M>(pool: &PgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}

/// Converts a page offset or size to the `BIGINT` diesel binds.
#[must_use]
pub(crate) fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Converts a `COUNT(*)` result to an unsigned total.
#[must_use]
pub(crate) fn from_sql_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}
