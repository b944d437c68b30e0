//! Applies the taskboard schema to a `PostgreSQL` database.
//!
//! Usage:
//!
//! ```text
//! taskboard-migrate [config-path]
//! ```
//!
//! The optional `config-path` points at a JSON [`TaskboardConfig`] document.
//! Environment overrides (`TASKBOARD_DATABASE_URL` and friends) are applied
//! on top of it, so the binary runs without a file when the database URL is
//! set in the environment. Log verbosity follows `RUST_LOG` and defaults to
//! `info`.

use std::path::PathBuf;

use taskboard::config::{ConfigError, TaskboardConfig};
use taskboard::feature::FeatureToggleService;
use taskboard::storage::{StorageError, apply_schema, build_pool};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum MigrateError {
    #[error("unexpected extra argument: {0}")]
    ExtraArgument(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

fn main() -> Result<(), BoxError> {
    init_tracing();
    let config_path = parse_args(std::env::args_os().skip(1))?;
    run(config_path).map_err(Into::into)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn parse_args(
    mut args: impl Iterator<Item = std::ffi::OsString>,
) -> Result<Option<PathBuf>, MigrateError> {
    let config_path = args.next().map(PathBuf::from);
    if let Some(extra) = args.next() {
        return Err(MigrateError::ExtraArgument(
            extra.to_string_lossy().into_owned(),
        ));
    }
    Ok(config_path)
}

fn run(config_path: Option<PathBuf>) -> Result<(), MigrateError> {
    let config = TaskboardConfig::load(config_path.as_deref())?;
    let features = FeatureToggleService::new(config.features);
    for (name, enabled) in features.all_features() {
        info!(feature = name, enabled, "feature toggle");
    }

    let pool = build_pool(&config.database)?;
    apply_schema(&pool)?;
    info!(
        max_connections = config.database.max_connections,
        "taskboard schema applied"
    );
    Ok(())
}
