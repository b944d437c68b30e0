//! Process configuration.
//!
//! Configuration is read once at start-up from an optional JSON file and then
//! overridden by `TASKBOARD_*` environment variables. The resulting
//! [`TaskboardConfig`] is immutable and handed to the components that need
//! it.

use crate::feature::{FeatureFlag, FeatureToggles};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Environment variable overriding the database URL.
pub const ENV_DATABASE_URL: &str = "TASKBOARD_DATABASE_URL";
/// Environment variable overriding the connection pool size.
pub const ENV_DATABASE_MAX_CONNECTIONS: &str = "TASKBOARD_DATABASE_MAX_CONNECTIONS";
/// Environment variable overriding the default page size.
pub const ENV_DEFAULT_PAGE_SIZE: &str = "TASKBOARD_DEFAULT_PAGE_SIZE";
/// Environment variable overriding the maximum page size.
pub const ENV_MAX_PAGE_SIZE: &str = "TASKBOARD_MAX_PAGE_SIZE";

/// Errors returned while loading configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },

    /// The configuration file is not valid JSON for [`TaskboardConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(Arc<serde_json::Error>),

    /// An environment override could not be parsed.
    #[error("invalid value '{value}' for {key}")]
    InvalidOverride {
        /// Environment variable name.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// The assembled configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

/// Page size limits applied by serving layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagingConfig {
    /// Page size used when the caller supplies none.
    pub default_page_size: u32,
    /// Largest page size a caller may request.
    pub max_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Complete process configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskboardConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Paging limits.
    pub paging: PagingConfig,
    /// Feature toggle snapshot.
    pub features: FeatureToggles,
}

impl TaskboardConfig {
    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown keys.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|err| ConfigError::Parse(Arc::new(err)))
    }

    /// Reads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read or
    /// [`ConfigError::Parse`] when its content is invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            source: Arc::new(err),
        })?;
        Self::from_json_str(&text)
    }

    /// Loads the file (when given), applies process environment overrides,
    /// and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any stage fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(file) => Self::from_file(file)?,
            None => Self::default(),
        };
        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides resolved through `lookup`.
    ///
    /// Feature flags are overridden by `TASKBOARD_FEATURE_<NAME>` where
    /// `<NAME>` is the flag name upper-cased with `-` replaced by `_`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] for unparsable values.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database.url = Some(url);
        }
        if let Some(value) = lookup(ENV_DATABASE_MAX_CONNECTIONS) {
            self.database.max_connections = parse_override(ENV_DATABASE_MAX_CONNECTIONS, &value)?;
        }
        if let Some(value) = lookup(ENV_DEFAULT_PAGE_SIZE) {
            self.paging.default_page_size = parse_override(ENV_DEFAULT_PAGE_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_PAGE_SIZE) {
            self.paging.max_page_size = parse_override(ENV_MAX_PAGE_SIZE, &value)?;
        }
        for flag in FeatureFlag::ALL {
            let key = feature_env_key(flag);
            if let Some(value) = lookup(&key) {
                let enabled = parse_override(&key, &value)?;
                self.features = self.features.with(flag, enabled);
            }
        }
        Ok(self)
    }

    /// Checks cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when page sizes or pool size are
    /// zero, or the default page size exceeds the maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be positive".to_owned(),
            ));
        }
        if self.paging.default_page_size == 0 || self.paging.max_page_size == 0 {
            return Err(ConfigError::Invalid(
                "page sizes must be positive".to_owned(),
            ));
        }
        if self.paging.default_page_size > self.paging.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "default page size {} exceeds maximum {}",
                self.paging.default_page_size, self.paging.max_page_size
            )));
        }
        Ok(())
    }
}

/// Returns the environment variable that overrides `flag`.
#[must_use]
pub fn feature_env_key(flag: FeatureFlag) -> String {
    format!(
        "TASKBOARD_FEATURE_{}",
        flag.name().replace('-', "_").to_ascii_uppercase()
    )
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride {
            key: key.to_owned(),
            value: value.to_owned(),
        })
}
