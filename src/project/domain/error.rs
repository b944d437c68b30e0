//! Error types for project domain validation.

use thiserror::Error;

/// Errors returned while constructing project values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyName,

    /// The project name exceeds the storage limit.
    #[error("project name exceeds {max} characters")]
    NameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

impl ProjectDomainError {
    /// Returns the request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
        }
    }
}
