//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The email address is empty after trimming.
    #[error("email must not be empty")]
    EmptyEmail,

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The email address exceeds the storage limit.
    #[error("email exceeds {max} characters")]
    EmailTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// The display name exceeds the storage limit.
    #[error("display name exceeds {max} characters")]
    DisplayNameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

impl IdentityDomainError {
    /// Returns the request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail(_) | Self::EmailTooLong { .. } => "email",
            Self::EmptyDisplayName | Self::DisplayNameTooLong { .. } => "name",
        }
    }
}

/// Error returned while parsing user roles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseUserRoleError(pub String);
