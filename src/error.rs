//! Caller-facing error classification shared by every service.
//!
//! Services keep their own `thiserror` enums; this module maps each of them
//! onto the small set of kinds a serving layer turns into response codes.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Field-keyed validation messages.
pub type FieldErrors = BTreeMap<String, String>;

/// Stable message returned in place of internal failure detail.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Classification of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A referenced user, project, parent task, or task does not exist.
    NotFound,
    /// A required field is missing, empty, or malformed.
    ValidationFailed,
    /// A concurrent writer updated the record first.
    OptimisticLockConflict,
    /// No caller identity accompanied the request.
    Unauthenticated,
    /// The caller may not access the resource.
    Unauthorized,
    /// Any other failure.
    Unexpected,
}

impl ErrorKind {
    /// Returns the canonical name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::OptimisticLockConflict => "OPTIMISTIC_LOCK_CONFLICT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Unexpected => "UNEXPECTED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by service errors so callers can branch on the failure kind.
pub trait ClassifiedError: std::error::Error {
    /// Returns the kind of this failure.
    fn kind(&self) -> ErrorKind;

    /// Returns field-keyed messages for validation failures.
    ///
    /// Errors that are not tied to a request field return an empty map.
    fn field_errors(&self) -> FieldErrors {
        FieldErrors::new()
    }

    /// Returns a message safe to show to the caller.
    ///
    /// [`ErrorKind::Unexpected`] failures never expose their internal detail.
    fn public_message(&self) -> String {
        if self.kind() == ErrorKind::Unexpected {
            UNEXPECTED_ERROR_MESSAGE.to_owned()
        } else {
            self.to_string()
        }
    }
}

/// Serializable summary of a classified error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Failure kind.
    pub kind: ErrorKind,
    /// Caller-safe message.
    pub message: String,
    /// Field-keyed validation messages; omitted when empty.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
}

impl ErrorReport {
    /// Builds a report from any classified error.
    #[must_use]
    pub fn from_error(error: &impl ClassifiedError) -> Self {
        Self {
            kind: error.kind(),
            message: error.public_message(),
            errors: error.field_errors(),
        }
    }
}

/// Builds a single-entry field error map.
pub(crate) fn field_error(field: &str, message: impl fmt::Display) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_owned(), message.to_string());
    errors
}
