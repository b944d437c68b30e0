//! Error types for task domain validation and parsing.

use super::TaskId;
use crate::error::{ClassifiedError, ErrorKind, FieldErrors, field_error};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the stored column width.
    #[error("task title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },

    /// A task was made its own parent.
    #[error("task {0} cannot be its own parent")]
    SelfParent(TaskId),
}

impl TaskDomainError {
    /// Returns the request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::SelfParent(_) => "parentTaskId",
        }
    }
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

impl ClassifiedError for ParseTaskStatusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::ValidationFailed
    }

    fn field_errors(&self) -> FieldErrors {
        field_error("status", self)
    }
}

impl ClassifiedError for ParseTaskPriorityError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::ValidationFailed
    }

    fn field_errors(&self) -> FieldErrors {
        field_error("priority", self)
    }
}
