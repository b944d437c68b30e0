//! Repository port for task persistence, versioned updates, and listings.

use crate::identity::domain::UserId;
use crate::paging::{Page, PageRequest};
use crate::project::domain::ProjectId;
use crate::task::domain::{Task, TaskId, TaskSortField, TaskVersion};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Replaces a stored task if its stored version still equals `expected`.
    ///
    /// The compare and the write are atomic: of two writers that read the
    /// same version, exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::VersionConflict`] when the stored version
    /// differs from `expected`.
    async fn update(&self, task: &Task, expected: TaskVersion) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns one page of the tasks in `project_id`.
    async fn list_by_project(
        &self,
        project_id: ProjectId,
        request: &PageRequest<TaskSortField>,
    ) -> TaskRepositoryResult<Page<Task>>;

    /// Returns one page of the tasks assigned to `assignee_id`.
    async fn list_by_assignee(
        &self,
        assignee_id: UserId,
        request: &PageRequest<TaskSortField>,
    ) -> TaskRepositoryResult<Page<Task>>;

    /// Counts the tasks in `project_id`.
    async fn count_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored version no longer matches the writer's expectation.
    #[error("task {task_id} was modified concurrently (expected version {expected})")]
    VersionConflict {
        /// Task being written.
        task_id: TaskId,
        /// Version the writer last read.
        expected: TaskVersion,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
