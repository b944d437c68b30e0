//! Response projection of a task.

use crate::identity::domain::EmailAddress;
use crate::project::domain::ProjectId;
use crate::task::domain::{Task, TaskId, TaskPriority, TaskStatus, TaskVersion};
use crate::timestamp::{serde_optional_timestamp, serde_timestamp};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Caller-facing view of a task.
///
/// The assignee is reported by email and the parent by bare identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Optional due date.
    #[serde(with = "serde_optional_timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    /// Owning project.
    pub project_id: ProjectId,
    /// Email of the assignee, if any.
    pub assignee_email: Option<EmailAddress>,
    /// Parent task, if any.
    pub parent_task_id: Option<TaskId>,
    /// Version to quote on the next update.
    pub version: TaskVersion,
    /// Creation timestamp.
    #[serde(with = "serde_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    #[serde(with = "serde_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl TaskView {
    /// Projects `task`, reporting `assignee_email` as its assignee.
    #[must_use]
    pub fn from_task(task: &Task, assignee_email: Option<EmailAddress>) -> Self {
        Self {
            id: task.id(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status(),
            priority: task.priority(),
            due_date: task.due_date(),
            project_id: task.project_id(),
            assignee_email,
            parent_task_id: task.parent_task_id(),
            version: task.version(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}
