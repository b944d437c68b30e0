//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status name.
    pub status: String,
    /// Priority name.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Assigned user, if any.
    pub assignee_id: Option<uuid::Uuid>,
    /// Parent task, if any.
    pub parent_task_id: Option<uuid::Uuid>,
    /// Optimistic-concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status name.
    pub status: String,
    /// Priority name.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Assigned user, if any.
    pub assignee_id: Option<uuid::Uuid>,
    /// Parent task, if any.
    pub parent_task_id: Option<uuid::Uuid>,
    /// Optimistic-concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset written by versioned updates.
///
/// `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks, treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status name.
    pub status: String,
    /// Priority name.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Assigned user, if any.
    pub assignee_id: Option<uuid::Uuid>,
    /// Parent task, if any.
    pub parent_task_id: Option<uuid::Uuid>,
    /// New version.
    pub version: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
