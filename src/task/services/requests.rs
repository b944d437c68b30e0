//! Request payloads accepted by the task service.

use crate::task::domain::{FieldChange, TaskId, TaskPriority, TaskStatus, TaskVersion};
use chrono::{DateTime, Utc};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) priority: Option<TaskPriority>,
    pub(super) due_date: Option<DateTime<Utc>>,
    pub(super) assignee_email: Option<String>,
    pub(super) parent_task_id: Option<TaskId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
            due_date: None,
            assignee_email: None,
            parent_task_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority; [`TaskPriority::Medium`] applies otherwise.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Assigns the task to the user with this email.
    ///
    /// Without an assignee, or with a blank one, the creator is assigned.
    #[must_use]
    pub fn with_assignee_email(mut self, email: impl Into<String>) -> Self {
        self.assignee_email = Some(email.into());
        self
    }

    /// Places the task under a parent task.
    #[must_use]
    pub const fn with_parent_task_id(mut self, parent_task_id: TaskId) -> Self {
        self.parent_task_id = Some(parent_task_id);
        self
    }
}

/// Request payload for changing a task's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateTaskStatusRequest {
    pub(super) task_id: TaskId,
    pub(super) status: TaskStatus,
    pub(super) expected_version: Option<TaskVersion>,
}

impl UpdateTaskStatusRequest {
    /// Creates a request that sets `status` on `task_id`.
    #[must_use]
    pub const fn new(task_id: TaskId, status: TaskStatus) -> Self {
        Self {
            task_id,
            status,
            expected_version: None,
        }
    }

    /// Rejects the update unless the stored version equals `version`.
    #[must_use]
    pub const fn with_expected_version(mut self, version: TaskVersion) -> Self {
        self.expected_version = Some(version);
        self
    }
}

/// Request payload for editing task details.
///
/// Fields left untouched keep their stored values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    pub(super) task_id: TaskId,
    pub(super) expected_version: TaskVersion,
    pub(super) title: Option<String>,
    pub(super) description: FieldChange<String>,
    pub(super) priority: Option<TaskPriority>,
    pub(super) due_date: FieldChange<DateTime<Utc>>,
    pub(super) assignee_email: FieldChange<String>,
    pub(super) parent_task_id: FieldChange<TaskId>,
}

impl UpdateTaskRequest {
    /// Creates an edit of `task_id` as last read at `expected_version`.
    #[must_use]
    pub const fn new(task_id: TaskId, expected_version: TaskVersion) -> Self {
        Self {
            task_id,
            expected_version,
            title: None,
            description: FieldChange::Keep,
            priority: None,
            due_date: FieldChange::Keep,
            assignee_email: FieldChange::Keep,
            parent_task_id: FieldChange::Keep,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description; `None` clears it.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = FieldChange::from_option(description);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the due date; `None` clears it.
    #[must_use]
    pub fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = FieldChange::from_option(due_date);
        self
    }

    /// Reassigns the task by email; `None` unassigns it.
    #[must_use]
    pub fn with_assignee_email(mut self, email: Option<String>) -> Self {
        self.assignee_email = FieldChange::from_option(email);
        self
    }

    /// Moves the task under another parent; `None` makes it top-level.
    #[must_use]
    pub fn with_parent_task_id(mut self, parent_task_id: Option<TaskId>) -> Self {
        self.parent_task_id = FieldChange::from_option(parent_task_id);
        self
    }
}
