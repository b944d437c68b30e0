//! Task aggregate root and its edit types.

use super::{TaskDomainError, TaskId, TaskPriority, TaskSortField, TaskStatus, TaskVersion};
use crate::identity::domain::UserId;
use crate::paging::{Sort, SortDirection};
use crate::project::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Validated task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Longest accepted title, in characters.
    pub const MAX_LENGTH: usize = 255;

    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for blank input or
    /// [`TaskDomainError::TitleTooLong`] past [`Self::MAX_LENGTH`].
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(TaskDomainError::TitleTooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Edit instruction for an optional task field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldChange<T> {
    /// Leave the field as it is.
    #[default]
    Keep,
    /// Replace the field value.
    Set(T),
    /// Remove the field value.
    Clear,
}

impl<T> FieldChange<T> {
    /// Builds a change from an optional value: `Some` sets, `None` clears.
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }

    /// Returns the new value, if this change sets one.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Keep | Self::Clear => None,
        }
    }

    fn apply_to(self, current: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *current = Some(value),
            Self::Clear => *current = None,
        }
    }
}

/// Validated detail edits applied to a task in one update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<TaskTitle>,
    /// Description edit.
    pub description: FieldChange<String>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Due date edit.
    pub due_date: FieldChange<DateTime<Utc>>,
    /// Assignee edit.
    pub assignee_id: FieldChange<UserId>,
    /// Parent edit.
    pub parent_task_id: FieldChange<TaskId>,
}

/// Inputs for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Validated title.
    pub title: TaskTitle,
    /// Optional description.
    pub description: Option<String>,
    /// Priority.
    pub priority: TaskPriority,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Owning project.
    pub project_id: ProjectId,
    /// Assigned user, if any.
    pub assignee_id: Option<UserId>,
    /// Parent task, if any.
    pub parent_task_id: Option<TaskId>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
    project_id: ProjectId,
    assignee_id: Option<UserId>,
    parent_task_id: Option<TaskId>,
    version: TaskVersion,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted assignee.
    pub assignee_id: Option<UserId>,
    /// Persisted parent task.
    pub parent_task_id: Option<TaskId>,
    /// Persisted version.
    pub version: TaskVersion,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in status [`TaskStatus::Todo`] at the initial
    /// version.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            status: TaskStatus::Todo,
            priority: data.priority,
            due_date: data.due_date,
            project_id: data.project_id,
            assignee_id: data.assignee_id,
            parent_task_id: data.parent_task_id,
            version: TaskVersion::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            project_id: data.project_id,
            assignee_id: data.assignee_id,
            parent_task_id: data.parent_task_id,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns `true` when `user_id` is the assignee.
    #[must_use]
    pub fn is_assigned_to(&self, user_id: UserId) -> bool {
        self.assignee_id == Some(user_id)
    }

    /// Returns the parent task, if any.
    #[must_use]
    pub const fn parent_task_id(&self) -> Option<TaskId> {
        self.parent_task_id
    }

    /// Returns the current version.
    #[must_use]
    pub const fn version(&self) -> TaskVersion {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Sets the status and advances the version.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.record_update(clock);
    }

    /// Applies detail edits and advances the version once.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SelfParent`] when the edit would make the
    /// task its own parent. The task is left unchanged in that case.
    pub fn apply_changes(
        &mut self,
        changes: TaskChanges,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if changes.parent_task_id.as_set() == Some(&self.id) {
            return Err(TaskDomainError::SelfParent(self.id));
        }
        let TaskChanges {
            title,
            description,
            priority,
            due_date,
            assignee_id,
            parent_task_id,
        } = changes;

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(new_priority) = priority {
            self.priority = new_priority;
        }
        description.apply_to(&mut self.description);
        due_date.apply_to(&mut self.due_date);
        assignee_id.apply_to(&mut self.assignee_id);
        parent_task_id.apply_to(&mut self.parent_task_id);
        self.record_update(clock);
        Ok(())
    }

    /// Compares two tasks under `sort`, breaking ties on identifier.
    ///
    /// Tasks without a due date sort after dated tasks in both directions.
    #[must_use]
    pub fn compare_by(&self, other: &Self, sort: Sort<TaskSortField>) -> Ordering {
        let direction = sort.direction();
        let primary = match sort.field() {
            TaskSortField::Id => Ordering::Equal,
            TaskSortField::Title => direction.apply(self.title.cmp(&other.title)),
            TaskSortField::Status => direction.apply(self.status.rank().cmp(&other.status.rank())),
            TaskSortField::Priority => {
                direction.apply(self.priority.rank().cmp(&other.priority.rank()))
            }
            TaskSortField::DueDate => compare_nulls_last(self.due_date, other.due_date, direction),
            TaskSortField::CreatedAt => direction.apply(self.created_at.cmp(&other.created_at)),
            TaskSortField::UpdatedAt => direction.apply(self.updated_at.cmp(&other.updated_at)),
        };
        primary.then_with(|| direction.apply(self.id.cmp(&other.id)))
    }

    fn record_update(&mut self, clock: &impl Clock) {
        self.version = self.version.next();
        self.updated_at = clock.utc();
    }
}

fn compare_nulls_last(
    left: Option<DateTime<Utc>>,
    right: Option<DateTime<Utc>>,
    direction: SortDirection,
) -> Ordering {
    match (left, right) {
        (Some(left_value), Some(right_value)) => direction.apply(left_value.cmp(&right_value)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
