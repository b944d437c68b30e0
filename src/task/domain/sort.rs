//! Sortable task fields.

use crate::paging::{Sort, SortDirection, SortField};

/// Fields a task listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSortField {
    /// Task identifier.
    Id,
    /// Task title.
    Title,
    /// Status, ordered `TODO < IN_PROGRESS < DONE`.
    Status,
    /// Priority, ordered `LOW < MEDIUM < HIGH`.
    Priority,
    /// Due date; tasks without one sort last in either direction.
    DueDate,
    /// Creation timestamp.
    CreatedAt,
    /// Latest update timestamp.
    UpdatedAt,
}

impl TaskSortField {
    /// Default order for project listings: newest first.
    #[must_use]
    pub const fn default_project_sort() -> Sort<Self> {
        Sort::new(Self::CreatedAt, SortDirection::Desc)
    }

    /// Default order for assigned-task listings: soonest due first.
    #[must_use]
    pub const fn default_assigned_sort() -> Sort<Self> {
        Sort::new(Self::DueDate, SortDirection::Asc)
    }
}

impl SortField for TaskSortField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "status" => Some(Self::Status),
            "priority" => Some(Self::Priority),
            "dueDate" => Some(Self::DueDate),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}
