//! Sortable project fields.

use crate::paging::{Sort, SortDirection, SortField};

/// Fields a project listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectSortField {
    /// Project identifier.
    Id,
    /// Project name.
    Name,
    /// Creation timestamp.
    CreatedAt,
    /// Latest update timestamp.
    UpdatedAt,
}

impl ProjectSortField {
    /// Default listing order: newest first.
    #[must_use]
    pub const fn default_sort() -> Sort<Self> {
        Sort::new(Self::CreatedAt, SortDirection::Desc)
    }
}

impl SortField for ProjectSortField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}
