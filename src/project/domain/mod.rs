//! Domain model for projects.

mod error;
mod ids;
mod project;
mod sort;

pub use error::ProjectDomainError;
pub use ids::ProjectId;
pub use project::{PersistedProjectData, Project, ProjectName};
pub use sort::ProjectSortField;
