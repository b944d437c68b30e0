//! Application services for project orchestration.

mod project;
mod view;

pub use project::{
    CreateProjectRequest, ProjectService, ProjectServiceError, ProjectServiceResult,
};
pub use view::ProjectView;
