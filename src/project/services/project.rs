//! Service layer for project creation and owner-scoped retrieval.

use super::ProjectView;
use crate::error::{ClassifiedError, ErrorKind, FieldErrors, field_error};
use crate::identity::{
    domain::User,
    ports::{UserDirectory, UserDirectoryError},
    services::{CallerError, resolve_caller},
};
use crate::paging::{Page, PageRequest};
use crate::project::{
    domain::{Project, ProjectDomainError, ProjectId, ProjectName, ProjectSortField},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with the given project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),

    /// The caller identity did not resolve.
    #[error(transparent)]
    Caller(#[from] CallerError),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The caller neither owns the project nor is an administrator.
    #[error("caller may not access project {0}")]
    Unauthorized(ProjectId),

    /// Project persistence failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),

    /// Owner lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
}

impl ClassifiedError for ProjectServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::ValidationFailed,
            Self::Caller(err) => err.kind(),
            Self::ProjectNotFound(_) | Self::Directory(UserDirectoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Repository(_) | Self::Directory(_) => ErrorKind::Unexpected,
        }
    }

    fn field_errors(&self) -> FieldErrors {
        match self {
            Self::Domain(err) => field_error(err.field(), err),
            _ => FieldErrors::new(),
        }
    }
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project orchestration service.
#[derive(Clone)]
pub struct ProjectService<P, D, C>
where
    P: ProjectRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<P, D, C> ProjectService<P, D, C>
where
    P: ProjectRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(projects: Arc<P>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            projects,
            directory,
            clock,
        }
    }

    /// Creates a project owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Caller`] when the identity does not
    /// resolve, [`ProjectServiceError::Domain`] for an invalid name, and
    /// [`ProjectServiceError::Repository`] when persistence fails.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
        owner_identity: &str,
    ) -> ProjectServiceResult<ProjectView> {
        let owner = resolve_caller(&*self.directory, owner_identity).await?;
        let CreateProjectRequest { name, description } = request;
        let project = Project::new(
            ProjectName::new(name)?,
            description,
            owner.id(),
            &*self.clock,
        );
        self.projects.store(&project).await?;
        info!(project_id = %project.id(), owner_id = %owner.id(), "created project");
        Ok(ProjectView::from_project(&project, owner.email().clone()))
    }

    /// Lists the caller's own projects.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Caller`] when the identity does not
    /// resolve and [`ProjectServiceError::Repository`] when the query fails.
    pub async fn list_projects(
        &self,
        owner_identity: &str,
        request: &PageRequest<ProjectSortField>,
    ) -> ProjectServiceResult<Page<ProjectView>> {
        let owner = resolve_caller(&*self.directory, owner_identity).await?;
        let page = self.projects.list_by_owner(owner.id(), request).await?;
        debug!(
            owner_id = %owner.id(),
            page = request.page(),
            returned = page.number_of_elements(),
            "listed projects"
        );
        let owner_email = owner.email().clone();
        Ok(page.map(|project| ProjectView::from_project(&project, owner_email.clone())))
    }

    /// Returns one project visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::ProjectNotFound`] when the project is
    /// absent and [`ProjectServiceError::Unauthorized`] when the caller
    /// neither owns it nor is an administrator.
    pub async fn get_project(
        &self,
        caller_identity: &str,
        project_id: ProjectId,
    ) -> ProjectServiceResult<ProjectView> {
        let caller = resolve_caller(&*self.directory, caller_identity).await?;
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))?;
        ensure_member(&caller, &project)?;
        let owner_email = if project.is_owned_by(caller.id()) {
            caller.email().clone()
        } else {
            self.directory
                .find_by_id(project.owner_id())
                .await?
                .ok_or(UserDirectoryError::NotFound(project.owner_id()))?
                .email()
                .clone()
        };
        debug!(project_id = %project.id(), "loaded project");
        Ok(ProjectView::from_project(&project, owner_email))
    }
}

fn ensure_member(caller: &User, project: &Project) -> ProjectServiceResult<()> {
    if caller.is_admin() || project.is_owned_by(caller.id()) {
        return Ok(());
    }
    warn!(
        project_id = %project.id(),
        caller_id = %caller.id(),
        "denied project access"
    );
    Err(ProjectServiceError::Unauthorized(project.id()))
}
