//! In-memory project repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::paging::{Page, PageRequest};
use crate::project::{
    domain::{Project, ProjectId, ProjectSortField},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut projects = self.projects.write().map_err(lock_error)?;
        if projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let projects = self.projects.read().map_err(lock_error)?;
        Ok(projects.get(&id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: UserId,
        request: &PageRequest<ProjectSortField>,
    ) -> ProjectRepositoryResult<Page<Project>> {
        let projects = self.projects.read().map_err(lock_error)?;
        let mut owned: Vec<Project> = projects
            .values()
            .filter(|project| project.is_owned_by(owner_id))
            .cloned()
            .collect();
        drop(projects);
        let sort = request.sort();
        owned.sort_by(|left, right| left.compare_by(right, sort));
        Ok(request.slice(owned))
    }
}
