//! In-memory task repository with version compare-and-swap.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::paging::{Page, PageRequest};
use crate::project::domain::ProjectId;
use crate::task::{
    domain::{Task, TaskId, TaskSortField, TaskVersion},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    project_index: HashMap<ProjectId, Vec<TaskId>>,
}

impl InMemoryTaskState {
    fn project_tasks(&self, project_id: ProjectId) -> Vec<Task> {
        self.project_index
            .get(&project_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn sorted_page(mut tasks: Vec<Task>, request: &PageRequest<TaskSortField>) -> Page<Task> {
    let sort = request.sort();
    tasks.sort_by(|left, right| left.compare_by(right, sort));
    request.slice(tasks)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state
            .project_index
            .entry(task.project_id())
            .or_default()
            .push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, expected: TaskVersion) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if stored.version() != expected {
            return Err(TaskRepositoryError::VersionConflict {
                task_id: task.id(),
                expected,
            });
        }
        *stored = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
        request: &PageRequest<TaskSortField>,
    ) -> TaskRepositoryResult<Page<Task>> {
        let tasks = self.state.read().map_err(lock_error)?.project_tasks(project_id);
        Ok(sorted_page(tasks, request))
    }

    async fn list_by_assignee(
        &self,
        assignee_id: UserId,
        request: &PageRequest<TaskSortField>,
    ) -> TaskRepositoryResult<Page<Task>> {
        let tasks: Vec<Task> = self
            .state
            .read()
            .map_err(lock_error)?
            .tasks
            .values()
            .filter(|task| task.is_assigned_to(assignee_id))
            .cloned()
            .collect();
        Ok(sorted_page(tasks, request))
    }

    async fn count_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        let count = state.project_index.get(&project_id).map_or(0, Vec::len);
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
