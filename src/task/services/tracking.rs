//! Service layer for task creation, listing, and versioned mutation.

use super::{CreateTaskRequest, TaskView, UpdateTaskRequest, UpdateTaskStatusRequest};
use crate::error::{ClassifiedError, ErrorKind, FieldErrors, field_error};
use crate::feature::{FeatureFlag, FeatureToggleService};
use crate::identity::{
    domain::{EmailAddress, IdentityDomainError, User, UserId},
    ports::{UserDirectory, UserDirectoryError},
    services::{CallerError, resolve_caller},
};
use crate::paging::{Page, PageRequest};
use crate::project::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::{
    domain::{
        FieldChange, NewTaskData, Task, TaskChanges, TaskDomainError, TaskId, TaskSortField,
        TaskTitle, TaskVersion,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The caller identity did not resolve.
    #[error(transparent)]
    Caller(#[from] CallerError),

    /// The assignee email is malformed.
    #[error("invalid assignee email: {0}")]
    InvalidAssigneeEmail(IdentityDomainError),

    /// No user holds the assignee email.
    #[error("assignee not found: {0}")]
    AssigneeNotFound(EmailAddress),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The requested parent task does not exist.
    #[error("parent task not found: {0}")]
    ParentNotFound(TaskId),

    /// The requested parent task belongs to another project.
    #[error("parent task {parent_id} does not belong to project {project_id}")]
    ParentInOtherProject {
        /// Requested parent.
        parent_id: TaskId,
        /// Project of the child task.
        project_id: ProjectId,
    },

    /// Re-parenting would make the task its own ancestor.
    #[error("task {task_id} cannot be placed under its descendant {parent_id}")]
    CyclicParent {
        /// Task being moved.
        task_id: TaskId,
        /// Requested parent.
        parent_id: TaskId,
    },

    /// The caller may not act on the project.
    #[error("caller may not access project {0}")]
    UnauthorizedProject(ProjectId),

    /// The caller may not act on the task.
    #[error("caller may not modify task {0}")]
    UnauthorizedTask(TaskId),

    /// The caller's version is older than the stored one.
    #[error("task {task_id} is at version {actual}, not {expected}")]
    StaleVersion {
        /// Task being written.
        task_id: TaskId,
        /// Version the caller last read.
        expected: TaskVersion,
        /// Version currently stored.
        actual: TaskVersion,
    },

    /// Task persistence failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Project lookup failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),

    /// User lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
}

impl ClassifiedError for TaskServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_)
            | Self::InvalidAssigneeEmail(_)
            | Self::ParentInOtherProject { .. }
            | Self::CyclicParent { .. } => ErrorKind::ValidationFailed,
            Self::Caller(err) => err.kind(),
            Self::AssigneeNotFound(_)
            | Self::ProjectNotFound(_)
            | Self::TaskNotFound(_)
            | Self::ParentNotFound(_)
            | Self::Repository(TaskRepositoryError::NotFound(_))
            | Self::Directory(UserDirectoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::UnauthorizedProject(_) | Self::UnauthorizedTask(_) => ErrorKind::Unauthorized,
            Self::StaleVersion { .. }
            | Self::Repository(TaskRepositoryError::VersionConflict { .. }) => {
                ErrorKind::OptimisticLockConflict
            }
            Self::Repository(_) | Self::Projects(_) | Self::Directory(_) => ErrorKind::Unexpected,
        }
    }

    fn field_errors(&self) -> FieldErrors {
        match self {
            Self::Domain(err) => field_error(err.field(), err),
            Self::InvalidAssigneeEmail(_) | Self::AssigneeNotFound(_) => {
                field_error("assigneeEmail", self)
            }
            Self::ParentNotFound(_)
            | Self::ParentInOtherProject { .. }
            | Self::CyclicParent { .. } => field_error("parentTaskId", self),
            _ => FieldErrors::new(),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskService<T, P, D, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    directory: Arc<D>,
    features: FeatureToggleService,
    clock: Arc<C>,
}

impl<T, P, D, C> TaskService<T, P, D, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        projects: Arc<P>,
        directory: Arc<D>,
        features: FeatureToggleService,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            projects,
            directory,
            features,
            clock,
        }
    }

    /// Creates a task in a project the caller owns.
    ///
    /// The task starts in `TODO`. Without an assignee email the creator is
    /// assigned.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::ProjectNotFound`],
    /// [`TaskServiceError::AssigneeNotFound`], or
    /// [`TaskServiceError::ParentNotFound`] for missing references,
    /// [`TaskServiceError::UnauthorizedProject`] when the caller does not own
    /// the project, and [`TaskServiceError::ParentInOtherProject`] or
    /// [`TaskServiceError::Domain`] for invalid input.
    pub async fn create_task(
        &self,
        project_id: ProjectId,
        request: CreateTaskRequest,
        creator_identity: &str,
    ) -> TaskServiceResult<TaskView> {
        let creator = resolve_caller(&*self.directory, creator_identity).await?;
        let project = self.load_project(project_id).await?;
        ensure_project_member(&creator, &project)?;

        let CreateTaskRequest {
            title,
            description,
            priority,
            due_date,
            assignee_email,
            parent_task_id,
        } = request;
        let validated_title = TaskTitle::new(title)?;

        let assignee = match assignee_email.filter(|email| !email.trim().is_empty()) {
            Some(email) => self.resolve_assignee(email).await?,
            None => creator,
        };
        if let Some(parent_id) = parent_task_id {
            let parent = self.load_parent(parent_id).await?;
            ensure_same_project(&parent, project_id)?;
        }

        let task = Task::new(
            NewTaskData {
                title: validated_title,
                description,
                priority: priority.unwrap_or_default(),
                due_date,
                project_id,
                assignee_id: Some(assignee.id()),
                parent_task_id,
            },
            &*self.clock,
        );
        self.tasks.store(&task).await?;
        info!(task_id = %task.id(), project_id = %project_id, "created task");
        self.record_analytics("task_created", &task);
        Ok(TaskView::from_task(&task, Some(assignee.email().clone())))
    }

    /// Lists the tasks of a project the caller owns.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::ProjectNotFound`] when the project is
    /// absent and [`TaskServiceError::UnauthorizedProject`] when the caller
    /// neither owns it nor is an administrator.
    pub async fn get_tasks_by_project(
        &self,
        caller_identity: &str,
        project_id: ProjectId,
        request: &PageRequest<TaskSortField>,
    ) -> TaskServiceResult<Page<TaskView>> {
        let caller = resolve_caller(&*self.directory, caller_identity).await?;
        let project = self.load_project(project_id).await?;
        ensure_project_member(&caller, &project)?;

        let page = self.tasks.list_by_project(project_id, request).await?;
        debug!(
            project_id = %project_id,
            sort = %request.sort(),
            returned = page.number_of_elements(),
            "listed project tasks"
        );
        self.to_views(page).await
    }

    /// Lists the tasks assigned to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Caller`] when the identity does not
    /// resolve and [`TaskServiceError::Repository`] when the query fails.
    pub async fn get_assigned_tasks(
        &self,
        assignee_identity: &str,
        request: &PageRequest<TaskSortField>,
    ) -> TaskServiceResult<Page<TaskView>> {
        let assignee = resolve_caller(&*self.directory, assignee_identity).await?;
        let page = self.tasks.list_by_assignee(assignee.id(), request).await?;
        debug!(
            assignee_id = %assignee.id(),
            sort = %request.sort(),
            returned = page.number_of_elements(),
            "listed assigned tasks"
        );
        let email = assignee.email().clone();
        Ok(page.map(|task| TaskView::from_task(&task, Some(email.clone()))))
    }

    /// Returns one task visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the task is absent and
    /// [`TaskServiceError::UnauthorizedTask`] when the caller is neither the
    /// assignee, the project owner, nor an administrator.
    pub async fn get_task(
        &self,
        caller_identity: &str,
        task_id: TaskId,
    ) -> TaskServiceResult<TaskView> {
        let caller = resolve_caller(&*self.directory, caller_identity).await?;
        let task = self.load_accessible_task(&caller, task_id).await?;
        self.to_view(&task).await
    }

    /// Sets a task's status under optimistic concurrency.
    ///
    /// Any status may follow any other. The returned view carries the
    /// incremented version.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the task is absent,
    /// [`TaskServiceError::UnauthorizedTask`] when the caller may not modify
    /// it, and [`TaskServiceError::StaleVersion`] or
    /// [`TaskServiceError::Repository`] with a version conflict when another
    /// writer got there first.
    pub async fn update_task_status(
        &self,
        caller_identity: &str,
        request: UpdateTaskStatusRequest,
    ) -> TaskServiceResult<TaskView> {
        let UpdateTaskStatusRequest {
            task_id,
            status,
            expected_version,
        } = request;
        let caller = resolve_caller(&*self.directory, caller_identity).await?;
        let mut task = self.load_accessible_task(&caller, task_id).await?;
        if let Some(expected) = expected_version {
            ensure_version(&task, expected)?;
        }

        let observed = task.version();
        task.set_status(status, &*self.clock);
        // Resolve the view before writing so nothing can fail after commit.
        let view = self.to_view(&task).await?;
        self.write_versioned(&task, observed).await?;
        info!(
            task_id = %task_id,
            status = status.as_str(),
            version = task.version().value(),
            "updated task status"
        );
        self.record_analytics("task_status_changed", &task);
        Ok(view)
    }

    /// Edits task details under optimistic concurrency.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::update_task_status`], plus
    /// [`TaskServiceError::Domain`] for an invalid title or self-parenting,
    /// [`TaskServiceError::AssigneeNotFound`] and
    /// [`TaskServiceError::ParentNotFound`] for missing references, and
    /// [`TaskServiceError::ParentInOtherProject`] or
    /// [`TaskServiceError::CyclicParent`] for an invalid parent.
    pub async fn update_task(
        &self,
        caller_identity: &str,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<TaskView> {
        let UpdateTaskRequest {
            task_id,
            expected_version,
            title,
            description,
            priority,
            due_date,
            assignee_email,
            parent_task_id,
        } = request;
        let caller = resolve_caller(&*self.directory, caller_identity).await?;
        let mut task = self.load_accessible_task(&caller, task_id).await?;
        ensure_version(&task, expected_version)?;

        let validated_title = title.map(TaskTitle::new).transpose()?;
        let assignee_id = match assignee_email {
            FieldChange::Keep => FieldChange::Keep,
            FieldChange::Clear => FieldChange::Clear,
            FieldChange::Set(email) => FieldChange::Set(self.resolve_assignee(email).await?.id()),
        };
        if let Some(&parent_id) = parent_task_id.as_set() {
            if parent_id == task_id {
                return Err(TaskDomainError::SelfParent(task_id).into());
            }
            self.ensure_valid_parent(&task, parent_id).await?;
        }

        let changes = TaskChanges {
            title: validated_title,
            description,
            priority,
            due_date,
            assignee_id,
            parent_task_id,
        };
        task.apply_changes(changes, &*self.clock)?;
        let view = self.to_view(&task).await?;
        self.write_versioned(&task, expected_version).await?;
        info!(task_id = %task_id, version = task.version().value(), "updated task");
        Ok(view)
    }

    async fn load_project(&self, project_id: ProjectId) -> TaskServiceResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or(TaskServiceError::ProjectNotFound(project_id))
    }

    async fn load_parent(&self, parent_id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(parent_id)
            .await?
            .ok_or(TaskServiceError::ParentNotFound(parent_id))
    }

    async fn load_accessible_task(
        &self,
        caller: &User,
        task_id: TaskId,
    ) -> TaskServiceResult<Task> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(task_id))?;
        if caller.is_admin() || task.is_assigned_to(caller.id()) {
            return Ok(task);
        }
        let project = self.load_project(task.project_id()).await?;
        if project.is_owned_by(caller.id()) {
            return Ok(task);
        }
        warn!(task_id = %task_id, caller_id = %caller.id(), "denied task access");
        Err(TaskServiceError::UnauthorizedTask(task_id))
    }

    async fn resolve_assignee(&self, email: String) -> TaskServiceResult<User> {
        let address = EmailAddress::new(email).map_err(TaskServiceError::InvalidAssigneeEmail)?;
        self.directory
            .find_by_email(&address)
            .await?
            .ok_or(TaskServiceError::AssigneeNotFound(address))
    }

    /// Checks that `parent_id` exists in the task's project and is not one
    /// of its descendants.
    ///
    /// The ancestor walk visits at most as many tasks as the project holds,
    /// so corrupt cyclic data cannot loop forever.
    async fn ensure_valid_parent(&self, task: &Task, parent_id: TaskId) -> TaskServiceResult<()> {
        let parent = self.load_parent(parent_id).await?;
        ensure_same_project(&parent, task.project_id())?;

        let cyclic = TaskServiceError::CyclicParent {
            task_id: task.id(),
            parent_id,
        };
        let budget = self.tasks.count_by_project(task.project_id()).await?;
        let mut visited = 0_u64;
        let mut cursor = parent.parent_task_id();
        while let Some(ancestor_id) = cursor {
            if ancestor_id == task.id() || visited >= budget {
                warn!(task_id = %task.id(), parent_id = %parent_id, "rejected cyclic parent");
                return Err(cyclic);
            }
            visited += 1;
            cursor = self
                .tasks
                .find_by_id(ancestor_id)
                .await?
                .and_then(|ancestor| ancestor.parent_task_id());
        }
        Ok(())
    }

    async fn write_versioned(&self, task: &Task, expected: TaskVersion) -> TaskServiceResult<()> {
        self.tasks.update(task, expected).await.map_err(|err| {
            if matches!(err, TaskRepositoryError::VersionConflict { .. }) {
                warn!(task_id = %task.id(), expected = expected.value(), "lost update race");
            }
            TaskServiceError::from(err)
        })
    }

    async fn to_view(&self, task: &Task) -> TaskServiceResult<TaskView> {
        let assignee_email = match task.assignee_id() {
            Some(assignee_id) => Some(
                self.directory
                    .find_by_id(assignee_id)
                    .await?
                    .ok_or(UserDirectoryError::NotFound(assignee_id))?
                    .email()
                    .clone(),
            ),
            None => None,
        };
        Ok(TaskView::from_task(task, assignee_email))
    }

    async fn to_views(&self, page: Page<Task>) -> TaskServiceResult<Page<TaskView>> {
        let mut assignee_ids: Vec<UserId> =
            page.content().iter().filter_map(Task::assignee_id).collect();
        assignee_ids.sort_unstable();
        assignee_ids.dedup();
        let emails: HashMap<UserId, EmailAddress> = self
            .directory
            .find_by_ids(&assignee_ids)
            .await?
            .into_iter()
            .map(|user| (user.id(), user.email().clone()))
            .collect();

        page.try_map(|task| {
            let assignee_email = match task.assignee_id() {
                Some(assignee_id) => Some(
                    emails
                        .get(&assignee_id)
                        .cloned()
                        .ok_or(UserDirectoryError::NotFound(assignee_id))?,
                ),
                None => None,
            };
            Ok(TaskView::from_task(&task, assignee_email))
        })
    }

    fn record_analytics(&self, event: &'static str, task: &Task) {
        if self.features.flag(FeatureFlag::Analytics) {
            info!(
                target: "taskboard::analytics",
                event,
                task_id = %task.id(),
                project_id = %task.project_id(),
                status = task.status().as_str(),
                "analytics event"
            );
        }
    }
}

fn ensure_project_member(caller: &User, project: &Project) -> TaskServiceResult<()> {
    if caller.is_admin() || project.is_owned_by(caller.id()) {
        return Ok(());
    }
    warn!(
        project_id = %project.id(),
        caller_id = %caller.id(),
        "denied project access"
    );
    Err(TaskServiceError::UnauthorizedProject(project.id()))
}

fn ensure_same_project(parent: &Task, project_id: ProjectId) -> TaskServiceResult<()> {
    if parent.project_id() == project_id {
        return Ok(());
    }
    Err(TaskServiceError::ParentInOtherProject {
        parent_id: parent.id(),
        project_id,
    })
}

fn ensure_version(task: &Task, expected: TaskVersion) -> TaskServiceResult<()> {
    if task.version() == expected {
        return Ok(());
    }
    warn!(
        task_id = %task.id(),
        expected = expected.value(),
        actual = task.version().value(),
        "rejected stale task version"
    );
    Err(TaskServiceError::StaleVersion {
        task_id: task.id(),
        expected,
        actual: task.version(),
    })
}
