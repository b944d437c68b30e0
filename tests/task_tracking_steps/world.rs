//! Shared world state for task tracking BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::feature::FeatureToggleService;
use taskboard::identity::{
    adapters::memory::InMemoryUserDirectory, services::IdentityService,
};
use taskboard::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::ProjectId,
    services::{ProjectService, ProjectView},
};
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    services::{TaskService, TaskServiceError, TaskView},
};

/// Task service type used by the BDD world.
pub type TestTaskService = TaskService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    InMemoryUserDirectory,
    DefaultClock,
>;

/// Scenario world for task tracking behaviour tests.
pub struct TaskTrackingWorld {
    pub identity: IdentityService<InMemoryUserDirectory, DefaultClock>,
    pub projects: ProjectService<InMemoryProjectRepository, InMemoryUserDirectory, DefaultClock>,
    pub tasks: TestTaskService,
    pub owner_email: Option<String>,
    pub project_id: Option<ProjectId>,
    pub created_project: Option<ProjectView>,
    pub created_task: Option<TaskView>,
    pub last_task: Option<TaskView>,
    pub last_error: Option<TaskServiceError>,
}

impl TaskTrackingWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryUserDirectory::new());
        let project_store = Arc::new(InMemoryProjectRepository::new());
        let clock = Arc::new(DefaultClock);

        Self {
            identity: IdentityService::new(Arc::clone(&directory), Arc::clone(&clock)),
            projects: ProjectService::new(
                Arc::clone(&project_store),
                Arc::clone(&directory),
                Arc::clone(&clock),
            ),
            tasks: TaskService::new(
                Arc::new(InMemoryTaskRepository::new()),
                project_store,
                directory,
                FeatureToggleService::default(),
                clock,
            ),
            owner_email: None,
            project_id: None,
            created_project: None,
            created_task: None,
            last_task: None,
            last_error: None,
        }
    }

    /// Records the outcome of a task operation.
    pub fn record(&mut self, result: Result<TaskView, TaskServiceError>) {
        match result {
            Ok(view) => {
                self.last_task = Some(view);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err),
        }
    }

    /// Returns the project created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no project step has run.
    pub fn project_id(&self) -> Result<ProjectId, eyre::Report> {
        self.project_id
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the project view returned at creation.
    ///
    /// # Errors
    ///
    /// Returns an error when no project has been created through a when step.
    pub fn created_project(&self) -> Result<&ProjectView, eyre::Report> {
        self.created_project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing created project in scenario world"))
    }

    /// Returns the task created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created.
    pub fn created_task(&self) -> Result<&TaskView, eyre::Report> {
        self.created_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
    }

    /// Returns the project owner's email.
    ///
    /// # Errors
    ///
    /// Returns an error when no project step has run.
    pub fn owner_email(&self) -> Result<&str, eyre::Report> {
        self.owner_email
            .as_deref()
            .ok_or_else(|| eyre::eyre!("missing project owner in scenario world"))
    }
}

impl Default for TaskTrackingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskTrackingWorld {
    TaskTrackingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
