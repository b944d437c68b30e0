//! Then steps for task tracking BDD scenarios.

use super::world::{TaskTrackingWorld, run_async};
use rstest_bdd_macros::then;
use taskboard::error::{ClassifiedError, ErrorKind};
use taskboard::paging::PageRequest;
use taskboard::project::domain::ProjectSortField;
use taskboard::task::{
    domain::{TaskStatus, TaskVersion},
    services::TaskView,
};

fn last_task(world: &TaskTrackingWorld) -> Result<&TaskView, eyre::Report> {
    if let Some(err) = world.last_error.as_ref() {
        return Err(eyre::eyre!("expected success, got {err:?}"));
    }
    world
        .last_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task result"))
}

fn stored_task(world: &TaskTrackingWorld) -> Result<TaskView, eyre::Report> {
    let task_id = world.created_task()?.id;
    let owner = world.owner_email()?;
    Ok(run_async(world.tasks.get_task(owner, task_id))?)
}

fn expect_failure(world: &TaskTrackingWorld, expected: ErrorKind) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected a failure, but the request succeeded"))?;
    eyre::ensure!(
        err.kind() == expected,
        "expected {}, got {} ({err:?})",
        expected.as_str(),
        err.kind().as_str()
    );
    Ok(())
}

#[then(r#"the project is owned by "{email}""#)]
fn project_owned_by(world: &TaskTrackingWorld, email: String) -> Result<(), eyre::Report> {
    let project = world.created_project()?;
    eyre::ensure!(
        project.owner_email.as_str() == email,
        "expected owner {email}, found {}",
        project.owner_email
    );
    Ok(())
}

#[then(r#"the project description is "{description}""#)]
fn project_description_is(
    world: &TaskTrackingWorld,
    description: String,
) -> Result<(), eyre::Report> {
    let project = world.created_project()?;
    eyre::ensure!(
        project.description.as_deref() == Some(description.as_str()),
        "expected description {description}, found {:?}",
        project.description
    );
    Ok(())
}

#[then(r#"the project appears in the listing of "{email}""#)]
fn project_listed_for(world: &TaskTrackingWorld, email: String) -> Result<(), eyre::Report> {
    let project_id = world.created_project()?.id;
    let request = PageRequest::new(0, 10, ProjectSortField::default_sort())?;
    let page = run_async(world.projects.list_projects(&email, &request))?;
    eyre::ensure!(
        page.content().iter().any(|view| view.id == project_id),
        "project missing from listing of {email}"
    );
    Ok(())
}

#[then("the task belongs to the project")]
fn task_in_project(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    let project_id = world.project_id()?;
    let task = last_task(world)?;
    eyre::ensure!(
        task.project_id == project_id,
        "task belongs to {}, expected {project_id}",
        task.project_id
    );
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskTrackingWorld, status: String) -> Result<(), eyre::Report> {
    let task = last_task(world)?;
    eyre::ensure!(
        task.status.as_str() == status,
        "expected status {status}, found {}",
        task.status
    );
    Ok(())
}

#[then(r#"the task is assigned to "{email}""#)]
fn task_assigned_to(world: &TaskTrackingWorld, email: String) -> Result<(), eyre::Report> {
    let task = last_task(world)?;
    let assignee = task.assignee_email.as_ref().map(|e| e.as_str());
    eyre::ensure!(
        assignee == Some(email.as_str()),
        "expected assignee {email}, found {assignee:?}"
    );
    Ok(())
}

#[then("the task version is {version:u64}")]
fn task_version_is(world: &TaskTrackingWorld, version: u64) -> Result<(), eyre::Report> {
    let task = last_task(world)?;
    eyre::ensure!(
        task.version == TaskVersion::new(version),
        "expected version {version}, found {}",
        task.version
    );
    Ok(())
}

#[then("the request fails with an optimistic lock conflict")]
fn fails_with_conflict(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    expect_failure(world, ErrorKind::OptimisticLockConflict)
}

#[then("the request fails with a not found error")]
fn fails_with_not_found(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    expect_failure(world, ErrorKind::NotFound)
}

#[then("the request fails with an unauthorized error")]
fn fails_with_unauthorized(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    expect_failure(world, ErrorKind::Unauthorized)
}

#[then(r#"the stored task title is "{title}""#)]
fn stored_title_is(world: &TaskTrackingWorld, title: String) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.title == title,
        "expected stored title {title}, found {}",
        task.title
    );
    Ok(())
}

#[then(r#"the stored task status is "{status}""#)]
fn stored_status_is(world: &TaskTrackingWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let task = stored_task(world)?;
    eyre::ensure!(
        task.status == expected,
        "expected stored status {status}, found {}",
        task.status
    );
    Ok(())
}
