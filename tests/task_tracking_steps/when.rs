//! When steps for task tracking BDD scenarios.

use super::world::{TaskTrackingWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskboard::project::services::CreateProjectRequest;
use taskboard::task::{
    domain::{TaskId, TaskStatus},
    services::{CreateTaskRequest, UpdateTaskRequest, UpdateTaskStatusRequest},
};

#[when(r#""{email}" creates the project "{name}" described as "{description}""#)]
fn create_project(
    world: &mut TaskTrackingWorld,
    email: String,
    name: String,
    description: String,
) -> Result<(), eyre::Report> {
    let request = CreateProjectRequest::new(name).with_description(description);
    let project = run_async(world.projects.create_project(request, &email))
        .wrap_err("create project in scenario")?;
    world.project_id = Some(project.id);
    world.owner_email = Some(email);
    world.created_project = Some(project);
    Ok(())
}

#[when(r#""{email}" creates the task "{title}""#)]
fn create_task(
    world: &mut TaskTrackingWorld,
    email: String,
    title: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project_id()?;
    let result = run_async(world.tasks.create_task(
        project_id,
        CreateTaskRequest::new(title),
        &email,
    ));
    if let Ok(ref created) = result {
        world.created_task = Some(created.clone());
    }
    world.record(result);
    Ok(())
}

#[when(r#""{email}" creates the task "{title}" under a nonexistent parent"#)]
fn create_task_under_missing_parent(
    world: &mut TaskTrackingWorld,
    email: String,
    title: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project_id()?;
    let request = CreateTaskRequest::new(title).with_parent_task_id(TaskId::new());
    let result = run_async(world.tasks.create_task(project_id, request, &email));
    world.record(result);
    Ok(())
}

#[when(r#"the task status is set to "{status}""#)]
fn set_status(world: &mut TaskTrackingWorld, status: String) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let task_id = world.created_task()?.id;
    let owner = world.owner_email()?.to_owned();
    let result = run_async(
        world
            .tasks
            .update_task_status(&owner, UpdateTaskStatusRequest::new(task_id, target)),
    );
    world.record(result);
    Ok(())
}

#[when(r#"the task title is changed to "{title}" at the original version"#)]
fn edit_title_at_original_version(
    world: &mut TaskTrackingWorld,
    title: String,
) -> Result<(), eyre::Report> {
    let (task_id, version) = {
        let created = world.created_task()?;
        (created.id, created.version)
    };
    let owner = world.owner_email()?.to_owned();
    let result = run_async(world.tasks.update_task(
        &owner,
        UpdateTaskRequest::new(task_id, version).with_title(title),
    ));
    world.record(result);
    Ok(())
}
