//! In-memory integration tests for task tracking workflows.

use super::helpers::{Taskboard, seeded_board};
use eyre::WrapErr;
use rstest::rstest;
use taskboard::error::{ClassifiedError, ErrorKind, ErrorReport};
use taskboard::task::{
    domain::{TaskId, TaskStatus, TaskVersion},
    services::{CreateTaskRequest, TaskServiceError, UpdateTaskRequest, UpdateTaskStatusRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_update_then_stale_edit_conflicts(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let project = board.project("alice@x.com", "Launch").await?;
    let created = board
        .tasks
        .create_task(project.id, CreateTaskRequest::new("Write brief"), "alice@x.com")
        .await
        .wrap_err("create task")?;
    eyre::ensure!(created.status == TaskStatus::Todo, "new task must be TODO");
    eyre::ensure!(
        created.assignee_email.as_ref().map(|e| e.as_str()) == Some("alice@x.com"),
        "creator must be the default assignee"
    );

    let done = board
        .tasks
        .update_task_status(
            "alice@x.com",
            UpdateTaskStatusRequest::new(created.id, TaskStatus::Done),
        )
        .await
        .wrap_err("mark task done")?;
    eyre::ensure!(done.status == TaskStatus::Done, "status must be DONE");
    eyre::ensure!(done.version == created.version.next(), "version must advance");

    let err = board
        .tasks
        .update_task(
            "alice@x.com",
            UpdateTaskRequest::new(created.id, created.version).with_title("Write the brief"),
        )
        .await
        .expect_err("edit against the old version should conflict");
    eyre::ensure!(
        err.kind() == ErrorKind::OptimisticLockConflict,
        "expected a conflict, got {err:?}"
    );

    let current = board.tasks.get_task("alice@x.com", created.id).await?;
    eyre::ensure!(current.title == "Write brief", "conflicting edit leaked");
    eyre::ensure!(current.version == done.version, "conflict bumped version");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_parent_is_not_found(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let project = board.project("alice@x.com", "Launch").await?;

    let err = board
        .tasks
        .create_task(
            project.id,
            CreateTaskRequest::new("Orphan").with_parent_task_id(TaskId::new()),
            "alice@x.com",
        )
        .await
        .expect_err("unknown parent should be rejected");

    eyre::ensure!(
        matches!(err, TaskServiceError::ParentNotFound(_)),
        "expected ParentNotFound, got {err:?}"
    );
    eyre::ensure!(err.kind() == ErrorKind::NotFound, "expected NotFound kind");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reparenting_cannot_form_a_cycle(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let project = board.project("alice@x.com", "Launch").await?;
    let root = board
        .tasks
        .create_task(project.id, CreateTaskRequest::new("Epic"), "alice@x.com")
        .await?;
    let child = board
        .tasks
        .create_task(
            project.id,
            CreateTaskRequest::new("Story").with_parent_task_id(root.id),
            "alice@x.com",
        )
        .await?;
    let grandchild = board
        .tasks
        .create_task(
            project.id,
            CreateTaskRequest::new("Subtask").with_parent_task_id(child.id),
            "alice@x.com",
        )
        .await?;

    let err = board
        .tasks
        .update_task(
            "alice@x.com",
            UpdateTaskRequest::new(root.id, root.version).with_parent_task_id(Some(grandchild.id)),
        )
        .await
        .expect_err("cycle should be rejected");

    eyre::ensure!(
        matches!(err, TaskServiceError::CyclicParent { .. }),
        "expected CyclicParent, got {err:?}"
    );
    let report = ErrorReport::from_error(&err);
    eyre::ensure!(
        report.kind == ErrorKind::ValidationFailed && report.errors.contains_key("parentTaskId"),
        "cycle should report a parentTaskId validation error"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_are_hidden_from_outsiders(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let project = board.project("alice@x.com", "Launch").await?;
    let task = board
        .tasks
        .create_task(project.id, CreateTaskRequest::new("Secret"), "alice@x.com")
        .await?;

    let err = board
        .tasks
        .get_task("bob@x.com", task.id)
        .await
        .expect_err("outsider should be refused");
    eyre::ensure!(
        err.kind() == ErrorKind::Unauthorized,
        "expected Unauthorized, got {err:?}"
    );

    let admin = board.tasks.get_task("root@x.com", task.id).await?;
    eyre::ensure!(admin.id == task.id, "administrator reads any task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_can_progress_delegated_task(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let project = board.project("alice@x.com", "Launch").await?;
    let task = board
        .tasks
        .create_task(
            project.id,
            CreateTaskRequest::new("Review copy").with_assignee_email("bob@x.com"),
            "alice@x.com",
        )
        .await?;

    let updated = board
        .tasks
        .update_task_status(
            "bob@x.com",
            UpdateTaskStatusRequest::new(task.id, TaskStatus::InProgress)
                .with_expected_version(TaskVersion::INITIAL),
        )
        .await
        .wrap_err("assignee updates status")?;

    eyre::ensure!(
        updated.status == TaskStatus::InProgress,
        "status must be IN_PROGRESS"
    );
    eyre::ensure!(
        updated.assignee_email.as_ref().map(|e| e.as_str()) == Some("bob@x.com"),
        "assignee must be preserved"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_assignee_is_not_found(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let project = board.project("alice@x.com", "Launch").await?;

    let err = board
        .tasks
        .create_task(
            project.id,
            CreateTaskRequest::new("Review copy").with_assignee_email("ghost@x.com"),
            "alice@x.com",
        )
        .await
        .expect_err("unknown assignee should be rejected");

    eyre::ensure!(
        matches!(err, TaskServiceError::AssigneeNotFound(_)),
        "expected AssigneeNotFound, got {err:?}"
    );
    Ok(())
}
