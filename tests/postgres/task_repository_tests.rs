//! `PostgreSQL` tests for versioned task updates and ordered listings.

use super::helpers::{PostgresStores, stores, test_runtime};
use chrono::{TimeZone, Utc};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::rstest;
use taskboard::identity::domain::UserId;
use taskboard::paging::{PageRequest, Sort};
use taskboard::project::domain::ProjectId;
use taskboard::task::{
    domain::{
        FieldChange, NewTaskData, Task, TaskChanges, TaskPriority, TaskSortField, TaskStatus,
        TaskTitle, TaskVersion,
    },
    ports::{TaskRepository, TaskRepositoryError},
};

fn new_task(
    project_id: ProjectId,
    assignee_id: UserId,
    title: &str,
    priority: TaskPriority,
    due_day: Option<u32>,
) -> Result<Task, eyre::Report> {
    let due_date = due_day
        .map(|day| {
            Utc.with_ymd_and_hms(2026, 6, day, 12, 0, 0)
                .single()
                .ok_or_else(|| eyre::eyre!("invalid due date"))
        })
        .transpose()?;
    Ok(Task::new(
        NewTaskData {
            title: TaskTitle::new(title)?,
            description: None,
            priority,
            due_date,
            project_id,
            assignee_id: Some(assignee_id),
            parent_task_id: None,
        },
        &DefaultClock,
    ))
}

#[rstest]
fn update_checks_stored_version(
    stores: Result<PostgresStores, eyre::Report>,
) -> Result<(), eyre::Report> {
    let db = stores?;
    test_runtime()?.block_on(async {
        let owner = db.user("alice").await?;
        let project = db.project(&owner, "Launch").await?;
        let mut task =
            new_task(project.id(), owner.id(), "Write brief", TaskPriority::Medium, None)?;
        db.tasks.store(&task).await.wrap_err("store task")?;

        let stale = task.clone();
        task.set_status(TaskStatus::Done, &DefaultClock);
        db.tasks
            .update(&task, TaskVersion::INITIAL)
            .await
            .wrap_err("first update applies")?;

        let mut competing = stale;
        competing.apply_changes(
            TaskChanges {
                title: Some(TaskTitle::new("Final brief")?),
                description: FieldChange::Set("late edit".to_owned()),
                ..TaskChanges::default()
            },
            &DefaultClock,
        )?;
        let err = db
            .tasks
            .update(&competing, TaskVersion::INITIAL)
            .await
            .expect_err("stale update must be rejected");
        eyre::ensure!(
            matches!(err, TaskRepositoryError::VersionConflict { .. }),
            "expected VersionConflict, got {err:?}"
        );

        let stored = db
            .tasks
            .find_by_id(task.id())
            .await?
            .ok_or_else(|| eyre::eyre!("task should exist"))?;
        eyre::ensure!(stored.status() == TaskStatus::Done, "status lost");
        eyre::ensure!(stored.title().as_str() == "Write brief", "stale title leaked");
        eyre::ensure!(stored.version() == TaskVersion::new(1), "version mismatch");
        Ok::<(), eyre::Report>(())
    })
}

#[rstest]
fn concurrent_writers_from_same_version_admit_exactly_one(
    stores: Result<PostgresStores, eyre::Report>,
) -> Result<(), eyre::Report> {
    let db = stores?;
    test_runtime()?.block_on(async {
        let owner = db.user("alice").await?;
        let project = db.project(&owner, "Launch").await?;
        let task = new_task(project.id(), owner.id(), "Contended", TaskPriority::High, None)?;
        db.tasks.store(&task).await.wrap_err("store task")?;

        let handles: Vec<_> = [TaskStatus::InProgress, TaskStatus::Done]
            .into_iter()
            .map(|status| {
                let writer = db.tasks.clone();
                let mut copy = task.clone();
                tokio::spawn(async move {
                    copy.set_status(status, &DefaultClock);
                    writer
                        .update(&copy, TaskVersion::INITIAL)
                        .await
                        .map(|()| status)
                })
            })
            .collect();

        let mut winners = Vec::new();
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.wrap_err("writer task panicked")? {
                Ok(status) => winners.push(status),
                Err(TaskRepositoryError::VersionConflict { .. }) => conflicts += 1,
                Err(other) => eyre::bail!("unexpected error: {other}"),
            }
        }
        eyre::ensure!(
            winners.len() == 1 && conflicts == 1,
            "expected one winner and one conflict, got {winners:?} and {conflicts}"
        );

        let stored = db
            .tasks
            .find_by_id(task.id())
            .await?
            .ok_or_else(|| eyre::eyre!("task should exist"))?;
        eyre::ensure!(stored.version() == TaskVersion::new(1), "version mismatch");
        eyre::ensure!(
            winners.first() == Some(&stored.status()),
            "stored status is not the winner's"
        );
        Ok::<(), eyre::Report>(())
    })
}

#[rstest]
fn update_of_missing_task_is_not_found(
    stores: Result<PostgresStores, eyre::Report>,
) -> Result<(), eyre::Report> {
    let db = stores?;
    test_runtime()?.block_on(async {
        let owner = db.user("alice").await?;
        let project = db.project(&owner, "Launch").await?;
        let task = new_task(project.id(), owner.id(), "Never stored", TaskPriority::Low, None)?;

        let err = db
            .tasks
            .update(&task, TaskVersion::INITIAL)
            .await
            .expect_err("missing task cannot be updated");

        eyre::ensure!(
            matches!(err, TaskRepositoryError::NotFound(id) if id == task.id()),
            "expected NotFound, got {err:?}"
        );
        Ok::<(), eyre::Report>(())
    })
}

#[rstest]
fn listings_follow_rank_and_due_date_order(
    stores: Result<PostgresStores, eyre::Report>,
) -> Result<(), eyre::Report> {
    let db = stores?;
    test_runtime()?.block_on(async {
        let owner = db.user("alice").await?;
        let project = db.project(&owner, "Launch").await?;
        for (title, priority, due_day) in [
            ("Draft", TaskPriority::Low, Some(20)),
            ("Review", TaskPriority::High, None),
            ("Publish", TaskPriority::Medium, Some(5)),
        ] {
            let task = new_task(project.id(), owner.id(), title, priority, due_day)?;
            db.tasks.store(&task).await?;
        }

        let by_priority = db
            .tasks
            .list_by_project(project.id(), &PageRequest::new(0, 10, Sort::parse("priority")?)?)
            .await?;
        let titles: Vec<&str> = by_priority
            .content()
            .iter()
            .map(|task| task.title().as_str())
            .collect();
        eyre::ensure!(
            titles == ["Review", "Publish", "Draft"],
            "priority order was {titles:?}"
        );

        let by_due_date = db
            .tasks
            .list_by_assignee(
                owner.id(),
                &PageRequest::new(0, 2, TaskSortField::default_assigned_sort())?,
            )
            .await?;
        let due_titles: Vec<&str> = by_due_date
            .content()
            .iter()
            .map(|task| task.title().as_str())
            .collect();
        eyre::ensure!(
            due_titles == ["Publish", "Draft"],
            "due date order was {due_titles:?}"
        );
        eyre::ensure!(by_due_date.total_elements() == 3, "total mismatch");
        eyre::ensure!(!by_due_date.is_last(), "undated task belongs on page two");

        eyre::ensure!(
            db.tasks.count_by_project(project.id()).await? == 3,
            "count mismatch"
        );
        Ok::<(), eyre::Report>(())
    })
}
