//! In-memory integration tests for sorted, paged task listings.

use super::helpers::{Taskboard, seeded_board};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use taskboard::paging::{PageRequest, Sort};
use taskboard::project::domain::ProjectId;
use taskboard::task::{
    domain::{TaskPriority, TaskSortField},
    services::CreateTaskRequest,
};

async fn seed_tasks(board: &Taskboard) -> Result<ProjectId, eyre::Report> {
    let project = board.project("alice@x.com", "Launch").await?;
    let due = |day| {
        Utc.with_ymd_and_hms(2026, 6, day, 9, 0, 0)
            .single()
            .ok_or_else(|| eyre::eyre!("invalid due date"))
    };
    let requests = [
        CreateTaskRequest::new("Draft")
            .with_priority(TaskPriority::Low)
            .with_due_date(due(20)?),
        CreateTaskRequest::new("Review").with_priority(TaskPriority::High),
        CreateTaskRequest::new("Publish")
            .with_priority(TaskPriority::Medium)
            .with_due_date(due(5)?),
    ];
    for request in requests {
        board
            .tasks
            .create_task(project.id, request, "alice@x.com")
            .await?;
    }
    Ok(project.id)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn priority_sort_ranks_high_first(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let project_id = seed_tasks(&board).await?;

    let request = PageRequest::new(0, 10, Sort::parse("priority")?)?;
    let page = board
        .tasks
        .get_tasks_by_project("alice@x.com", project_id, &request)
        .await?;

    let titles: Vec<&str> = page.content().iter().map(|t| t.title.as_str()).collect();
    eyre::ensure!(
        titles == ["Review", "Publish", "Draft"],
        "unexpected order {titles:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigned_tasks_sort_undated_last(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    seed_tasks(&board).await?;

    let request = PageRequest::new(0, 10, TaskSortField::default_assigned_sort())?;
    let page = board
        .tasks
        .get_assigned_tasks("alice@x.com", &request)
        .await?;

    let titles: Vec<&str> = page.content().iter().map(|t| t.title.as_str()).collect();
    eyre::ensure!(
        titles == ["Publish", "Draft", "Review"],
        "unexpected order {titles:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn page_envelope_reports_position(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let project_id = seed_tasks(&board).await?;

    let request = PageRequest::new(1, 2, Sort::parse("title,asc")?)?;
    let page = board
        .tasks
        .get_tasks_by_project("alice@x.com", project_id, &request)
        .await?;
    let json = serde_json::to_value(&page)?;

    eyre::ensure!(json["totalElements"] == 3, "totalElements mismatch: {json}");
    eyre::ensure!(json["totalPages"] == 2, "totalPages mismatch: {json}");
    eyre::ensure!(json["numberOfElements"] == 1, "numberOfElements mismatch");
    eyre::ensure!(json["first"] == false && json["last"] == true, "flags: {json}");
    eyre::ensure!(
        json["content"][0]["title"] == "Review",
        "second page should hold the last title: {json}"
    );
    eyre::ensure!(
        json["content"][0]["status"] == "TODO",
        "status should use the wire name: {json}"
    );
    Ok(())
}

#[rstest]
fn unknown_sort_field_is_rejected() {
    let parsed = Sort::<TaskSortField>::parse("assignee");
    assert!(parsed.is_err());
}
