//! In-memory integration tests for project ownership and listing.

use super::helpers::{Taskboard, seeded_board};
use eyre::WrapErr;
use rstest::rstest;
use taskboard::error::{ClassifiedError, ErrorKind};
use taskboard::paging::{PageRequest, Sort};
use taskboard::project::domain::ProjectSortField;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_sees_created_project(#[future] seeded_board: Taskboard) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let created = board.project("alice@x.com", "Launch").await?;

    let fetched = board
        .projects
        .get_project("alice@x.com", created.id)
        .await
        .wrap_err("owner fetches own project")?;

    eyre::ensure!(fetched == created, "fetched project differs from created");
    eyre::ensure!(
        fetched.owner_email.as_str() == "alice@x.com",
        "owner email mismatch"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn other_users_cannot_read_project(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let created = board.project("alice@x.com", "Launch").await?;

    let err = board
        .projects
        .get_project("bob@x.com", created.id)
        .await
        .expect_err("non-owner should be refused");
    eyre::ensure!(
        err.kind() == ErrorKind::Unauthorized,
        "expected Unauthorized, got {err:?}"
    );

    let admin_view = board
        .projects
        .get_project("root@x.com", created.id)
        .await
        .wrap_err("administrator reads any project")?;
    eyre::ensure!(
        admin_view.owner_email.as_str() == "alice@x.com",
        "administrator view must name the owner"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_is_scoped_to_owner(#[future] seeded_board: Taskboard) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    board.project("alice@x.com", "Launch").await?;
    board.project("alice@x.com", "Beta").await?;
    board.project("bob@x.com", "Bob's garden").await?;

    let request = PageRequest::new(0, 10, Sort::parse("name,asc")?)?;
    let page = board.projects.list_projects("alice@x.com", &request).await?;

    let names: Vec<&str> = page.content().iter().map(|p| p.name.as_str()).collect();
    eyre::ensure!(names == ["Beta", "Launch"], "unexpected names {names:?}");
    eyre::ensure!(page.total_elements() == 2, "expected two projects");
    eyre::ensure!(page.is_first() && page.is_last(), "single page expected");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_caller_is_unauthenticated(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let request = PageRequest::new(0, 10, ProjectSortField::default_sort())?;

    let err = board
        .projects
        .list_projects("", &request)
        .await
        .expect_err("blank identity should be refused");

    eyre::ensure!(
        err.kind() == ErrorKind::Unauthenticated,
        "expected Unauthenticated, got {err:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_email_caller_is_not_found(
    #[future] seeded_board: Taskboard,
) -> Result<(), eyre::Report> {
    let board = seeded_board.await;
    let request = PageRequest::new(0, 10, Sort::parse("name,asc")?)?;

    let err = board
        .projects
        .list_projects("bob", &request)
        .await
        .expect_err("an identity that is not an email cannot resolve");

    eyre::ensure!(
        err.kind() == ErrorKind::NotFound,
        "expected NotFound, got {err:?}"
    );
    Ok(())
}
