//! `PostgreSQL` tests for owner-scoped project listings.

use super::helpers::{PostgresStores, stores, test_runtime};
use rstest::rstest;
use taskboard::paging::{PageRequest, Sort};
use taskboard::project::{domain::ProjectSortField, ports::ProjectRepository};

#[rstest]
fn projects_round_trip(
    stores: Result<PostgresStores, eyre::Report>,
) -> Result<(), eyre::Report> {
    let db = stores?;
    test_runtime()?.block_on(async {
        let owner = db.user("alice").await?;
        let project = db.project(&owner, "Launch").await?;

        let found = db
            .projects
            .find_by_id(project.id())
            .await?
            .ok_or_else(|| eyre::eyre!("project should exist"))?;

        eyre::ensure!(found.id() == project.id(), "id mismatch");
        eyre::ensure!(found.name() == project.name(), "name mismatch");
        eyre::ensure!(found.owner_id() == owner.id(), "owner mismatch");
        Ok::<(), eyre::Report>(())
    })
}

#[rstest]
fn listing_is_scoped_and_sorted(
    stores: Result<PostgresStores, eyre::Report>,
) -> Result<(), eyre::Report> {
    let db = stores?;
    test_runtime()?.block_on(async {
        let alice = db.user("alice").await?;
        let bob = db.user("bob").await?;
        db.project(&alice, "Launch").await?;
        db.project(&alice, "Beta").await?;
        db.project(&alice, "Archive").await?;
        db.project(&bob, "Garden").await?;

        let first = db
            .projects
            .list_by_owner(alice.id(), &PageRequest::new(0, 2, Sort::parse("name,asc")?)?)
            .await?;
        let second = db
            .projects
            .list_by_owner(alice.id(), &PageRequest::new(1, 2, Sort::parse("name,asc")?)?)
            .await?;

        let names: Vec<&str> = first
            .content()
            .iter()
            .chain(second.content())
            .map(|project| project.name().as_str())
            .collect();
        eyre::ensure!(
            names == ["Archive", "Beta", "Launch"],
            "unexpected names {names:?}"
        );
        eyre::ensure!(first.total_elements() == 3, "total mismatch");
        eyre::ensure!(first.total_pages() == 2, "page count mismatch");

        let default_sorted = db
            .projects
            .list_by_owner(bob.id(), &PageRequest::new(0, 10, ProjectSortField::default_sort())?)
            .await?;
        eyre::ensure!(default_sorted.total_elements() == 1, "bob owns one project");
        Ok::<(), eyre::Report>(())
    })
}
