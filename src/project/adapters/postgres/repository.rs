//! `PostgreSQL` project repository implementation.

use super::{
    models::{NewProjectRow, ProjectRow},
    schema::projects,
};
use crate::identity::domain::UserId;
use crate::paging::{Page, PageRequest, Sort, SortDirection};
use crate::project::{
    domain::{PersistedProjectData, Project, ProjectId, ProjectName, ProjectSortField},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::storage::{PgPool, from_sql_count, get_conn_with, run_blocking_with, to_sql_count};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, ProjectRepositoryError::persistence)?;
                f(&mut connection)
            },
            ProjectRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_row(project);
        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn list_by_owner(
        &self,
        owner_id: UserId,
        request: &PageRequest<ProjectSortField>,
    ) -> ProjectRepositoryResult<Page<Project>> {
        let page_request = *request;
        let owner = owner_id.into_inner();
        self.run_blocking(move |connection| {
            let total = projects::table
                .filter(projects::owner_id.eq(owner))
                .count()
                .get_result::<i64>(connection)
                .map_err(ProjectRepositoryError::persistence)?;

            let query = projects::table
                .filter(projects::owner_id.eq(owner))
                .into_boxed();
            let rows = ordered(query, page_request.sort())
                .limit(to_sql_count(u64::from(page_request.size())))
                .offset(to_sql_count(page_request.offset()))
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;

            let content = rows
                .into_iter()
                .map(row_to_project)
                .collect::<ProjectRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(
                content,
                page_request.page(),
                page_request.size(),
                from_sql_count(total),
            ))
        })
        .await
    }
}

type BoxedProjects = projects::BoxedQuery<'static, Pg>;

/// Applies the requested order with `id` as the tiebreaker.
fn ordered(query: BoxedProjects, sort: Sort<ProjectSortField>) -> BoxedProjects {
    match (sort.field(), sort.direction()) {
        (ProjectSortField::Id, SortDirection::Asc) => query.order_by(projects::id.asc()),
        (ProjectSortField::Id, SortDirection::Desc) => query.order_by(projects::id.desc()),
        (ProjectSortField::Name, SortDirection::Asc) => {
            query.order_by((projects::name.asc(), projects::id.asc()))
        }
        (ProjectSortField::Name, SortDirection::Desc) => {
            query.order_by((projects::name.desc(), projects::id.desc()))
        }
        (ProjectSortField::CreatedAt, SortDirection::Asc) => {
            query.order_by((projects::created_at.asc(), projects::id.asc()))
        }
        (ProjectSortField::CreatedAt, SortDirection::Desc) => {
            query.order_by((projects::created_at.desc(), projects::id.desc()))
        }
        (ProjectSortField::UpdatedAt, SortDirection::Asc) => {
            query.order_by((projects::updated_at.asc(), projects::id.asc()))
        }
        (ProjectSortField::UpdatedAt, SortDirection::Desc) => {
            query.order_by((projects::updated_at.desc(), projects::id.desc()))
        }
    }
}

fn to_new_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().as_str().to_owned(),
        description: project.description().map(str::to_owned),
        owner_id: project.owner_id().into_inner(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        name,
        description,
        owner_id,
        created_at,
        updated_at,
    } = row;

    let data = PersistedProjectData {
        id: ProjectId::from_uuid(id),
        name: ProjectName::new(name).map_err(ProjectRepositoryError::invalid_persisted_data)?,
        description,
        owner_id: UserId::from_uuid(owner_id),
        created_at,
        updated_at,
    };
    Ok(Project::from_persisted(data))
}
