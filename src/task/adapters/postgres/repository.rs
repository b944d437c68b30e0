//! `PostgreSQL` task repository with transactional version compare-and-swap.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::identity::domain::UserId;
use crate::paging::{Page, PageRequest, Sort, SortDirection};
use crate::project::domain::ProjectId;
use crate::storage::{PgPool, from_sql_count, get_conn_with, run_blocking_with, to_sql_count};
use crate::task::{
    domain::{
        PersistedTaskData, Task, TaskId, TaskPriority, TaskSortField, TaskStatus, TaskTitle,
        TaskVersion,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::dsl::{exists, sql};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Integer;

const STATUS_RANK_SQL: &str =
    "CASE tasks.status WHEN 'TODO' THEN 0 WHEN 'IN_PROGRESS' THEN 1 ELSE 2 END";
const PRIORITY_RANK_SQL: &str =
    "CASE tasks.priority WHEN 'LOW' THEN 0 WHEN 'MEDIUM' THEN 1 ELSE 2 END";

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TaskRepositoryError::persistence)?;
                f(&mut connection)
            },
            TaskRepositoryError::persistence,
        )
        .await
    }
}

/// Result of a guarded update inside its transaction.
enum UpdateOutcome {
    Applied,
    Stale,
    Missing,
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task, expected: TaskVersion) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;
        let expected_version = version_to_sql(expected)?;
        let outcome = self
            .run_blocking(move |connection| {
                connection
                    .transaction::<_, DieselError, _>(|tx| {
                        let affected = diesel::update(
                            tasks::table
                                .filter(tasks::id.eq(task_id.into_inner()))
                                .filter(tasks::version.eq(expected_version)),
                        )
                        .set(&changeset)
                        .execute(tx)?;
                        if affected == 1 {
                            return Ok(UpdateOutcome::Applied);
                        }
                        let present = diesel::select(exists(
                            tasks::table.filter(tasks::id.eq(task_id.into_inner())),
                        ))
                        .get_result::<bool>(tx)?;
                        Ok(if present {
                            UpdateOutcome::Stale
                        } else {
                            UpdateOutcome::Missing
                        })
                    })
                    .map_err(TaskRepositoryError::persistence)
            })
            .await?;

        match outcome {
            UpdateOutcome::Applied => Ok(()),
            UpdateOutcome::Stale => Err(TaskRepositoryError::VersionConflict { task_id, expected }),
            UpdateOutcome::Missing => Err(TaskRepositoryError::NotFound(task_id)),
        }
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
        request: &PageRequest<TaskSortField>,
    ) -> TaskRepositoryResult<Page<Task>> {
        let page_request = *request;
        let project = project_id.into_inner();
        self.run_blocking(move |connection| {
            let total = tasks::table
                .filter(tasks::project_id.eq(project))
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let query = tasks::table
                .filter(tasks::project_id.eq(project))
                .into_boxed();
            load_page(connection, query, &page_request, total)
        })
        .await
    }

    async fn list_by_assignee(
        &self,
        assignee_id: UserId,
        request: &PageRequest<TaskSortField>,
    ) -> TaskRepositoryResult<Page<Task>> {
        let page_request = *request;
        let assignee = assignee_id.into_inner();
        self.run_blocking(move |connection| {
            let total = tasks::table
                .filter(tasks::assignee_id.eq(assignee))
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let query = tasks::table
                .filter(tasks::assignee_id.eq(assignee))
                .into_boxed();
            load_page(connection, query, &page_request, total)
        })
        .await
    }

    async fn count_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64> {
        let project = project_id.into_inner();
        self.run_blocking(move |connection| {
            let total = tasks::table
                .filter(tasks::project_id.eq(project))
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(from_sql_count(total))
        })
        .await
    }
}

type BoxedTasks = tasks::BoxedQuery<'static, Pg>;

fn load_page(
    connection: &mut PgConnection,
    query: BoxedTasks,
    request: &PageRequest<TaskSortField>,
    total: i64,
) -> TaskRepositoryResult<Page<Task>> {
    let rows = ordered(query, request.sort())
        .limit(to_sql_count(u64::from(request.size())))
        .offset(to_sql_count(request.offset()))
        .load::<TaskRow>(connection)
        .map_err(TaskRepositoryError::persistence)?;
    let content = rows
        .into_iter()
        .map(row_to_task)
        .collect::<TaskRepositoryResult<Vec<_>>>()?;
    Ok(Page::new(
        content,
        request.page(),
        request.size(),
        from_sql_count(total),
    ))
}

macro_rules! order_with_id {
    ($query:expr, $primary:expr, $direction:expr) => {
        match $direction {
            SortDirection::Asc => $query.order_by(($primary.asc(), tasks::id.asc())),
            SortDirection::Desc => $query.order_by(($primary.desc(), tasks::id.desc())),
        }
    };
}

/// Applies the requested order with `id` as the tiebreaker.
fn ordered(query: BoxedTasks, sort: Sort<TaskSortField>) -> BoxedTasks {
    let direction = sort.direction();
    match sort.field() {
        TaskSortField::Id => match direction {
            SortDirection::Asc => query.order_by(tasks::id.asc()),
            SortDirection::Desc => query.order_by(tasks::id.desc()),
        },
        TaskSortField::Title => order_with_id!(query, tasks::title, direction),
        TaskSortField::Status => order_with_id!(query, sql::<Integer>(STATUS_RANK_SQL), direction),
        TaskSortField::Priority => {
            order_with_id!(query, sql::<Integer>(PRIORITY_RANK_SQL), direction)
        }
        TaskSortField::DueDate => match direction {
            SortDirection::Asc => {
                query.order_by((tasks::due_date.asc().nulls_last(), tasks::id.asc()))
            }
            SortDirection::Desc => {
                query.order_by((tasks::due_date.desc().nulls_last(), tasks::id.desc()))
            }
        },
        TaskSortField::CreatedAt => order_with_id!(query, tasks::created_at, direction),
        TaskSortField::UpdatedAt => order_with_id!(query, tasks::updated_at, direction),
    }
}

fn version_to_sql(version: TaskVersion) -> TaskRepositoryResult<i64> {
    i64::try_from(version.value()).map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        project_id: task.project_id().into_inner(),
        assignee_id: task.assignee_id().map(UserId::into_inner),
        parent_task_id: task.parent_task_id().map(TaskId::into_inner),
        version: version_to_sql(task.version())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    Ok(TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        assignee_id: task.assignee_id().map(UserId::into_inner),
        parent_task_id: task.parent_task_id().map(TaskId::into_inner),
        version: version_to_sql(task.version())?,
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status,
        priority,
        due_date,
        project_id,
        assignee_id,
        parent_task_id,
        version,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::invalid_persisted_data)?,
        description,
        status: TaskStatus::try_from(status.as_str())
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        priority: TaskPriority::try_from(priority.as_str())
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        due_date,
        project_id: ProjectId::from_uuid(project_id),
        assignee_id: assignee_id.map(UserId::from_uuid),
        parent_task_id: parent_task_id.map(TaskId::from_uuid),
        version: TaskVersion::new(
            u64::try_from(version).map_err(TaskRepositoryError::invalid_persisted_data)?,
        ),
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
