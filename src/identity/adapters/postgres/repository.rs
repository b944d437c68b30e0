//! `PostgreSQL` user directory implementation.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::identity::{
    domain::{DisplayName, EmailAddress, PersistedUserData, User, UserId, UserRole},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use crate::storage::{PgPool, get_conn_with, run_blocking_with};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, UserDirectoryError::persistence)?;
                f(&mut connection)
            },
            UserDirectoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn store(&self, user: &User) -> UserDirectoryResult<()> {
        let email = user.email().clone();
        let new_row = to_new_row(user);
        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserDirectoryError::DuplicateEmail(email.clone())
                    }
                    _ => UserDirectoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserDirectoryResult<()> {
        let user_id = user.id();
        let display_name = user.display_name().as_str().to_owned();
        let updated_at = user.updated_at();
        self.run_blocking(move |connection| {
            let affected = diesel::update(users::table.filter(users::id.eq(user_id.into_inner())))
                .set((
                    users::display_name.eq(display_name),
                    users::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(UserDirectoryError::persistence)?;
            if affected == 0 {
                return Err(UserDirectoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserDirectoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> UserDirectoryResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let lookup: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            users::table
                .filter(users::id.eq_any(lookup))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserDirectoryError::persistence)?
                .into_iter()
                .map(row_to_user)
                .collect()
        })
        .await
    }
}

fn to_new_row(user: &User) -> NewUserRow {
    NewUserRow {
        id: user.id().into_inner(),
        email: user.email().as_str().to_owned(),
        display_name: user.display_name().as_str().to_owned(),
        role: user.role().as_str().to_owned(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

fn row_to_user(row: UserRow) -> UserDirectoryResult<User> {
    let UserRow {
        id,
        email,
        display_name,
        role,
        created_at,
        updated_at,
    } = row;

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        email: EmailAddress::new(email).map_err(UserDirectoryError::invalid_persisted_data)?,
        display_name: DisplayName::new(display_name)
            .map_err(UserDirectoryError::invalid_persisted_data)?,
        role: UserRole::try_from(role.as_str())
            .map_err(UserDirectoryError::invalid_persisted_data)?,
        created_at,
        updated_at,
    };
    Ok(User::from_persisted(data))
}
