//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::fixture;
use taskboard::identity::{
    adapters::postgres::PostgresUserDirectory,
    domain::{DisplayName, EmailAddress, User, UserRole},
    ports::UserDirectory,
};
use taskboard::project::{
    adapters::postgres::PostgresProjectRepository,
    domain::{Project, ProjectName},
    ports::ProjectRepository,
};
use taskboard::storage::{PgPool, SCHEMA_SQL};
use taskboard::task::adapters::postgres::PostgresTaskRepository;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "taskboard_test_template";

/// Creates a multi-threaded runtime so spawned writers can overlap.
///
/// # Errors
///
/// Returns an error when the runtime cannot be built.
pub fn test_runtime() -> Result<Runtime, eyre::Report> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(Into::into)
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or the schema fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), eyre::Report> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(SCHEMA_SQL)
                .map_err(|e| eyre::eyre!("schema failed: {e}"))?;
            Ok(())
        })
        .map_err(|err| eyre::eyre!("template setup failed: {err}"))
}

/// Drops the per-test database when the test finishes, even on panic.
pub struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl Drop for CleanupGuard {
    #[expect(
        clippy::print_stderr,
        reason = "Test cleanup warnings are informational"
    )]
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.db_name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {err}", self.db_name);
        }
    }
}

/// Adapters sharing one connection pool over a fresh database.
///
/// Field order matters: the pools close before the guard drops the database.
pub struct PostgresStores {
    pub users: PostgresUserDirectory,
    pub projects: PostgresProjectRepository,
    pub tasks: PostgresTaskRepository,
    _guard: CleanupGuard,
}

impl PostgresStores {
    /// Stores a user with a unique email derived from `local_part`.
    ///
    /// # Errors
    ///
    /// Returns an error when the email is invalid or the insert fails.
    pub async fn user(&self, local_part: &str) -> Result<User, eyre::Report> {
        let email = EmailAddress::new(format!("{local_part}+{}@x.com", Uuid::new_v4().simple()))?;
        let user = User::new(
            email,
            DisplayName::new(local_part)?,
            UserRole::User,
            &DefaultClock,
        );
        self.users.store(&user).await?;
        Ok(user)
    }

    /// Stores a project owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is invalid or the insert fails.
    pub async fn project(&self, owner: &User, name: &str) -> Result<Project, eyre::Report> {
        let project = Project::new(ProjectName::new(name)?, None, owner.id(), &DefaultClock);
        self.projects.store(&project).await?;
        Ok(project)
    }
}

/// Creates a database from the migrated template and wires the adapters to it.
///
/// The cluster is the embedded one shared by the whole test binary.
///
/// # Errors
///
/// Returns an error if template setup, database creation, or the pool fails.
#[fixture]
pub fn stores(
    shared_test_cluster: &'static TestCluster,
) -> Result<PostgresStores, eyre::Report> {
    ensure_template(shared_test_cluster)?;
    let db_name = format!("taskboard_test_{}", Uuid::new_v4().simple());
    shared_test_cluster
        .create_database_from_template(db_name.as_str(), TEMPLATE_DB)
        .map_err(|err| eyre::eyre!("database creation failed: {err}"))?;
    let guard = CleanupGuard {
        cluster: shared_test_cluster,
        db_name,
    };

    let url = shared_test_cluster.connection().database_url(&guard.db_name);
    let pool: PgPool = Pool::builder()
        .max_size(4)
        .build(ConnectionManager::<PgConnection>::new(url))?;
    Ok(PostgresStores {
        users: PostgresUserDirectory::new(pool.clone()),
        projects: PostgresProjectRepository::new(pool.clone()),
        tasks: PostgresTaskRepository::new(pool),
        _guard: guard,
    })
}
