use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use domain::DomainError;
use std::time::Duration;
use tracing::info;

pub mod error;
pub mod schema;
pub use error::StorageError;
pub use schema::*;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite only keeps an in-memory database alive while its connection is open.
pub const IN_MEMORY_URL: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Per-connection pragmas; SQLite resets them for every new connection.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(database_url: &str, pool_size: u32) -> Result<Self, DomainError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let mut builder = r2d2::Pool::builder()
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout: BUSY_TIMEOUT,
            }));

        builder = if database_url == IN_MEMORY_URL {
            // One connection that is never recycled, otherwise the data vanishes.
            builder.max_size(1).idle_timeout(None).max_lifetime(None)
        } else {
            builder.max_size(pool_size.max(1))
        };

        let pool = builder
            .build(manager)
            .map_err(|e| DomainError::repository(format!("failed to create SQLite pool: {}", e)))?;
        Ok(Database { pool })
    }

    /// Fresh in-memory database with the schema applied.
    pub fn in_memory() -> Result<Self, DomainError> {
        let database = Self::new(IN_MEMORY_URL, 1)?;
        database.run_migrations()?;
        Ok(database)
    }

    pub fn run_migrations(&self) -> Result<(), DomainError> {
        let mut pooled = self.pool.get().map_err(DomainError::repository)?;
        let conn: &mut SqliteConnection = &mut pooled;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DomainError::repository(format!("migration failed: {}", e)))?;

        for version in &applied {
            info!(%version, "applied migration");
        }
        Ok(())
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Runs `f` with a pooled connection on tokio's blocking thread pool.
pub(crate) async fn run_blocking<T, F>(pool: &SqlitePool, f: F) -> Result<T, DomainError>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T, StorageError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(DomainError::repository)?;
        f(&mut conn).map_err(DomainError::from)
    })
    .await
    .map_err(DomainError::repository)?
}
