use log::{error, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use diesel::connection::{Connection, SimpleConnection};
use diesel::r2d2;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;
use diesel::RunQueryDsl;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::errors::{IntoCore, StorageError};
use sme_screener_core::errors::{DatabaseError, Error, Result};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub mod write_actor;
pub use write_actor::{spawn_writer, WriteHandle};

/// Creates the database file and its directory if needed and applies the
/// file-level pragmas. Returns the path as a string for the pool.
pub fn init(db_path: &Path) -> Result<String> {
    if let Some(db_dir) = db_path.parent() {
        if !db_dir.as_os_str().is_empty() && !db_dir.exists() {
            fs::create_dir_all(db_dir).map_err(|e| {
                Error::Database(DatabaseError::ConnectionFailed(format!(
                    "cannot create {}: {}",
                    db_dir.display(),
                    e
                )))
            })?;
        }
    }

    let db_path = db_path.to_string_lossy().to_string();
    {
        let mut conn = SqliteConnection::establish(&db_path)
            .map_err(|e| Error::from(StorageError::from(e)))?;
        conn.batch_execute(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 30000;
            PRAGMA synchronous  = NORMAL;
        ",
        )
        .into_core()?;
    }

    Ok(db_path)
}

pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = r2d2::Pool::builder()
        .max_size(8)
        .min_idle(Some(1))
        .connection_timeout(std::time::Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionCustomizer {}))
        .build(manager)
        .map_err(|e| DatabaseError::PoolCreationFailed(e.to_string()))?;
    Ok(Arc::new(pool))
}

pub fn run_migrations(pool: &DbPool) -> Result<()> {
    info!("Running database migrations");
    let mut connection = get_connection(pool)?;

    let result = connection.run_pending_migrations(MIGRATIONS).map_err(|e| {
        error!("Database migration failed: {}", e);
        Error::Database(DatabaseError::MigrationFailed(e.to_string()))
    })?;

    if result.is_empty() {
        info!("No pending migrations to apply.");
    } else {
        info!("Applied the following migrations:");
        for migration_version in &result {
            info!("  - {}", migration_version);
        }
    }

    Ok(())
}

pub fn get_connection(pool: &Pool<ConnectionManager<SqliteConnection>>) -> Result<DbConnection> {
    pool.get().into_core()
}

/// Writes a consistent copy of the live database to `target` with
/// `VACUUM INTO`. The target must not exist yet.
pub fn snapshot_database(pool: &DbPool, target: &Path) -> Result<String> {
    if target.exists() {
        return Err(Error::Database(DatabaseError::BackupFailed(format!(
            "{} already exists",
            target.display()
        ))));
    }
    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir).map_err(|e| {
            error!("Failed to create snapshot directory: {}", e);
            Error::Database(DatabaseError::BackupFailed(e.to_string()))
        })?;
    }

    let target_str = target.to_string_lossy().to_string();
    info!("Creating database snapshot at {}", target_str);
    let mut conn = get_connection(pool)?;
    diesel::sql_query("VACUUM INTO ?")
        .bind::<Text, _>(target_str.clone())
        .execute(&mut conn)
        .map_err(|e| {
            error!("Database snapshot failed: {}", e);
            Error::Database(DatabaseError::BackupFailed(e.to_string()))
        })?;
    Ok(target_str)
}

#[derive(Debug)]
struct ConnectionCustomizer;

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 30000;
            PRAGMA synchronous = NORMAL;
        ",
        )
        .map_err(r2d2::Error::QueryError)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("screener.db");
        let db_path = init(&path).unwrap();
        assert!(Path::new(&db_path).exists());
    }

    #[test]
    fn test_snapshot_database() {
        let dir = tempdir().unwrap();
        let db_path = init(&dir.path().join("screener.db")).unwrap();
        let pool = create_pool(&db_path).unwrap();
        run_migrations(&pool).unwrap();

        let target = dir.path().join("snapshots").join("copy.db");
        let written = snapshot_database(&pool, &target).unwrap();
        assert!(Path::new(&written).exists());

        // refuses to overwrite
        assert!(snapshot_database(&pool, &target).is_err());
    }
}
