use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;

use crate::error::{AppError, Result};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

fn init_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    // Cascades from sessions to items to sets depend on this.
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

pub fn create_pool(
    database_url: &str,
    max_size: u32,
) -> std::result::Result<DbPool, r2d2::Error> {
    let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
    // Remove query parameters (e.g., ?mode=rwc)
    let path = path.split('?').next().unwrap_or(path);

    if path == ":memory:" {
        return create_memory_pool();
    }

    let manager = SqliteConnectionManager::file(Path::new(path)).with_init(init_connection);
    Pool::builder().max_size(max_size).build(manager)
}

/// Every in-memory connection is its own database, so the pool holds exactly one.
pub fn create_memory_pool() -> std::result::Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::memory().with_init(init_connection);
    Pool::builder().max_size(1).build(manager)
}

/// Run `f` with a pooled connection on the blocking thread pool.
pub async fn blocking<T, F>(pool: &DbPool, f: F) -> Result<T>
where
    F: FnOnce(&mut DbConnection) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}

/// Round-trips a trivial query through the pool.
pub async fn ping(pool: &DbPool) -> Result<()> {
    blocking(pool, |conn| {
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    })
    .await
}

pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
