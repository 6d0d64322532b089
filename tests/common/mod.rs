//! Helpers for integration tests.

use bank_criteria::db::{DbPool, ensure_schema, establish_connection_pool};
use tempfile::TempDir;

/// Temporary SQLite database used in integration tests.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory.");
        let database_url = dir.path().join("test.db").to_string_lossy().into_owned();

        let pool = establish_connection_pool(&database_url)
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        ensure_schema(&mut conn).expect("Failed to apply database schema.");

        TestDb { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
