//! SQLite connection pooling and schema bootstrap.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder().build(manager)
}

/// Creates the worker's tables when they do not exist yet.
///
/// Safe to run on every startup; the embedded statements are all
/// `IF NOT EXISTS`.
pub fn ensure_schema(conn: &mut DbConnection) -> diesel::QueryResult<()> {
    conn.batch_execute(include_str!("../migrations.sql"))
}
