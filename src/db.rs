use diesel::prelude::*;
use diesel::query_dsl::methods::ExecuteDsl;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use std::time::Duration;
use tracing::warn;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

pub fn init_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder().build(manager).expect("Failed to create pool.")
}

/// How many times a write is attempted before the busy error is surfaced
const MAX_WRITE_ATTEMPTS: u32 = 5;

/// Retry wrapper for write statements
///
/// SQLite allows a single writer at a time, so concurrent requests can hit
/// "database is locked". Writes go through this helper, which retries with a
/// short backoff before giving up.
pub trait ExecuteWithRetry: ExecuteDsl<SqliteConnection> + RunQueryDsl<SqliteConnection> + Clone {
    async fn execute_with_retry(self, conn: &mut SqliteConnection) -> QueryResult<usize> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.clone().execute(conn) {
                Ok(rows) => return Ok(rows),
                Err(DieselError::DatabaseError(_, ref info))
                    if info.message().contains("database is locked")
                        && attempt < MAX_WRITE_ATTEMPTS =>
                {
                    warn!("Database locked, retrying write (attempt {})", attempt);
                    tokio::time::sleep(Duration::from_millis(20 * attempt as u64)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<T> ExecuteWithRetry for T where T: ExecuteDsl<SqliteConnection> + RunQueryDsl<SqliteConnection> + Clone {}
