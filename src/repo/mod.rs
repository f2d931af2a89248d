/// Repository module
///
/// This module provides the data access layer for the application.
/// It contains functions for interacting with the database: rooms,
/// customers, vendors, bookings and their line items, billing and
/// payments, expenses, reports, and user/session management.
///
/// The repository pattern abstracts away the details of database access
/// and provides a clean API for the rest of the application to use.

mod billing_repo;
mod booking_repo;
mod customer_repo;
mod expense_repo;
mod report_repo;
mod room_repo;
mod user_repo;
mod vendor_repo;

// Re-export all repository functions
pub use billing_repo::*;
pub use booking_repo::*;
pub use customer_repo::*;
pub use expense_repo::*;
pub use report_repo::*;
pub use room_repo::*;
pub use user_repo::*;
pub use vendor_repo::*;

#[cfg(test)]
pub mod tests {
    use std::sync::Arc;

    use crate::db::{self, DbPool};
    use diesel::connection::SimpleConnection;

    /// Sets up a test database with migrations applied
    ///
    /// Uses a unique shared in-memory database per test: plain ":memory:"
    /// gives each pooled connection its own separate database, so migrations
    /// run on one connection wouldn't be visible on others. A unique URI with
    /// cache=shared makes all connections in this pool share one in-memory
    /// database while staying isolated from other tests.
    pub fn setup_test_db() -> Arc<DbPool> {
        let unique_id = uuid::Uuid::new_v4();
        let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
        let pool = db::init_pool(&database_url);

        let mut conn = pool.get().expect("Failed to get connection");

        // Enable foreign key constraints for SQLite
        conn.batch_execute("PRAGMA foreign_keys = ON").unwrap();

        crate::run_migrations(&mut conn);

        Arc::new(pool)
    }
}
