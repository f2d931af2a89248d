/// Handlers module
///
/// This module contains all the HTTP request handlers for the API.
/// Handlers validate request shape, call into the repository layer, and
/// translate repository errors into API responses.

mod auth_handlers;
mod billing_handlers;
mod booking_handlers;
mod customer_handlers;
mod expense_handlers;
mod report_handlers;
mod room_handlers;
mod vendor_handlers;

// Re-export all handler functions
pub use auth_handlers::*;
pub use billing_handlers::*;
pub use booking_handlers::*;
pub use customer_handlers::*;
pub use expense_handlers::*;
pub use report_handlers::*;
pub use room_handlers::*;
pub use vendor_handlers::*;

use crate::errors::ApiError;

/// Translates a repository error into an API error
///
/// Repository functions report invariant violations through their error
/// messages: missing records say "not found", state machine and uniqueness
/// violations start with "Cannot" or mention "already". Anything else is an
/// internal database error.
pub(crate) fn classify_repo_error(e: anyhow::Error) -> ApiError {
    let msg = e.to_string();
    if msg.contains("not found") || msg.contains("Not found") {
        ApiError::NotFound
    } else if msg.starts_with("Cannot") || msg.contains("already") {
        ApiError::Conflict(msg)
    } else {
        ApiError::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_classify_not_found() {
        assert!(matches!(classify_repo_error(anyhow!("Customer not found")), ApiError::NotFound));
        assert!(matches!(classify_repo_error(anyhow!("Room not found")), ApiError::NotFound));
    }

    #[test]
    fn test_classify_conflict() {
        assert!(matches!(
            classify_repo_error(anyhow!("Cannot cancel a booking after check-in")),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            classify_repo_error(anyhow!("Room number already exists")),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            classify_repo_error(anyhow!("Room 101 is already booked between 2025-06-10 and 2025-06-12")),
            ApiError::Conflict(_)
        ));
    }

    #[test]
    fn test_classify_database_fallback() {
        assert!(matches!(
            classify_repo_error(anyhow!("database is locked")),
            ApiError::Database(_)
        ));
    }
}
