use axum::{extract::State, Json};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::instrument;

use crate::db::DbPool;
use crate::dto::{CreateExpenseDto, ExpenseFilterDto};
use crate::errors::ApiError;
use crate::handlers::classify_repo_error;
use crate::models::Expense;
use crate::repo;

/// Handler for recording an expense
///
/// This function handles POST requests to `/expenses`.
#[instrument(skip(pool, payload), fields(category = %payload.category, amount_cents = %payload.amount_cents))]
pub async fn create_expense_handler(
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<CreateExpenseDto>,
) -> Result<Json<Expense>, ApiError> {
    if payload.amount_cents <= 0 {
        return Err(ApiError::Validation(format!(
            "Expense amount must be positive, got {}",
            payload.amount_cents
        )));
    }
    if payload.category.trim().is_empty() {
        return Err(ApiError::Validation("Expense category must not be empty".to_string()));
    }

    let expense = repo::create_expense(
        &pool,
        payload.vendor_id,
        &payload.category,
        payload.amount_cents,
        payload.incurred_on,
        payload.note,
    )
    .await
    .map_err(classify_repo_error)?;

    Ok(Json(expense))
}

/// Handler for listing expenses
///
/// This function handles GET requests to `/expenses`, with optional `?from=`
/// and `?to=` bounds on the incurred-on date (both inclusive).
#[instrument(skip(pool))]
pub async fn list_expenses_handler(
    State(pool): State<Arc<DbPool>>,
    Query(filter): Query<ExpenseFilterDto>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            return Err(ApiError::Validation("from must not be after to".to_string()));
        }
    }

    let expenses = repo::list_expenses(&pool, filter.from, filter.to)
        .map_err(ApiError::Database)?;

    Ok(Json(expenses))
}
