use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::db::DbPool;
use crate::dto::{CreateCustomerDto, SearchFilterDto, UpdateCustomerDto};
use crate::errors::ApiError;
use crate::handlers::classify_repo_error;
use crate::models::Customer;
use crate::repo;

/// Handler for creating a customer
///
/// This function handles POST requests to `/customers`.
#[instrument(skip(pool, payload), fields(name = %payload.name))]
pub async fn create_customer_handler(
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<CreateCustomerDto>,
) -> Result<Json<Customer>, ApiError> {
    debug!("Creating customer");

    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Customer name must not be empty".to_string()));
    }

    let customer = repo::create_customer(
        &pool,
        &payload.name,
        payload.phone,
        payload.email,
        payload.address,
    )
    .await
    .map_err(ApiError::Database)?;

    Ok(Json(customer))
}

/// Handler for listing customers
///
/// This function handles GET requests to `/customers`, with an optional
/// `?search=` name filter.
#[instrument(skip(pool))]
pub async fn list_customers_handler(
    State(pool): State<Arc<DbPool>>,
    Query(filter): Query<SearchFilterDto>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = repo::list_customers(&pool, filter.search.as_deref())
        .map_err(ApiError::Database)?;

    Ok(Json(customers))
}

/// Handler for retrieving a specific customer
///
/// This function handles GET requests to `/customers/{id}`.
#[instrument(skip(pool), fields(customer_id = %customer_id))]
pub async fn get_customer_handler(
    State(pool): State<Arc<DbPool>>,
    Path(customer_id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let customer = repo::get_customer(&pool, &customer_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(customer))
}

/// Handler for updating a customer
///
/// This function handles PUT requests to `/customers/{id}`. Fields left out
/// of the body keep their current value.
#[instrument(skip(pool, payload), fields(customer_id = %customer_id))]
pub async fn update_customer_handler(
    State(pool): State<Arc<DbPool>>,
    Path(customer_id): Path<String>,
    Json(payload): Json<UpdateCustomerDto>,
) -> Result<Json<Customer>, ApiError> {
    if let Some(ref name) = payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Customer name must not be empty".to_string()));
        }
    }

    let customer = repo::update_customer(
        &pool,
        &customer_id,
        payload.name,
        payload.phone,
        payload.email,
        payload.address,
    )
    .await
    .map_err(classify_repo_error)?;

    Ok(Json(customer))
}
