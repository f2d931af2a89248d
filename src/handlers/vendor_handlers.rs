use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use crate::db::DbPool;
use crate::dto::CreateVendorDto;
use crate::errors::ApiError;
use crate::handlers::classify_repo_error;
use crate::models::Vendor;
use crate::repo;

/// Handler for creating a vendor
///
/// This function handles POST requests to `/vendors`.
#[instrument(skip(pool, payload), fields(name = %payload.name))]
pub async fn create_vendor_handler(
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<CreateVendorDto>,
) -> Result<Json<Vendor>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Vendor name must not be empty".to_string()));
    }

    let vendor = repo::create_vendor(&pool, &payload.name, payload.contact, payload.phone)
        .await
        .map_err(ApiError::Database)?;

    Ok(Json(vendor))
}

/// Handler for listing vendors
///
/// This function handles GET requests to `/vendors`.
pub async fn list_vendors_handler(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<Vendor>>, ApiError> {
    let vendors = repo::list_vendors(&pool).map_err(ApiError::Database)?;

    Ok(Json(vendors))
}

/// Handler for retrieving a specific vendor
///
/// This function handles GET requests to `/vendors/{id}`.
#[instrument(skip(pool), fields(vendor_id = %vendor_id))]
pub async fn get_vendor_handler(
    State(pool): State<Arc<DbPool>>,
    Path(vendor_id): Path<String>,
) -> Result<Json<Vendor>, ApiError> {
    let vendor = repo::get_vendor(&pool, &vendor_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(vendor))
}

/// Handler for updating a vendor
///
/// This function handles PUT requests to `/vendors/{id}`. Fields left out of
/// the body keep their current value.
#[instrument(skip(pool, payload), fields(vendor_id = %vendor_id))]
pub async fn update_vendor_handler(
    State(pool): State<Arc<DbPool>>,
    Path(vendor_id): Path<String>,
    Json(payload): Json<crate::dto::UpdateVendorDto>,
) -> Result<Json<Vendor>, ApiError> {
    if let Some(ref name) = payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Vendor name must not be empty".to_string()));
        }
    }

    let vendor = repo::update_vendor(&pool, &vendor_id, payload.name, payload.contact, payload.phone)
        .await
        .map_err(classify_repo_error)?;

    Ok(Json(vendor))
}
