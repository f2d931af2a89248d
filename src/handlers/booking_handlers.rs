use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::db::DbPool;
use crate::dto::{BookingDetailDto, CreateBookingDto, StatusFilterDto};
use crate::errors::ApiError;
use crate::handlers::classify_repo_error;
use crate::models::{Booking, BookingStatus};
use crate::repo;

/// Handler for creating a booking
///
/// This function handles POST requests to `/bookings`. The request names the
/// customer and one or more room stays; all stays are reserved atomically or
/// none are.
///
/// ### Returns
///
/// The new booking with its room line items as JSON
#[instrument(skip(pool, payload), fields(customer_id = %payload.customer_id, rooms = payload.rooms.len()))]
pub async fn create_booking_handler(
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<CreateBookingDto>,
) -> Result<Json<BookingDetailDto>, ApiError> {
    debug!("Creating booking");

    if payload.rooms.is_empty() {
        return Err(ApiError::Validation(
            "A booking must include at least one room".to_string(),
        ));
    }
    for request in &payload.rooms {
        if request.check_in >= request.check_out {
            warn!("Rejected stay with check_in {} >= check_out {}", request.check_in, request.check_out);
            return Err(ApiError::Validation(
                "check_in must be before check_out".to_string(),
            ));
        }
        if let Some(rate) = request.rate_cents {
            if rate <= 0 {
                return Err(ApiError::Validation(format!(
                    "Nightly rate must be positive, got {}",
                    rate
                )));
            }
        }
    }

    let (booking, rooms) =
        repo::create_booking(&pool, &payload.customer_id, payload.notes, &payload.rooms)
            .await
            .map_err(classify_repo_error)?;

    info!("Created booking {}", booking.get_id());

    Ok(Json(BookingDetailDto { booking, rooms }))
}

/// Handler for listing bookings
///
/// This function handles GET requests to `/bookings`, with an optional
/// `?status=` filter.
#[instrument(skip(pool))]
pub async fn list_bookings_handler(
    State(pool): State<Arc<DbPool>>,
    Query(filter): Query<StatusFilterDto>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let status = match filter.status.as_deref() {
        None => None,
        Some(s) => Some(
            BookingStatus::parse(s)
                .ok_or_else(|| ApiError::Validation(format!("Unknown booking status: {}", s)))?,
        ),
    };

    let bookings = repo::list_bookings(&pool, status).map_err(ApiError::Database)?;

    Ok(Json(bookings))
}

/// Handler for retrieving a booking with its room line items
///
/// This function handles GET requests to `/bookings/{id}`.
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub async fn get_booking_handler(
    State(pool): State<Arc<DbPool>>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingDetailDto>, ApiError> {
    let booking = repo::get_booking(&pool, &booking_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let rooms = repo::get_booking_rooms(&pool, &booking_id).map_err(ApiError::Database)?;

    Ok(Json(BookingDetailDto { booking, rooms }))
}

/// Handler for checking a booking in
///
/// This function handles POST requests to `/bookings/{id}/check_in`.
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub async fn check_in_handler(
    State(pool): State<Arc<DbPool>>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking = repo::check_in_booking(&pool, &booking_id)
        .await
        .map_err(classify_repo_error)?;

    Ok(Json(booking))
}

/// Handler for cancelling a booking
///
/// This function handles POST requests to `/bookings/{id}/cancel`. Only
/// reserved bookings can be cancelled.
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub async fn cancel_booking_handler(
    State(pool): State<Arc<DbPool>>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking = repo::cancel_booking(&pool, &booking_id)
        .await
        .map_err(classify_repo_error)?;

    Ok(Json(booking))
}
