use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{AvailabilityQueryDto, CreateRoomDto, StatusFilterDto, UpdateRoomDto};
use crate::errors::ApiError;
use crate::handlers::classify_repo_error;
use crate::models::{Room, RoomStatus};
use crate::repo;

/// Handler for creating a room
///
/// This function handles POST requests to `/rooms`.
///
/// ### Returns
///
/// The newly created room as JSON
#[instrument(skip(pool), fields(number = %payload.number))]
pub async fn create_room_handler(
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<CreateRoomDto>,
) -> Result<Json<Room>, ApiError> {
    debug!("Creating room");

    if payload.number.trim().is_empty() {
        return Err(ApiError::Validation("Room number must not be empty".to_string()));
    }
    if payload.rate_cents <= 0 {
        return Err(ApiError::Validation(format!(
            "Nightly rate must be positive, got {}",
            payload.rate_cents
        )));
    }

    let room = repo::create_room(&pool, &payload.number, &payload.room_type, payload.rate_cents)
        .await
        .map_err(classify_repo_error)?;

    Ok(Json(room))
}

/// Handler for listing rooms
///
/// This function handles GET requests to `/rooms`, with an optional
/// `?status=` filter.
#[instrument(skip(pool))]
pub async fn list_rooms_handler(
    State(pool): State<Arc<DbPool>>,
    Query(filter): Query<StatusFilterDto>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let status = match filter.status.as_deref() {
        None => None,
        Some(s) => Some(
            RoomStatus::parse(s)
                .ok_or_else(|| ApiError::Validation(format!("Unknown room status: {}", s)))?,
        ),
    };

    let rooms = repo::list_rooms(&pool, status).map_err(ApiError::Database)?;

    Ok(Json(rooms))
}

/// Handler for retrieving a specific room
///
/// This function handles GET requests to `/rooms/{id}`.
#[instrument(skip(pool), fields(room_id = %room_id))]
pub async fn get_room_handler(
    State(pool): State<Arc<DbPool>>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let room = repo::get_room(&pool, &room_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(room))
}

/// Handler for updating a room
///
/// This function handles PUT requests to `/rooms/{id}`. Fields left out of
/// the body keep their current value.
#[instrument(skip(pool, payload), fields(room_id = %room_id))]
pub async fn update_room_handler(
    State(pool): State<Arc<DbPool>>,
    Path(room_id): Path<String>,
    Json(payload): Json<UpdateRoomDto>,
) -> Result<Json<Room>, ApiError> {
    debug!("Updating room");

    if let Some(rate) = payload.rate_cents {
        if rate <= 0 {
            return Err(ApiError::Validation(format!(
                "Nightly rate must be positive, got {}",
                rate
            )));
        }
    }

    let status = match payload.status.as_deref() {
        None => None,
        Some(s) => Some(
            RoomStatus::parse(s)
                .ok_or_else(|| ApiError::Validation(format!("Unknown room status: {}", s)))?,
        ),
    };

    let room = repo::update_room(&pool, &room_id, payload.room_type, payload.rate_cents, status)
        .await
        .map_err(classify_repo_error)?;

    info!("Updated room {}", room_id);

    Ok(Json(room))
}

/// Handler for the availability search
///
/// This function handles GET requests to
/// `/rooms/available?check_in=...&check_out=...`.
///
/// ### Returns
///
/// The rooms free for the whole requested range as JSON
#[instrument(skip(pool), fields(check_in = %query.check_in, check_out = %query.check_out))]
pub async fn rooms_available_handler(
    State(pool): State<Arc<DbPool>>,
    Query(query): Query<AvailabilityQueryDto>,
) -> Result<Json<Vec<Room>>, ApiError> {
    if query.check_in >= query.check_out {
        return Err(ApiError::Validation(
            "check_in must be before check_out".to_string(),
        ));
    }

    let rooms = repo::rooms_available(&pool, query.check_in, query.check_out)
        .map_err(ApiError::Database)?;

    Ok(Json(rooms))
}
