use crate::db::{DbPool, ExecuteWithRetry};
use crate::models::{BookingStatus, Room, RoomStatus};
use crate::schema::{booking_rooms, bookings, rooms};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new room in the inventory
///
/// ### Errors
///
/// Returns an error if the room number is already in use or the insert fails.
/// Callers validate that the rate is positive.
#[instrument(skip(pool), fields(number = %number, room_type = %room_type))]
pub async fn create_room(pool: &DbPool, number: &str, room_type: &str, rate_cents: i64) -> Result<Room> {
    debug!("Creating new room");

    let conn = &mut pool.get()?;

    let taken: i64 = rooms::table
        .filter(rooms::number.eq(number))
        .count()
        .get_result(conn)?;
    if taken > 0 {
        return Err(anyhow!("Room number already exists"));
    }

    let new_room = Room::new(number.to_string(), room_type.to_string(), rate_cents);

    diesel::insert_into(rooms::table)
        .values(new_room.clone())
        .execute_with_retry(conn).await?;

    info!("Successfully created room with id: {}", new_room.get_id());

    Ok(new_room)
}

/// Retrieves a room by its ID
#[instrument(skip(pool), fields(room_id = %room_id))]
pub fn get_room(pool: &DbPool, room_id: &str) -> Result<Option<Room>> {
    let conn = &mut pool.get()?;

    let result = rooms::table
        .find(room_id)
        .first::<Room>(conn)
        .optional()?;

    Ok(result)
}

/// Lists rooms, optionally filtered by status
#[instrument(skip(pool))]
pub fn list_rooms(pool: &DbPool, status: Option<RoomStatus>) -> Result<Vec<Room>> {
    let conn = &mut pool.get()?;

    let mut query = rooms::table.order_by(rooms::number.asc()).into_boxed();

    if let Some(status) = status {
        query = query.filter(rooms::status.eq(status.as_str()));
    }

    let results = query.load::<Room>(conn)?;

    Ok(results)
}

/// Updates a room's type, rate, and/or status
///
/// Moving a room into maintenance is refused while a checked-in booking holds
/// it; the stay has to be checked out first.
///
/// ### Errors
///
/// Returns an error if the room does not exist, the maintenance guard trips,
/// or the update fails.
#[instrument(skip(pool), fields(room_id = %room_id))]
pub async fn update_room(
    pool: &DbPool,
    room_id: &str,
    room_type: Option<String>,
    rate_cents: Option<i64>,
    status: Option<RoomStatus>,
) -> Result<Room> {
    debug!("Updating room");

    let room = get_room(pool, room_id)?.ok_or_else(|| anyhow!("Room not found"))?;

    if status == Some(RoomStatus::Maintenance) {
        let conn = &mut pool.get()?;
        let held: i64 = booking_rooms::table
            .inner_join(bookings::table)
            .filter(booking_rooms::room_id.eq(room_id))
            .filter(bookings::status.eq(BookingStatus::CheckedIn.as_str()))
            .count()
            .get_result(conn)?;
        if held > 0 {
            return Err(anyhow!("Cannot move an occupied room into maintenance"));
        }
    }

    let new_type = room_type.unwrap_or_else(|| room.get_room_type());
    let new_rate = rate_cents.unwrap_or_else(|| room.get_rate_cents());
    let new_status = status.map(|s| s.as_str().to_string()).unwrap_or_else(|| room.get_status_raw());

    let conn = &mut pool.get()?;
    diesel::update(rooms::table.find(room_id.to_string()))
        .set((
            rooms::room_type.eq(new_type),
            rooms::rate_cents.eq(new_rate),
            rooms::status.eq(new_status),
        ))
        .execute_with_retry(conn).await?;

    debug!("Successfully updated room {}", room_id);

    get_room(pool, room_id)?.ok_or_else(|| anyhow!("Room not found"))
}

/// Lists the rooms free for the whole of a date range
///
/// A room is free when it is not in maintenance and no active booking
/// (reserved or checked in) holds it for any overlapping dates. Overlap is
/// the half-open test: an existing stay conflicts when it starts before the
/// requested check-out and ends after the requested check-in.
///
/// Callers validate `check_in < check_out`.
#[instrument(skip(pool), fields(check_in = %check_in, check_out = %check_out))]
pub fn rooms_available(pool: &DbPool, check_in: NaiveDate, check_out: NaiveDate) -> Result<Vec<Room>> {
    debug!("Computing room availability");

    let conn = &mut pool.get()?;

    let active = [BookingStatus::Reserved.as_str(), BookingStatus::CheckedIn.as_str()];

    // Rooms held by an overlapping active stay
    let busy_room_ids: Vec<String> = booking_rooms::table
        .inner_join(bookings::table)
        .filter(bookings::status.eq_any(active))
        .filter(booking_rooms::check_in.lt(check_out))
        .filter(booking_rooms::check_out.gt(check_in))
        .select(booking_rooms::room_id)
        .load(conn)?;

    let results = rooms::table
        .filter(rooms::status.ne(RoomStatus::Maintenance.as_str()))
        .filter(rooms::id.ne_all(busy_room_ids))
        .order_by(rooms::number.asc())
        .load::<Room>(conn)?;

    info!("{} rooms available for {} to {}", results.len(), check_in, check_out);

    Ok(results)
}
