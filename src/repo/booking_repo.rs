use crate::db::DbPool;
use crate::dto::BookingRoomRequestDto;
use crate::models::{Booking, BookingRoom, BookingStatus, Room, RoomStatus};
use crate::schema::{booking_rooms, bookings, customers, rooms};
use anyhow::{anyhow, Result};
use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// The statuses in which a booking still holds its rooms
fn active_statuses() -> [&'static str; 2] {
    [BookingStatus::Reserved.as_str(), BookingStatus::CheckedIn.as_str()]
}

/// Creates a booking with one line item per requested room
///
/// The whole operation runs in a single transaction: the customer and every
/// room are checked for existence, every requested stay is checked against
/// existing active stays for its room (half-open overlap), and the booking
/// plus all its line items are inserted together. A line with no rate
/// override takes the room's current nightly rate.
///
/// Callers validate the request shape (non-empty rooms, check_in before
/// check_out per line).
///
/// ### Errors
///
/// Returns an error if the customer or a room does not exist, a requested
/// stay overlaps an existing active stay for the same room, or the inserts
/// fail. Nothing is written in any of those cases.
#[instrument(skip(pool, requests), fields(customer_id = %customer_id, rooms = requests.len()))]
pub async fn create_booking(
    pool: &DbPool,
    customer_id: &str,
    notes: Option<String>,
    requests: &[BookingRoomRequestDto],
) -> Result<(Booking, Vec<BookingRoom>)> {
    debug!("Creating new booking");

    let conn = &mut pool.get()?;

    let result = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let customer_exists: i64 = customers::table
            .find(customer_id)
            .count()
            .get_result(conn)?;
        if customer_exists == 0 {
            return Err(anyhow!("Customer not found"));
        }

        let booking = Booking::new(customer_id.to_string(), notes.clone());
        let mut lines = Vec::with_capacity(requests.len());

        for request in requests {
            let room = rooms::table
                .find(&request.room_id)
                .first::<Room>(conn)
                .optional()?
                .ok_or_else(|| anyhow!("Room not found"))?;

            // Half-open overlap: an existing stay conflicts when it starts
            // before the requested check-out and ends after the requested
            // check-in. Back-to-back stays share a day without conflict.
            let conflicts: i64 = booking_rooms::table
                .inner_join(bookings::table)
                .filter(booking_rooms::room_id.eq(&request.room_id))
                .filter(bookings::status.eq_any(active_statuses()))
                .filter(booking_rooms::check_in.lt(request.check_out))
                .filter(booking_rooms::check_out.gt(request.check_in))
                .count()
                .get_result(conn)?;
            if conflicts > 0 {
                return Err(anyhow!(
                    "Room {} is already booked between {} and {}",
                    room.get_number(),
                    request.check_in,
                    request.check_out
                ));
            }

            let rate = request.rate_cents.unwrap_or_else(|| room.get_rate_cents());
            lines.push(BookingRoom::new(
                booking.get_id(),
                request.room_id.clone(),
                request.check_in,
                request.check_out,
                rate,
            ));
        }

        diesel::insert_into(bookings::table)
            .values(booking.clone())
            .execute(conn)?;

        diesel::insert_into(booking_rooms::table)
            .values(lines.clone())
            .execute(conn)?;

        Ok((booking, lines))
    })?;

    info!("Successfully created booking with id: {}", result.0.get_id());

    Ok(result)
}

/// Retrieves a booking by its ID
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub fn get_booking(pool: &DbPool, booking_id: &str) -> Result<Option<Booking>> {
    let conn = &mut pool.get()?;

    let result = bookings::table
        .find(booking_id)
        .first::<Booking>(conn)
        .optional()?;

    Ok(result)
}

/// Gets all room line items for a booking, ordered by check-in date
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub fn get_booking_rooms(pool: &DbPool, booking_id: &str) -> Result<Vec<BookingRoom>> {
    let conn = &mut pool.get()?;

    let results = booking_rooms::table
        .filter(booking_rooms::booking_id.eq(booking_id))
        .order_by(booking_rooms::check_in.asc())
        .load::<BookingRoom>(conn)?;

    Ok(results)
}

/// Lists bookings, optionally filtered by status, most recent first
#[instrument(skip(pool))]
pub fn list_bookings(pool: &DbPool, status: Option<BookingStatus>) -> Result<Vec<Booking>> {
    let conn = &mut pool.get()?;

    let mut query = bookings::table.order_by(bookings::created_at.desc()).into_boxed();

    if let Some(status) = status {
        query = query.filter(bookings::status.eq(status.as_str()));
    }

    let results = query.load::<Booking>(conn)?;

    Ok(results)
}

/// Checks a reserved booking in
///
/// Atomically stamps the booking `checked_in` and flips its rooms to
/// `occupied`.
///
/// ### Errors
///
/// Returns an error if the booking does not exist or is not in the reserved
/// state.
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub async fn check_in_booking(pool: &DbPool, booking_id: &str) -> Result<Booking> {
    debug!("Checking in booking");

    let conn = &mut pool.get()?;

    let booking = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let booking = bookings::table
            .find(booking_id)
            .first::<Booking>(conn)
            .optional()?
            .ok_or_else(|| anyhow!("Booking not found"))?;

        if booking.get_status() != Some(BookingStatus::Reserved) {
            return Err(anyhow!(
                "Cannot check in a booking in state {}",
                booking.get_status_raw()
            ));
        }

        diesel::update(bookings::table.find(booking_id.to_string()))
            .set((
                bookings::status.eq(BookingStatus::CheckedIn.as_str()),
                bookings::checked_in_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        let room_ids: Vec<String> = booking_rooms::table
            .filter(booking_rooms::booking_id.eq(booking_id))
            .select(booking_rooms::room_id)
            .load(conn)?;

        diesel::update(rooms::table.filter(rooms::id.eq_any(room_ids)))
            .set(rooms::status.eq(RoomStatus::Occupied.as_str()))
            .execute(conn)?;

        bookings::table
            .find(booking_id)
            .first::<Booking>(conn)
            .map_err(Into::into)
    })?;

    info!("Checked in booking {}", booking_id);

    Ok(booking)
}

/// Cancels a reserved booking
///
/// Cancellation is only possible before check-in; a started stay has to be
/// checked out instead.
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub async fn cancel_booking(pool: &DbPool, booking_id: &str) -> Result<Booking> {
    debug!("Cancelling booking");

    let conn = &mut pool.get()?;

    let booking = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let booking = bookings::table
            .find(booking_id)
            .first::<Booking>(conn)
            .optional()?
            .ok_or_else(|| anyhow!("Booking not found"))?;

        match booking.get_status() {
            Some(BookingStatus::Reserved) => {}
            Some(BookingStatus::CheckedIn) => {
                return Err(anyhow!("Cannot cancel a booking after check-in"));
            }
            _ => {
                return Err(anyhow!(
                    "Cannot cancel a booking in state {}",
                    booking.get_status_raw()
                ));
            }
        }

        diesel::update(bookings::table.find(booking_id.to_string()))
            .set(bookings::status.eq(BookingStatus::Cancelled.as_str()))
            .execute(conn)?;

        bookings::table
            .find(booking_id)
            .first::<Booking>(conn)
            .map_err(Into::into)
    })?;

    info!("Cancelled booking {}", booking_id);

    Ok(booking)
}
