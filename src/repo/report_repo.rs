use crate::db::DbPool;
use crate::dto::{DailyOccupancyDto, RevenueSummaryDto};
use crate::models::{BookingStatus, RoomStatus};
use crate::schema::{bills, booking_rooms, bookings, expenses, payments, rooms};
use anyhow::Result;
use chrono::{Days, NaiveDate};
use diesel::prelude::*;
use tracing::{debug, instrument};

/// Tallies booked rooms per night over an inclusive date range
///
/// `stays` are half-open `[check_in, check_out)` date ranges; a stay counts
/// toward a night exactly when it covers that date. `available` is the room
/// count minus that night's tally, floored at zero in case the inventory
/// shrank after the stays were taken.
fn tally_occupancy(
    stays: &[(NaiveDate, NaiveDate)],
    from: NaiveDate,
    to: NaiveDate,
    total_rooms: i64,
) -> Vec<DailyOccupancyDto> {
    let mut days = Vec::new();
    let mut date = from;
    while date <= to {
        let booked = stays
            .iter()
            .filter(|(check_in, check_out)| *check_in <= date && date < *check_out)
            .count() as i64;
        days.push(DailyOccupancyDto {
            date,
            booked,
            available: (total_rooms - booked).max(0),
        });
        date = date + Days::new(1);
    }
    days
}

/// Builds the per-night occupancy report for an inclusive date range
///
/// Only stays held by an active booking (reserved or checked in) count. A
/// checkout releases the room, and a follow-up reservation may overlap the
/// finished stay's dates, so counting closed stays would tally the same room
/// twice. Rooms in maintenance are excluded from the available count.
///
/// Callers validate `from <= to` and the range length.
#[instrument(skip(pool), fields(from = %from, to = %to))]
pub fn occupancy_report(pool: &DbPool, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyOccupancyDto>> {
    debug!("Building occupancy report");

    let conn = &mut pool.get()?;

    let counted = [
        BookingStatus::Reserved.as_str(),
        BookingStatus::CheckedIn.as_str(),
    ];

    // Only stays overlapping the report window matter; the inclusive `to`
    // night runs up to the following midnight.
    let window_end = to + Days::new(1);
    let stays: Vec<(NaiveDate, NaiveDate)> = booking_rooms::table
        .inner_join(bookings::table)
        .filter(bookings::status.eq_any(counted))
        .filter(booking_rooms::check_in.lt(window_end))
        .filter(booking_rooms::check_out.gt(from))
        .select((booking_rooms::check_in, booking_rooms::check_out))
        .load(conn)?;

    let total_rooms: i64 = rooms::table
        .filter(rooms::status.ne(RoomStatus::Maintenance.as_str()))
        .count()
        .get_result(conn)?;

    Ok(tally_occupancy(&stays, from, to, total_rooms))
}

/// Builds the revenue/expense summary for an inclusive date range
///
/// Bills and payments are bucketed by the day they were created and taken;
/// expenses by the day they were incurred. `net_cents` is collected minus
/// expenses, so cash actually taken, not amounts merely billed.
#[instrument(skip(pool), fields(from = %from, to = %to))]
pub fn revenue_report(pool: &DbPool, from: NaiveDate, to: NaiveDate) -> Result<RevenueSummaryDto> {
    debug!("Building revenue report");

    let conn = &mut pool.get()?;

    // Timestamp columns span [from 00:00, day-after-to 00:00)
    let range_start = from.and_hms_opt(0, 0, 0).unwrap_or_default();
    let range_end = (to + Days::new(1)).and_hms_opt(0, 0, 0).unwrap_or_default();

    // SUM over SQLite comes back as a type diesel cannot read into an i64,
    // so each bucket is loaded and summed here instead.
    let billed_cents: i64 = bills::table
        .filter(bills::created_at.ge(range_start))
        .filter(bills::created_at.lt(range_end))
        .select(bills::total_cents)
        .load::<i64>(conn)?
        .into_iter()
        .sum();

    let collected_cents: i64 = payments::table
        .filter(payments::paid_at.ge(range_start))
        .filter(payments::paid_at.lt(range_end))
        .select(payments::amount_cents)
        .load::<i64>(conn)?
        .into_iter()
        .sum();

    let expense_cents: i64 = expenses::table
        .filter(expenses::incurred_on.ge(from))
        .filter(expenses::incurred_on.le(to))
        .select(expenses::amount_cents)
        .load::<i64>(conn)?
        .into_iter()
        .sum();

    Ok(RevenueSummaryDto {
        billed_cents,
        collected_cents,
        expense_cents,
        net_cents: collected_cents - expense_cents,
    })
}

#[cfg(test)]
mod prop_tests;
