use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line item of a booking: one room held over a date range at a rate
///
/// Stay dates are calendar dates; the guest occupies the nights from
/// `check_in` (inclusive) to `check_out` (exclusive), so a one-night stay has
/// `check_out = check_in + 1 day`.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::booking_rooms)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BookingRoom {
    /// Unique identifier for the line item (UUID v4 as string)
    id: String,

    /// The ID of the booking this line item belongs to
    booking_id: String,

    /// The ID of the room being held
    room_id: String,

    /// First night of the stay
    check_in: NaiveDate,

    /// Day of departure (not occupied that night)
    check_out: NaiveDate,

    /// Nightly rate in integer cents
    rate_cents: i64,
}

impl BookingRoom {
    /// Creates a new line item
    ///
    /// Callers are expected to have validated `check_in < check_out`.
    pub fn new(booking_id: String, room_id: String, check_in: NaiveDate, check_out: NaiveDate, rate_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id,
            room_id,
            check_in,
            check_out,
            rate_cents,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_booking_id(&self) -> String {
        self.booking_id.clone()
    }

    pub fn get_room_id(&self) -> String {
        self.room_id.clone()
    }

    pub fn get_check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn get_check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn get_rate_cents(&self) -> i64 {
        self.rate_cents
    }

    /// Number of nights in the stay
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// The charge for this line item: nights times the nightly rate
    pub fn total_cents(&self) -> i64 {
        self.nights() * self.rate_cents
    }

    /// Whether this stay overlaps the given date range
    ///
    /// Two half-open ranges `[check_in, check_out)` overlap exactly when each
    /// starts before the other ends.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.check_in < check_out && self.check_out > check_in
    }

    /// Whether the given day falls within the stay (occupied that night)
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }
}
