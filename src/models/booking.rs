use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle state of a booking
///
/// The allowed transitions are `Reserved -> CheckedIn -> CheckedOut` and
/// `Reserved -> Cancelled`. The repo layer enforces them; the database stores
/// the lowercase string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Reserved,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    /// The string form stored in the `bookings.status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Reserved => "reserved",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Parses the stored string form, returning None for unknown values
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reserved" => Some(BookingStatus::Reserved),
            "checked_in" => Some(BookingStatus::CheckedIn),
            "checked_out" => Some(BookingStatus::CheckedOut),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether a booking in this state still holds its rooms
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Reserved | BookingStatus::CheckedIn)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a reservation linking a customer to one or more room stays
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Booking {
    /// Unique identifier for the booking (UUID v4 as string)
    id: String,

    /// The ID of the customer the booking belongs to
    customer_id: String,

    /// Lifecycle status, stored as text (see `BookingStatus`)
    status: String,

    /// Free-form front-desk notes
    notes: Option<String>,

    /// When the booking was created
    created_at: NaiveDateTime,

    /// When the guest checked in, if they have
    checked_in_at: Option<NaiveDateTime>,

    /// When the guest checked out, if they have
    checked_out_at: Option<NaiveDateTime>,
}

impl Booking {
    /// Creates a new booking in the `Reserved` state
    pub fn new(customer_id: String, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            status: BookingStatus::Reserved.as_str().to_string(),
            notes,
            created_at: Utc::now().naive_utc(),
            checked_in_at: None,
            checked_out_at: None,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_customer_id(&self) -> String {
        self.customer_id.clone()
    }

    /// Gets the booking's status
    ///
    /// ### Returns
    ///
    /// The parsed status, or None if the stored text is not a known state
    pub fn get_status(&self) -> Option<BookingStatus> {
        BookingStatus::parse(&self.status)
    }

    /// Gets the raw status text as stored in the database
    pub fn get_status_raw(&self) -> String {
        self.status.clone()
    }

    pub fn get_notes(&self) -> Option<String> {
        self.notes.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_checked_in_at(&self) -> Option<DateTime<Utc>> {
        self.checked_in_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
    }

    pub fn get_checked_out_at(&self) -> Option<DateTime<Utc>> {
        self.checked_out_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_booking_is_reserved() {
        let booking = Booking::new("customer-1".to_string(), None);

        assert!(Uuid::parse_str(&booking.get_id()).is_ok());
        assert_eq!(booking.get_status(), Some(BookingStatus::Reserved));
        assert_eq!(booking.get_checked_in_at(), None);
        assert_eq!(booking.get_checked_out_at(), None);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            BookingStatus::Reserved,
            BookingStatus::CheckedIn,
            BookingStatus::CheckedOut,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("bogus"), None);
    }

    #[test]
    fn test_active_states() {
        assert!(BookingStatus::Reserved.is_active());
        assert!(BookingStatus::CheckedIn.is_active());
        assert!(!BookingStatus::CheckedOut.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }
}
