use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A payment recorded against a booking
///
/// Payments may arrive before checkout (advance/deposit) or after the bill is
/// issued; settlement is always evaluated against the sum of them.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Payment {
    /// Unique identifier for the payment (UUID v4 as string)
    id: String,

    /// The ID of the booking being paid for
    booking_id: String,

    /// Amount in integer cents; always positive
    amount_cents: i64,

    /// How it was paid, e.g. "cash", "card", "transfer"
    method: String,

    note: Option<String>,

    /// When the payment was taken
    paid_at: NaiveDateTime,
}

impl Payment {
    pub fn new(booking_id: String, amount_cents: i64, method: String, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id,
            amount_cents,
            method,
            note,
            paid_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_booking_id(&self) -> String {
        self.booking_id.clone()
    }

    pub fn get_amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn get_method(&self) -> String {
        self.method.clone()
    }

    pub fn get_note(&self) -> Option<String> {
        self.note.clone()
    }

    pub fn get_paid_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.paid_at, Utc)
    }
}
