use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The aggregated invoice for a booking, created at checkout
///
/// `total_cents` is fixed at checkout time as the sum of the booking's line
/// item charges (nights times nightly rate). `bill_no` is the human-facing
/// invoice number, allocated sequentially inside the checkout transaction.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::bills)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Bill {
    /// Unique identifier for the bill (UUID v4 as string)
    id: String,

    /// The ID of the booking this bill settles
    booking_id: String,

    /// Sequential invoice number
    bill_no: i32,

    /// Invoice total in integer cents
    total_cents: i64,

    /// When the bill was issued
    created_at: NaiveDateTime,

    /// When recorded payments first covered the total, if they have
    settled_at: Option<NaiveDateTime>,
}

impl Bill {
    /// Creates a new, unsettled bill
    pub fn new(booking_id: String, bill_no: i32, total_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id,
            bill_no,
            total_cents,
            created_at: Utc::now().naive_utc(),
            settled_at: None,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_booking_id(&self) -> String {
        self.booking_id.clone()
    }

    pub fn get_bill_no(&self) -> i32 {
        self.bill_no
    }

    pub fn get_total_cents(&self) -> i64 {
        self.total_cents
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
    }

    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }

    pub fn set_settled_at(&mut self, settled_at: Option<NaiveDateTime>) {
        self.settled_at = settled_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bill_is_unsettled() {
        let bill = Bill::new("booking-1".to_string(), 1001, 45_000);

        assert!(Uuid::parse_str(&bill.get_id()).is_ok());
        assert_eq!(bill.get_bill_no(), 1001);
        assert_eq!(bill.get_total_cents(), 45_000);
        assert!(!bill.is_settled());
    }
}
