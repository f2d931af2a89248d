use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An operating expense, optionally attributed to a vendor
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Expense {
    /// Unique identifier for the expense (UUID v4 as string)
    id: String,

    /// The vendor billed for it, if any
    vendor_id: Option<String>,

    /// Bookkeeping category, e.g. "laundry", "maintenance", "supplies"
    category: String,

    /// Amount in integer cents; always positive
    amount_cents: i64,

    /// The day the expense was incurred
    incurred_on: NaiveDate,

    note: Option<String>,

    created_at: NaiveDateTime,
}

impl Expense {
    pub fn new(
        vendor_id: Option<String>,
        category: String,
        amount_cents: i64,
        incurred_on: NaiveDate,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vendor_id,
            category,
            amount_cents,
            incurred_on,
            note,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_vendor_id(&self) -> Option<String> {
        self.vendor_id.clone()
    }

    pub fn get_category(&self) -> String {
        self.category.clone()
    }

    pub fn get_amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn get_incurred_on(&self) -> NaiveDate {
        self.incurred_on
    }

    pub fn get_note(&self) -> Option<String> {
        self.note.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
