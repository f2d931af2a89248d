use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a supplier the hotel buys from (laundry, produce, upkeep)
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::vendors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Vendor {
    /// Unique identifier for the vendor (UUID v4 as string)
    id: String,

    /// Business name
    name: String,

    /// Contact person, if known
    contact: Option<String>,

    phone: Option<String>,

    created_at: NaiveDateTime,
}

impl Vendor {
    pub fn new(name: String, contact: Option<String>, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            contact,
            phone,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_contact(&self) -> Option<String> {
        self.contact.clone()
    }

    pub fn get_phone(&self) -> Option<String> {
        self.phone.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
