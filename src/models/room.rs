use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Operational state of a room
///
/// `Occupied` is flipped by check-in/checkout; `Maintenance` takes a room out
/// of the availability pool entirely. Future-dated reservations always go by
/// stay overlap, not this flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(RoomStatus::Available),
            "occupied" => Some(RoomStatus::Occupied),
            "maintenance" => Some(RoomStatus::Maintenance),
            _ => None,
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a room in the hotel's inventory
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::rooms)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Room {
    /// Unique identifier for the room (UUID v4 as string)
    id: String,

    /// The room number shown on the door; unique across the hotel
    number: String,

    /// Category label, e.g. "single", "double", "suite"
    room_type: String,

    /// Current nightly rate in integer cents
    rate_cents: i64,

    /// Operational status, stored as text (see `RoomStatus`)
    status: String,

    /// When the room was added to the inventory
    created_at: NaiveDateTime,
}

impl Room {
    /// Creates a new room in the `Available` state
    pub fn new(number: String, room_type: String, rate_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            number,
            room_type,
            rate_cents,
            status: RoomStatus::Available.as_str().to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_number(&self) -> String {
        self.number.clone()
    }

    pub fn get_room_type(&self) -> String {
        self.room_type.clone()
    }

    pub fn get_rate_cents(&self) -> i64 {
        self.rate_cents
    }

    pub fn get_status(&self) -> Option<RoomStatus> {
        RoomStatus::parse(&self.status)
    }

    pub fn get_status_raw(&self) -> String {
        self.status.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
