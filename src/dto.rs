use chrono::{NaiveDate, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Bill, Booking, BookingRoom, Payment};

/// Data transfer object for logging in
#[derive(Deserialize, Debug)]
pub struct LoginDto {
    pub username: String,
    pub password: String,
}

/// Response body for a successful login
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponseDto {
    /// Opaque bearer token to present in the Authorization header
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub role: String,
}

/// Data transfer object for creating a user (admin only)
#[derive(Deserialize, Debug)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    /// Either "admin" or "staff"
    pub role: String,
}

/// Data transfer object for creating a room
#[derive(Deserialize, Debug)]
pub struct CreateRoomDto {
    /// The room number on the door
    pub number: String,
    /// Category label, e.g. "single", "double", "suite"
    pub room_type: String,
    /// Nightly rate in integer cents
    pub rate_cents: i64,
}

/// Data transfer object for updating a room; all fields optional
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateRoomDto {
    pub room_type: Option<String>,
    pub rate_cents: Option<i64>,
    /// One of "available", "occupied", "maintenance"
    pub status: Option<String>,
}

/// Data transfer object for creating a customer
#[derive(Deserialize, Debug)]
pub struct CreateCustomerDto {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Data transfer object for updating a customer; all fields optional
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateCustomerDto {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Data transfer object for creating a vendor
#[derive(Deserialize, Debug)]
pub struct CreateVendorDto {
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Data transfer object for updating a vendor; all fields optional
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateVendorDto {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub phone: Option<String>,
}

/// One requested room stay inside a booking request
#[derive(Deserialize, Debug)]
pub struct BookingRoomRequestDto {
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    /// Nightly rate override in cents; defaults to the room's current rate
    #[serde(default)]
    pub rate_cents: Option<i64>,
}

/// Data transfer object for creating a booking
#[derive(Deserialize, Debug)]
pub struct CreateBookingDto {
    pub customer_id: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// The rooms being reserved; must be non-empty
    pub rooms: Vec<BookingRoomRequestDto>,
}

/// A booking together with its room line items
#[derive(Serialize, Debug)]
pub struct BookingDetailDto {
    pub booking: Booking,
    pub rooms: Vec<BookingRoom>,
}

/// Data transfer object for recording a payment
#[derive(Deserialize, Debug)]
pub struct CreatePaymentDto {
    /// Amount in integer cents; must be positive
    pub amount_cents: i64,
    /// How it was paid, e.g. "cash", "card"
    pub method: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// A bill together with its reconciliation against recorded payments
#[derive(Serialize, Debug)]
pub struct BillDetailDto {
    pub bill: Bill,
    /// Sum of all payments recorded against the booking
    pub paid_cents: i64,
    /// total - paid; negative means overpaid
    pub balance_cents: i64,
    pub payments: Vec<Payment>,
}

/// Data transfer object for recording an expense
#[derive(Deserialize, Debug)]
pub struct CreateExpenseDto {
    #[serde(default)]
    pub vendor_id: Option<String>,
    pub category: String,
    /// Amount in integer cents; must be positive
    pub amount_cents: i64,
    pub incurred_on: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
}

/// Query parameters for a date-range availability check
#[derive(Deserialize, Debug)]
pub struct AvailabilityQueryDto {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Query parameters for a date-range report (both ends inclusive)
#[derive(Deserialize, Debug)]
pub struct DateRangeQueryDto {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Optional date-range filter for listing expenses
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ExpenseFilterDto {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Optional status filter for list endpoints
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct StatusFilterDto {
    pub status: Option<String>,
}

/// Optional substring search for the customer list
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SearchFilterDto {
    pub search: Option<String>,
}

/// One day's occupancy tally in the occupancy report
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyOccupancyDto {
    pub date: NaiveDate,
    /// Rooms held that night by an active booking
    pub booked: i64,
    /// Non-maintenance rooms minus booked
    pub available: i64,
}

/// Revenue/expense summary for a date range
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RevenueSummaryDto {
    /// Sum of bill totals issued in the range
    pub billed_cents: i64,
    /// Sum of payments taken in the range
    pub collected_cents: i64,
    /// Sum of expenses incurred in the range
    pub expense_cents: i64,
    /// collected minus expenses
    pub net_cents: i64,
}

/// Current-user summary returned by `GET /auth/me`
#[derive(Serialize, Deserialize, Debug)]
pub struct CurrentUserDto {
    pub user_id: String,
    pub username: String,
    pub role: String,
}
