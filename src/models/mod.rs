/// Data models module
///
/// This module contains the data structures representing the front-desk
/// entities: rooms, customers, vendors, bookings and their room line items,
/// bills, payments, expenses, and the users/sessions used for authentication.
///
/// Each model maps to one diesel table and keeps its fields private behind
/// accessors, so invariants (UUID ids, UTC timestamps) hold at construction.

mod bill;
mod booking;
mod booking_room;
mod customer;
mod expense;
mod payment;
mod room;
mod session;
mod user;
mod vendor;

pub use bill::Bill;
pub use booking::{Booking, BookingStatus};
pub use booking_room::BookingRoom;
pub use customer::Customer;
pub use expense::Expense;
pub use payment::Payment;
pub use room::{Room, RoomStatus};
pub use session::Session;
pub use user::{User, ROLE_ADMIN, ROLE_STAFF};
pub use vendor::Vendor;
