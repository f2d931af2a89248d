use crate::db::DbPool;
use crate::models::{Bill, Booking, BookingRoom, BookingStatus, Payment, RoomStatus};
use crate::schema::{bills, booking_rooms, bookings, payments, rooms};
use anyhow::{anyhow, Result};
use chrono::Utc;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

// SQLite cannot hand SUM back as an i64 through diesel, so payment totals are
// loaded as rows and summed here.
fn sum_payments(conn: &mut SqliteConnection, booking_id: &str) -> QueryResult<i64> {
    let amounts = payments::table
        .filter(payments::booking_id.eq(booking_id))
        .select(payments::amount_cents)
        .load::<i64>(conn)?;
    Ok(amounts.into_iter().sum())
}

/// Checks a booking out and issues its bill
///
/// This is the settlement step of a stay and runs as a single transaction:
///
/// 1. The booking must be checked in.
/// 2. The bill total is the sum of nights times nightly rate over all line
///    items.
/// 3. The bill number is one past the highest issued so far; numbering starts
///    at 1001.
/// 4. The booking moves to `checked_out`, its occupied rooms back to
///    `available`.
/// 5. Payments recorded before checkout count toward settlement, so a
///    fully prepaid bill is settled the moment it is issued.
///
/// ### Errors
///
/// Returns an error if the booking does not exist, is not checked in, or any
/// write fails. No partial state survives a failure.
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub async fn checkout_booking(pool: &DbPool, booking_id: &str) -> Result<Bill> {
    debug!("Checking out booking");

    let conn = &mut pool.get()?;

    let bill = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let booking = bookings::table
            .find(booking_id)
            .first::<Booking>(conn)
            .optional()?
            .ok_or_else(|| anyhow!("Booking not found"))?;

        if booking.get_status() != Some(BookingStatus::CheckedIn) {
            return Err(anyhow!(
                "Cannot check out a booking in state {}",
                booking.get_status_raw()
            ));
        }

        let lines = booking_rooms::table
            .filter(booking_rooms::booking_id.eq(booking_id))
            .load::<BookingRoom>(conn)?;

        let total_cents: i64 = lines.iter().map(|line| line.total_cents()).sum();

        let next_bill_no = bills::table
            .select(max(bills::bill_no))
            .first::<Option<i32>>(conn)?
            .unwrap_or(1000)
            + 1;

        let mut bill = Bill::new(booking_id.to_string(), next_bill_no, total_cents);

        let paid_cents = sum_payments(conn, booking_id)?;
        if paid_cents >= total_cents {
            bill.set_settled_at(Some(Utc::now().naive_utc()));
        }

        diesel::insert_into(bills::table)
            .values(bill.clone())
            .execute(conn)?;

        diesel::update(bookings::table.find(booking_id.to_string()))
            .set((
                bookings::status.eq(BookingStatus::CheckedOut.as_str()),
                bookings::checked_out_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        let room_ids: Vec<String> = lines.iter().map(|line| line.get_room_id()).collect();
        diesel::update(
            rooms::table
                .filter(rooms::id.eq_any(room_ids))
                .filter(rooms::status.eq(RoomStatus::Occupied.as_str())),
        )
        .set(rooms::status.eq(RoomStatus::Available.as_str()))
        .execute(conn)?;

        Ok(bill)
    })?;

    info!(
        "Checked out booking {} with bill no {} for {} cents",
        booking_id,
        bill.get_bill_no(),
        bill.get_total_cents()
    );

    Ok(bill)
}

/// Records a payment against a booking
///
/// Payments can land before or after checkout. When the booking already has a
/// bill and the running payment total now covers it, the bill is marked
/// settled in the same transaction.
///
/// Callers validate that the amount is positive.
///
/// ### Errors
///
/// Returns an error if the booking does not exist or is cancelled.
#[instrument(skip(pool), fields(booking_id = %booking_id, amount_cents = %amount_cents))]
pub async fn record_payment(
    pool: &DbPool,
    booking_id: &str,
    amount_cents: i64,
    method: &str,
    note: Option<String>,
) -> Result<Payment> {
    debug!("Recording payment");

    let conn = &mut pool.get()?;

    let payment = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let booking = bookings::table
            .find(booking_id)
            .first::<Booking>(conn)
            .optional()?
            .ok_or_else(|| anyhow!("Booking not found"))?;

        if booking.get_status() == Some(BookingStatus::Cancelled) {
            return Err(anyhow!("Cannot record a payment against a cancelled booking"));
        }

        let payment = Payment::new(
            booking_id.to_string(),
            amount_cents,
            method.to_string(),
            note.clone(),
        );

        diesel::insert_into(payments::table)
            .values(payment.clone())
            .execute(conn)?;

        let bill = bills::table
            .filter(bills::booking_id.eq(booking_id))
            .first::<Bill>(conn)
            .optional()?;

        if let Some(bill) = bill {
            if !bill.is_settled() {
                let paid_cents = sum_payments(conn, booking_id)?;

                if paid_cents >= bill.get_total_cents() {
                    diesel::update(bills::table.find(bill.get_id()))
                        .set(bills::settled_at.eq(Utc::now().naive_utc()))
                        .execute(conn)?;
                }
            }
        }

        Ok(payment)
    })?;

    info!("Recorded payment {} for booking {}", payment.get_id(), booking_id);

    Ok(payment)
}

/// Retrieves a bill by its ID
#[instrument(skip(pool), fields(bill_id = %bill_id))]
pub fn get_bill(pool: &DbPool, bill_id: &str) -> Result<Option<Bill>> {
    let conn = &mut pool.get()?;

    let result = bills::table
        .find(bill_id)
        .first::<Bill>(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves the bill issued for a booking, if checked out
pub fn get_bill_for_booking(pool: &DbPool, booking_id: &str) -> Result<Option<Bill>> {
    let conn = &mut pool.get()?;

    let result = bills::table
        .filter(bills::booking_id.eq(booking_id))
        .first::<Bill>(conn)
        .optional()?;

    Ok(result)
}

/// Lists all bills, newest first
pub fn list_bills(pool: &DbPool) -> Result<Vec<Bill>> {
    let conn = &mut pool.get()?;

    let results = bills::table
        .order_by(bills::bill_no.desc())
        .load::<Bill>(conn)?;

    Ok(results)
}

/// Lists the payments recorded against a booking, oldest first
pub fn list_payments_for_booking(pool: &DbPool, booking_id: &str) -> Result<Vec<Payment>> {
    let conn = &mut pool.get()?;

    let results = payments::table
        .filter(payments::booking_id.eq(booking_id))
        .order_by(payments::paid_at.asc())
        .load::<Payment>(conn)?;

    Ok(results)
}

/// Sums the payments recorded against a booking
pub fn paid_total_for_booking(pool: &DbPool, booking_id: &str) -> Result<i64> {
    let conn = &mut pool.get()?;

    Ok(sum_payments(conn, booking_id)?)
}
