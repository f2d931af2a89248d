use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{BillDetailDto, CreatePaymentDto};
use crate::errors::ApiError;
use crate::handlers::classify_repo_error;
use crate::models::{Bill, Payment};
use crate::repo;

/// Handler for checking a booking out
///
/// This function handles POST requests to `/bookings/{id}/checkout`. Issues
/// the bill, frees the rooms, and reports the payment reconciliation.
///
/// ### Returns
///
/// The issued bill with its payment state as JSON
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub async fn checkout_handler(
    State(pool): State<Arc<DbPool>>,
    Path(booking_id): Path<String>,
) -> Result<Json<BillDetailDto>, ApiError> {
    debug!("Checking out booking");

    let bill = repo::checkout_booking(&pool, &booking_id)
        .await
        .map_err(classify_repo_error)?;

    info!("Issued bill no {} for booking {}", bill.get_bill_no(), booking_id);

    bill_detail(&pool, bill).map(Json)
}

/// Handler for recording a payment against a booking
///
/// This function handles POST requests to `/bookings/{id}/payments`.
#[instrument(skip(pool, payload), fields(booking_id = %booking_id, amount_cents = %payload.amount_cents))]
pub async fn record_payment_handler(
    State(pool): State<Arc<DbPool>>,
    Path(booking_id): Path<String>,
    Json(payload): Json<CreatePaymentDto>,
) -> Result<Json<Payment>, ApiError> {
    if payload.amount_cents <= 0 {
        return Err(ApiError::Validation(format!(
            "Payment amount must be positive, got {}",
            payload.amount_cents
        )));
    }
    if payload.method.trim().is_empty() {
        return Err(ApiError::Validation("Payment method must not be empty".to_string()));
    }

    let payment = repo::record_payment(
        &pool,
        &booking_id,
        payload.amount_cents,
        &payload.method,
        payload.note,
    )
    .await
    .map_err(classify_repo_error)?;

    Ok(Json(payment))
}

/// Handler for listing the payments on a booking
///
/// This function handles GET requests to `/bookings/{id}/payments`.
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub async fn list_payments_handler(
    State(pool): State<Arc<DbPool>>,
    Path(booking_id): Path<String>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    repo::get_booking(&pool, &booking_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let payments = repo::list_payments_for_booking(&pool, &booking_id)
        .map_err(ApiError::Database)?;

    Ok(Json(payments))
}

/// Handler for listing all bills
///
/// This function handles GET requests to `/bills`.
pub async fn list_bills_handler(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<Bill>>, ApiError> {
    let bills = repo::list_bills(&pool).map_err(ApiError::Database)?;

    Ok(Json(bills))
}

/// Handler for retrieving a bill with its payment reconciliation
///
/// This function handles GET requests to `/bills/{id}`.
#[instrument(skip(pool), fields(bill_id = %bill_id))]
pub async fn get_bill_handler(
    State(pool): State<Arc<DbPool>>,
    Path(bill_id): Path<String>,
) -> Result<Json<BillDetailDto>, ApiError> {
    let bill = repo::get_bill(&pool, &bill_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    bill_detail(&pool, bill).map(Json)
}

/// Assembles a bill's payment reconciliation
fn bill_detail(pool: &DbPool, bill: Bill) -> Result<BillDetailDto, ApiError> {
    let booking_id = bill.get_booking_id();
    let payments = repo::list_payments_for_booking(pool, &booking_id).map_err(ApiError::Database)?;
    let paid_cents = repo::paid_total_for_booking(pool, &booking_id).map_err(ApiError::Database)?;

    Ok(BillDetailDto {
        balance_cents: bill.get_total_cents() - paid_cents,
        bill,
        paid_cents,
        payments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::BookingRoomRequestDto;
    use crate::repo::tests::setup_test_db;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Three nights at 12000 cents, already checked in
    async fn seed_checked_in(pool: &DbPool) -> String {
        let room = repo::create_room(pool, "101", "double", 12_000).await.unwrap();
        let customer = repo::create_customer(pool, "Guest", None, None, None).await.unwrap();
        let (booking, _) = repo::create_booking(
            pool,
            &customer.get_id(),
            None,
            &[BookingRoomRequestDto {
                room_id: room.get_id(),
                check_in: date(2025, 6, 10),
                check_out: date(2025, 6, 13),
                rate_cents: None,
            }],
        ).await.unwrap();
        repo::check_in_booking(pool, &booking.get_id()).await.unwrap();
        booking.get_id()
    }

    #[tokio::test]
    async fn test_checkout_handler_reports_balance() {
        let pool = setup_test_db();
        let booking_id = seed_checked_in(&pool).await;

        repo::record_payment(&pool, &booking_id, 10_000, "cash", None).await.unwrap();

        let detail = checkout_handler(State(pool.clone()), Path(booking_id)).await.unwrap().0;

        assert_eq!(detail.bill.get_total_cents(), 36_000);
        assert_eq!(detail.paid_cents, 10_000);
        assert_eq!(detail.balance_cents, 26_000);
        assert!(!detail.bill.is_settled());
    }

    #[tokio::test]
    async fn test_checkout_handler_conflict_when_reserved() {
        let pool = setup_test_db();

        let room = repo::create_room(&pool, "101", "double", 12_000).await.unwrap();
        let customer = repo::create_customer(&pool, "Guest", None, None, None).await.unwrap();
        let (booking, _) = repo::create_booking(
            &pool,
            &customer.get_id(),
            None,
            &[BookingRoomRequestDto {
                room_id: room.get_id(),
                check_in: date(2025, 6, 10),
                check_out: date(2025, 6, 13),
                rate_cents: None,
            }],
        ).await.unwrap();

        let result = checkout_handler(State(pool.clone()), Path(booking.get_id())).await;

        assert!(matches!(result.unwrap_err(), ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_record_payment_handler_validates_amount() {
        let pool = setup_test_db();
        let booking_id = seed_checked_in(&pool).await;

        let result = record_payment_handler(
            State(pool.clone()),
            Path(booking_id),
            Json(CreatePaymentDto {
                amount_cents: -500,
                method: "cash".to_string(),
                note: None,
            }),
        ).await;

        assert!(matches!(result.unwrap_err(), ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_record_payment_handler_unknown_booking() {
        let pool = setup_test_db();

        let result = record_payment_handler(
            State(pool.clone()),
            Path("nonexistent".to_string()),
            Json(CreatePaymentDto {
                amount_cents: 1_000,
                method: "cash".to_string(),
                note: None,
            }),
        ).await;

        assert!(matches!(result.unwrap_err(), ApiError::NotFound));
    }

    #[tokio::test]
    async fn test_get_bill_handler_settled_after_full_payment() {
        let pool = setup_test_db();
        let booking_id = seed_checked_in(&pool).await;

        let detail = checkout_handler(State(pool.clone()), Path(booking_id.clone()))
            .await.unwrap().0;
        let payment = record_payment_handler(
            State(pool.clone()),
            Path(booking_id),
            Json(CreatePaymentDto {
                amount_cents: 36_000,
                method: "card".to_string(),
                note: None,
            }),
        ).await.unwrap().0;
        assert_eq!(payment.get_amount_cents(), 36_000);

        let detail = get_bill_handler(State(pool.clone()), Path(detail.bill.get_id()))
            .await.unwrap().0;
        assert!(detail.bill.is_settled());
        assert_eq!(detail.balance_cents, 0);
    }

    #[tokio::test]
    async fn test_list_payments_handler_unknown_booking() {
        let pool = setup_test_db();

        let result = list_payments_handler(State(pool.clone()), Path("nonexistent".to_string())).await;

        assert!(matches!(result.unwrap_err(), ApiError::NotFound));
    }
}
