/// Integration tests for expenses and reporting
///
/// This file covers:
/// - Expense recording with vendor attribution
/// - The occupancy report over booked and free nights
/// - The revenue summary netting collections against expenses

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn test_expenses_with_vendor_and_date_filter() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let (status, vendor) = send(
        &mut app,
        authed_post("/vendors", &token, json!({ "name": "City Laundry", "phone": "555-0199" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let vendor_id = vendor["id"].as_str().unwrap();

    let (status, _) = send(
        &mut app,
        authed_post(
            "/expenses",
            &token,
            json!({ "vendor_id": vendor_id, "category": "laundry", "amount_cents": 4_500, "incurred_on": "2025-06-01" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &mut app,
        authed_post(
            "/expenses",
            &token,
            json!({ "category": "supplies", "amount_cents": 2_000, "incurred_on": "2025-07-01" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, june) = send(
        &mut app,
        authed_get("/expenses?from=2025-06-01&to=2025-06-30", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(june.as_array().unwrap().len(), 1);
    assert_eq!(june[0]["category"], "laundry");

    // Unknown vendor is a 404
    let (status, _) = send(
        &mut app,
        authed_post(
            "/expenses",
            &token,
            json!({ "vendor_id": "nonexistent", "category": "laundry", "amount_cents": 100, "incurred_on": "2025-06-01" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_occupancy_report_counts_booked_nights() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let r1 = create_room(&mut app, &token, "101", 12_000).await;
    let _r2 = create_room(&mut app, &token, "102", 12_000).await;
    let customer = create_customer(&mut app, &token, "Guest").await;
    create_booking(&mut app, &token, &customer, &r1, "2025-06-10", "2025-06-12").await;

    let (status, days) = send(
        &mut app,
        authed_get("/reports/occupancy?from=2025-06-10&to=2025-06-12", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["booked"], 1); // Jun 10
    assert_eq!(days[0]["available"], 1);
    assert_eq!(days[1]["booked"], 1); // Jun 11
    assert_eq!(days[2]["booked"], 0); // Jun 12 is the departure day
    assert_eq!(days[2]["available"], 2);
}

#[tokio::test]
async fn test_occupancy_never_double_counts_a_rebooked_room() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let room = create_room(&mut app, &token, "101", 12_000).await;
    let customer = create_customer(&mut app, &token, "Guest").await;

    // Check out of a Jun 10-15 stay, then resell the freed dates
    let booking = create_booking(&mut app, &token, &customer, &room, "2025-06-10", "2025-06-15").await;
    send(&mut app, authed_post(&format!("/bookings/{}/check_in", booking), &token, json!({}))).await;
    let (status, _) = send(
        &mut app,
        authed_post(&format!("/bookings/{}/checkout", booking), &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    create_booking(&mut app, &token, &customer, &room, "2025-06-12", "2025-06-14").await;

    let (status, days) = send(
        &mut app,
        authed_get("/reports/occupancy?from=2025-06-12&to=2025-06-12", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(days[0]["booked"], 1);
    assert_eq!(days[0]["available"], 0);
}

#[tokio::test]
async fn test_revenue_report_nets_collections_against_expenses() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let room = create_room(&mut app, &token, "101", 10_000).await;
    let customer = create_customer(&mut app, &token, "Guest").await;
    let booking = create_booking(&mut app, &token, &customer, &room, "2025-06-10", "2025-06-12").await;

    send(&mut app, authed_post(&format!("/bookings/{}/check_in", booking), &token, json!({}))).await;
    let (status, _) = send(
        &mut app,
        authed_post(&format!("/bookings/{}/checkout", booking), &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    send(
        &mut app,
        authed_post(
            &format!("/bookings/{}/payments", booking),
            &token,
            json!({ "amount_cents": 15_000, "method": "card" }),
        ),
    )
    .await;

    let today = chrono::Utc::now().date_naive();
    send(
        &mut app,
        authed_post(
            "/expenses",
            &token,
            json!({ "category": "supplies", "amount_cents": 3_000, "incurred_on": today.to_string() }),
        ),
    )
    .await;

    // Bills and payments land today regardless of the stay dates
    let (status, summary) = send(
        &mut app,
        authed_get(&format!("/reports/revenue?from={}&to={}", today, today), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["billed_cents"], 20_000);
    assert_eq!(summary["collected_cents"], 15_000);
    assert_eq!(summary["expense_cents"], 3_000);
    assert_eq!(summary["net_cents"], 12_000);
}

#[tokio::test]
async fn test_report_range_validation() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let (status, _) = send(
        &mut app,
        authed_get("/reports/occupancy?from=2025-06-10&to=2025-06-01", &token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &mut app,
        authed_get("/reports/revenue?from=2020-01-01&to=2025-01-01", &token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
