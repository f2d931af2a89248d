/// Integration tests for rooms, availability, and the booking lifecycle
///
/// This file covers:
/// - Room creation and availability search over date ranges
/// - Booking creation with conflict detection
/// - Check-in and cancellation transitions

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn test_room_availability_over_date_range() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let r1 = create_room(&mut app, &token, "101", 12_000).await;
    let _r2 = create_room(&mut app, &token, "102", 12_000).await;
    let customer = create_customer(&mut app, &token, "Guest").await;

    create_booking(&mut app, &token, &customer, &r1, "2025-06-10", "2025-06-15").await;

    // Overlapping range: only 102 remains
    let (status, free) = send(
        &mut app,
        authed_get("/rooms/available?check_in=2025-06-12&check_out=2025-06-14", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(free.as_array().unwrap().len(), 1);
    assert_eq!(free[0]["number"], "102");

    // Back-to-back range starting on departure day: both free
    let (status, free) = send(
        &mut app,
        authed_get("/rooms/available?check_in=2025-06-15&check_out=2025-06-17", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(free.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_double_booking_conflicts() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let room = create_room(&mut app, &token, "101", 12_000).await;
    let customer = create_customer(&mut app, &token, "Guest").await;
    create_booking(&mut app, &token, &customer, &room, "2025-06-10", "2025-06-15").await;

    let (status, error) = send(
        &mut app,
        authed_post(
            "/bookings",
            &token,
            json!({
                "customer_id": customer,
                "rooms": [{ "room_id": room, "check_in": "2025-06-14", "check_out": "2025-06-16" }]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error["error"].as_str().unwrap().contains("already booked"));
}

#[tokio::test]
async fn test_multi_room_booking_is_atomic() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let r1 = create_room(&mut app, &token, "101", 12_000).await;
    let r2 = create_room(&mut app, &token, "102", 9_000).await;
    let customer = create_customer(&mut app, &token, "Guest").await;

    // Take room 102 first
    create_booking(&mut app, &token, &customer, &r2, "2025-06-10", "2025-06-12").await;

    // A two-room request including 102 must fail wholesale
    let (status, _) = send(
        &mut app,
        authed_post(
            "/bookings",
            &token,
            json!({
                "customer_id": customer,
                "rooms": [
                    { "room_id": r1, "check_in": "2025-06-10", "check_out": "2025-06-12" },
                    { "room_id": r2, "check_in": "2025-06-11", "check_out": "2025-06-13" }
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Room 101 was not reserved by the failed request
    let (status, free) = send(
        &mut app,
        authed_get("/rooms/available?check_in=2025-06-10&check_out=2025-06-12", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(free.as_array().unwrap().len(), 1);
    assert_eq!(free[0]["number"], "101");
}

#[tokio::test]
async fn test_booking_validation_errors() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;
    let customer = create_customer(&mut app, &token, "Guest").await;
    let room = create_room(&mut app, &token, "101", 12_000).await;

    // Empty room list
    let (status, _) = send(
        &mut app,
        authed_post("/bookings", &token, json!({ "customer_id": customer, "rooms": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Reversed dates
    let (status, _) = send(
        &mut app,
        authed_post(
            "/bookings",
            &token,
            json!({
                "customer_id": customer,
                "rooms": [{ "room_id": room, "check_in": "2025-06-15", "check_out": "2025-06-10" }]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown customer
    let (status, _) = send(
        &mut app,
        authed_post(
            "/bookings",
            &token,
            json!({
                "customer_id": "nonexistent",
                "rooms": [{ "room_id": room, "check_in": "2025-06-10", "check_out": "2025-06-12" }]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_check_in_and_cancel_transitions() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let room = create_room(&mut app, &token, "101", 12_000).await;
    let customer = create_customer(&mut app, &token, "Guest").await;
    let booking = create_booking(&mut app, &token, &customer, &room, "2025-06-10", "2025-06-12").await;

    let (status, checked_in) = send(
        &mut app,
        authed_post(&format!("/bookings/{}/check_in", booking), &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checked_in["status"], "checked_in");

    // Room flipped to occupied
    let (_, room_detail) = send(&mut app, authed_get(&format!("/rooms/{}", room), &token)).await;
    assert_eq!(room_detail["status"], "occupied");

    // Second check-in and cancellation are both conflicts now
    let (status, _) = send(
        &mut app,
        authed_post(&format!("/bookings/{}/check_in", booking), &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &mut app,
        authed_post(&format!("/bookings/{}/cancel", booking), &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancelled_booking_frees_the_dates() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let room = create_room(&mut app, &token, "101", 12_000).await;
    let customer = create_customer(&mut app, &token, "Guest").await;
    let booking = create_booking(&mut app, &token, &customer, &room, "2025-06-10", "2025-06-12").await;

    let (status, cancelled) = send(
        &mut app,
        authed_post(&format!("/bookings/{}/cancel", booking), &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    // The same dates can be booked again
    create_booking(&mut app, &token, &customer, &room, "2025-06-10", "2025-06-12").await;
}

#[tokio::test]
async fn test_booking_detail_includes_line_items() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let room = create_room(&mut app, &token, "101", 12_000).await;
    let customer = create_customer(&mut app, &token, "Guest").await;
    let booking = create_booking(&mut app, &token, &customer, &room, "2025-06-10", "2025-06-13").await;

    let (status, detail) = send(&mut app, authed_get(&format!("/bookings/{}", booking), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["booking"]["status"], "reserved");
    let rooms = detail["rooms"].as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["rate_cents"], 12_000); // Defaulted from the room
}

#[tokio::test]
async fn test_list_bookings_status_filter() {
    let (_pool, mut app) = create_test_app().await;
    let token = login(&mut app, "admin", "admin").await;

    let r1 = create_room(&mut app, &token, "101", 12_000).await;
    let r2 = create_room(&mut app, &token, "102", 12_000).await;
    let customer = create_customer(&mut app, &token, "Guest").await;

    let b1 = create_booking(&mut app, &token, &customer, &r1, "2025-06-10", "2025-06-12").await;
    create_booking(&mut app, &token, &customer, &r2, "2025-06-10", "2025-06-12").await;
    send(&mut app, authed_post(&format!("/bookings/{}/check_in", b1), &token, json!({}))).await;

    let (status, reserved) = send(&mut app, authed_get("/bookings?status=reserved", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reserved.as_array().unwrap().len(), 1);

    let (status, _) = send(&mut app, authed_get("/bookings?status=bogus", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
