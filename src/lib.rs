/// Frontdesk: a hotel front-desk API server
///
/// This library provides the core functionality for running a small hotel's
/// front desk: room inventory, customer records, the booking lifecycle from
/// reservation through checkout and billing, payments, vendors and expenses,
/// and occupancy/revenue reporting.
///
/// ### Modules
///
/// - `config`: Layered configuration (defaults, config file, CLI/env)
/// - `db`: Database connection management
/// - `models`: Data structures stored in the database
/// - `repo`: Repository layer for database operations
/// - `handlers`: HTTP request handlers
/// - `dto`: Request/response body types
/// - `schema`: Database schema definitions
///
/// ### Web API
///
/// The library exposes a RESTful API using Axum. Apart from login, every
/// endpoint requires an `Authorization: Bearer <token>` header:
///
/// - `POST /auth/login`: Exchange credentials for a session token
/// - `POST /auth/logout`, `GET /auth/me`: Session management
/// - `POST /users`: Create a staff/admin account (admin only)
/// - `/rooms`, `/rooms/{id}`, `/rooms/available`: Room inventory
/// - `/customers`, `/vendors`: Guest and supplier records
/// - `/bookings` and its `check_in`/`cancel`/`checkout`/`payments` actions
/// - `/bills`, `/expenses`: Billing and bookkeeping
/// - `/reports/occupancy`, `/reports/revenue`: Reporting

pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repo;
pub mod schema;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use handlers::SessionTtl;

/// Creates the application router with all routes
///
/// Everything except `POST /auth/login` sits behind the session middleware.
///
/// ### Arguments
///
/// * `pool` - The database connection pool to be shared with all handlers
/// * `session_ttl` - How long tokens issued by the login endpoint stay valid
///
/// ### Returns
///
/// An Axum Router configured with all routes and the database pool as state
pub fn create_app(pool: Arc<db::DbPool>, session_ttl: chrono::Duration) -> Router {
    let protected = Router::new()
        // Session management for the logged-in user
        .route("/auth/logout", post(handlers::logout_handler))
        .route("/auth/me", get(handlers::me_handler))
        // Account management (admin only, enforced in the handler)
        .route("/users", post(handlers::create_user_handler))
        // Room inventory and availability search
        .route("/rooms", post(handlers::create_room_handler).get(handlers::list_rooms_handler))
        .route("/rooms/available", get(handlers::rooms_available_handler))
        .route("/rooms/{id}", get(handlers::get_room_handler).put(handlers::update_room_handler))
        // Guest records
        .route("/customers", post(handlers::create_customer_handler).get(handlers::list_customers_handler))
        .route("/customers/{id}", get(handlers::get_customer_handler).put(handlers::update_customer_handler))
        // Supplier records
        .route("/vendors", post(handlers::create_vendor_handler).get(handlers::list_vendors_handler))
        .route("/vendors/{id}", get(handlers::get_vendor_handler).put(handlers::update_vendor_handler))
        // Booking lifecycle
        .route("/bookings", post(handlers::create_booking_handler).get(handlers::list_bookings_handler))
        .route("/bookings/{id}", get(handlers::get_booking_handler))
        .route("/bookings/{id}/check_in", post(handlers::check_in_handler))
        .route("/bookings/{id}/cancel", post(handlers::cancel_booking_handler))
        .route("/bookings/{id}/checkout", post(handlers::checkout_handler))
        .route("/bookings/{id}/payments", post(handlers::record_payment_handler).get(handlers::list_payments_handler))
        // Billing and bookkeeping
        .route("/bills", get(handlers::list_bills_handler))
        .route("/bills/{id}", get(handlers::get_bill_handler))
        .route("/expenses", post(handlers::create_expense_handler).get(handlers::list_expenses_handler))
        // Reports
        .route("/reports/occupancy", get(handlers::occupancy_report_handler))
        .route("/reports/revenue", get(handlers::revenue_report_handler))
        .route_layer(middleware::from_fn_with_state(pool.clone(), handlers::require_session));

    Router::new()
        .route("/auth/login", post(handlers::login_handler))
        .merge(protected)
        .layer(Extension(SessionTtl(session_ttl)))
        .layer(CorsLayer::permissive())
        .with_state(pool)
}

/// Runs the embedded migrations
///
/// ### Panics
///
/// This function will panic if the migrations fail to run
pub fn run_migrations(conn: &mut diesel::SqliteConnection) {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
}
