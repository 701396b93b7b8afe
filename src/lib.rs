//! SpendSmart backend library.
//!
//! Personal-finance tracking backend: user registration/login and CRUD over
//! per-user financial transactions, backed by a managed key-value item
//! store.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: a key-value item store behind the `store::StoreClient`
//!   capability trait (two tables: `Users` and `Transactions`, with a
//!   denormalized transaction mirror embedded in each user record)
//! - **Authentication**: bcrypt password digests
//! - **Format**: JSON requests/responses in a `{success, message, ...}`
//!   envelope

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

use axum::{
    Router,
    http::Method,
    routing::{get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Build the HTTP router over the given application state.
///
/// Route shapes match what the browser client expects: identity under
/// `/api/auth`, the ledger under `/api/v1`.
pub fn app(state: AppState) -> Router {
    // The API fronts a browser single-page app, so CORS is open for the
    // methods the routes use.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Identity routes
        .route("/api/auth/register", post(handlers::users::register))
        .route("/api/auth/login", post(handlers::users::login))
        .route("/api/auth/setAvatar/{id}", post(handlers::users::set_avatar))
        .route("/api/auth/allUsers/{id}", get(handlers::users::all_users))
        // Ledger routes
        .route(
            "/api/v1/addTransaction",
            post(handlers::transactions::add_transaction),
        )
        .route(
            "/api/v1/getTransaction",
            post(handlers::transactions::get_transactions),
        )
        .route(
            "/api/v1/deleteTransaction/{id}",
            post(handlers::transactions::delete_transaction),
        )
        .route(
            "/api/v1/updateTransaction/{id}",
            put(handlers::transactions::update_transaction),
        )
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
