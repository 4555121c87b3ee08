//! HTTP routes.
//!
//! | Method | Path                   | Auth   |
//! |--------|------------------------|--------|
//! | POST   | `/register`            | none   |
//! | POST   | `/token`               | none   |
//! | POST   | `/create_receipt`      | bearer |
//! | GET    | `/receipts`            | bearer |
//! | GET    | `/receipts/{id}/view`  | none   |
//! | GET    | `/health`              | none   |

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod auth;
pub mod health;
pub mod receipts;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/token", post(auth::token))
        .route("/create_receipt", post(receipts::create_receipt))
        .route("/receipts", get(receipts::list_receipts))
        .route("/receipts/{id}/view", get(receipts::view_receipt))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
