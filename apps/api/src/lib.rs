//! # Tally API
//!
//! HTTP service for recording receipts and reading them back.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally API                                      │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────────┐  ┌────────────────────────┐│
//! │  │  routes::auth  │  │  routes::receipts  │  │  routes::health        ││
//! │  │                │  │                    │  │                        ││
//! │  │ • register     │  │ • create_receipt   │  │ • health               ││
//! │  │ • token        │  │ • list_receipts    │  │                        ││
//! │  │                │  │ • view_receipt     │  │                        ││
//! │  └────────────────┘  └────────────────────┘  └────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         AppState                                  │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │  Database    │  │  JwtManager  │  │  ReceiptLayout           ││  │
//! │  │  │  (tally-db)  │  │  HS256       │  │  vendor / closing line   ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]. Environment variables:
//! - `TALLY_CONFIG` - Optional TOML file with base values
//! - `TALLY_HOST` / `TALLY_PORT` - Bind address (default: 0.0.0.0:8000)
//! - `TALLY_DATABASE_PATH` - SQLite file (default: ./tally.db)
//! - `TALLY_JWT_SECRET` - Secret for token signing
//! - `TALLY_TOKEN_LIFETIME_SECS` - Access token lifetime (default: 1800)
//! - `TALLY_VENDOR_NAME` / `TALLY_CLOSING_LINE` - Rendered receipt text

use std::sync::Arc;

use axum::Router;
use tally_core::ReceiptLayout;
use tally_db::Database;

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod routes;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};

/// Shared application state, cloned into every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<auth::JwtManager>,
    pub layout: Arc<ReceiptLayout>,
}

impl AppState {
    /// Wires state from a connected database and the loaded configuration.
    pub fn new(db: Database, config: &ApiConfig) -> Self {
        AppState {
            db,
            jwt: Arc::new(auth::JwtManager::new(&config.jwt_secret, config.token_lifetime_secs)),
            layout: Arc::new(config.receipt_layout()),
        }
    }
}

/// Builds the full HTTP application.
pub fn build_app(state: AppState) -> Router {
    routes::router(state)
}
