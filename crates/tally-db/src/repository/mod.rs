//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.receipts().list_by_owner(&user_id)                         │
//! │       ▼                                                                 │
//! │  ReceiptRepository                                                     │
//! │  ├── insert(&self, receipt)                                            │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── list_by_owner(&self, owner_id)                                    │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories own a clone of the pool and are created per use through
//! [`crate::Database`].
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts and credentials
//! - [`ReceiptRepository`](receipt::ReceiptRepository) - Receipts and their line items

pub mod receipt;
pub mod user;
