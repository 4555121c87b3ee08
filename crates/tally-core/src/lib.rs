//! # tally-core: Pure Receipt Logic for Tally
//!
//! This crate is the **heart** of Tally. It contains all receipt rules
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api)                          │   │
//! │  │    /create_receipt   /receipts   /receipts/{id}/view            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │aggregator │  │  filter   │  │  render   │  │   │
//! │  │   │ LineItem  │  │  totals   │  │ predicates│  │ fixed-    │  │   │
//! │  │   │ Receipt   │  │  change   │  │           │  │ width text│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-db (SQLite)                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, PaymentInfo, Receipt)
//! - [`money`] - Money type with integer arithmetic
//! - [`aggregator`] - Builds receipts, computes total and change
//! - [`filter`] - Optional predicates over a collection of receipts
//! - [`render`] - Fixed-width plain-text receipt layout
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::aggregator::{aggregate_receipt, LineItemSpec, PaymentSpec};
//! use tally_core::Money;
//!
//! let items = vec![
//!     LineItemSpec::new("bread", Decimal::new(250, 2), Decimal::from(2)),
//!     LineItemSpec::new("milk", Decimal::new(175, 2), Decimal::ONE),
//! ];
//! let payment = PaymentSpec::cash(Decimal::from(10));
//!
//! let receipt = aggregate_receipt("user-1", &items, &payment).unwrap();
//! assert_eq!(receipt.total(), Money::from_cents(675));
//! assert_eq!(receipt.rest(), Money::from_cents(325));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregator;
pub mod error;
pub mod filter;
pub mod money;
pub mod render;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregator::{aggregate_receipt, LineItemSpec, PaymentSpec};
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::ReceiptFilter;
pub use money::Money;
pub use render::{render_receipt, ReceiptLayout, RenderWidth};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items accepted on a single receipt.
pub const MAX_RECEIPT_ITEMS: usize = 500;

/// Maximum unit price in cents (1 000 000.00).
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;

/// Maximum quantity of a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 100_000;

/// Narrowest allowed rendering width.
pub const MIN_RENDER_WIDTH: usize = 10;

/// Widest allowed rendering width.
pub const MAX_RENDER_WIDTH: usize = 200;

/// Width used when the caller does not ask for one.
pub const DEFAULT_RENDER_WIDTH: usize = 50;
