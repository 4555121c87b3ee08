//! # Receipt Aggregator
//!
//! Builds a [`Receipt`] from raw line-item specifications and a payment
//! specification, computing every derived amount in one step.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Receipt Aggregation                               │
//! │                                                                         │
//! │  PaymentSpec { type, amount? }                                         │
//! │       │                                                                 │
//! │       ├── "cash" + amount ──► PaymentInfo::Cash { tendered }           │
//! │       ├── "card"          ──► PaymentInfo::Card                        │
//! │       └── anything else   ──► CoreError::InvalidPayment                │
//! │                                                                         │
//! │  [LineItemSpec { name, price, quantity }, ...]                         │
//! │       │                                                                 │
//! │       ▼  (input order kept)                                            │
//! │  LineItem { line_total = price × quantity }                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Receipt { total = Σ line_total, rest = change_for(total),             │
//! │            id = UUID v4, created_at = now }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Range checks on price and quantity belong to [`crate::validation`] and
//! run at the API boundary; they are not repeated here. An empty item list
//! is accepted and yields a zero total.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LineItem, PaymentInfo, PaymentKind, Receipt};

// =============================================================================
// Input Specifications
// =============================================================================

/// A requested product line, as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemSpec {
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    pub quantity: Decimal,
}

impl LineItemSpec {
    pub fn new(name: impl Into<String>, unit_price: Decimal, quantity: Decimal) -> Self {
        LineItemSpec {
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Converts the requested line into a [`LineItem`]. The price is kept
    /// exactly as sent.
    ///
    /// ## Errors
    /// - `AmountOverflow` if `price × quantity` does not fit
    pub fn to_line_item(&self) -> CoreResult<LineItem> {
        LineItem::new(self.name.clone(), Money::new(self.unit_price), self.quantity)
    }
}

/// A requested payment, as received from the caller.
///
/// `kind` stays a plain string here so that unknown tags reach
/// [`PaymentSpec::to_payment_info`] and surface as `InvalidPayment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl PaymentSpec {
    pub fn new(kind: impl Into<String>, amount: Option<Decimal>) -> Self {
        PaymentSpec {
            kind: kind.into(),
            amount,
        }
    }

    /// Cash payment with the amount handed over.
    pub fn cash(amount: Decimal) -> Self {
        PaymentSpec::new(PaymentKind::Cash.as_str(), Some(amount))
    }

    /// Card payment.
    pub fn card() -> Self {
        PaymentSpec::new(PaymentKind::Card.as_str(), None)
    }

    /// Resolves the loose request into a typed [`PaymentInfo`].
    ///
    /// ## Errors
    /// - `InvalidPayment` if the type is not exactly `"cash"` or `"card"`
    /// - `InvalidPayment` if a cash payment has no amount
    ///
    /// An amount sent with a card payment is ignored.
    pub fn to_payment_info(&self) -> CoreResult<PaymentInfo> {
        let kind: PaymentKind = self
            .kind
            .parse()
            .map_err(|other| CoreError::invalid_payment(format!("unknown payment type '{}'", other)))?;

        match kind {
            PaymentKind::Cash => {
                let amount = self
                    .amount
                    .ok_or_else(|| CoreError::invalid_payment("cash payment requires an amount"))?;
                Ok(PaymentInfo::Cash {
                    tendered: Money::new(amount),
                })
            }
            PaymentKind::Card => Ok(PaymentInfo::Card),
        }
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds a new receipt with a fresh UUID and the current server time.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::aggregator::{aggregate_receipt, LineItemSpec, PaymentSpec};
/// use tally_core::Money;
///
/// let items = [LineItemSpec::new("bread", Decimal::new(250, 2), Decimal::from(2))];
/// let receipt = aggregate_receipt("user-1", &items, &PaymentSpec::card()).unwrap();
/// assert_eq!(receipt.total(), Money::from_cents(500));
/// assert!(receipt.rest().is_zero());
/// ```
pub fn aggregate_receipt(owner_id: &str, items: &[LineItemSpec], payment: &PaymentSpec) -> CoreResult<Receipt> {
    assemble_receipt(Uuid::new_v4().to_string(), owner_id, items, payment, Utc::now())
}

/// Builds a receipt with an explicit identifier and creation time.
///
/// Deterministic counterpart of [`aggregate_receipt`]; the seed tool uses it
/// to backdate demo receipts.
pub fn assemble_receipt(
    id: impl Into<String>,
    owner_id: &str,
    items: &[LineItemSpec],
    payment: &PaymentSpec,
    created_at: DateTime<Utc>,
) -> CoreResult<Receipt> {
    let payment = payment.to_payment_info()?;

    let items = items
        .iter()
        .map(LineItemSpec::to_line_item)
        .collect::<CoreResult<Vec<_>>>()?;

    Receipt::from_parts(id, owner_id, items, payment, created_at)
}

// =============================================================================
// Unit Tests
// =============================================================================
