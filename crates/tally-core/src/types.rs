//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Receipt      │   │    LineItem     │   │  PaymentInfo    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  name           │   │  Cash{tendered} │       │
//! │  │  owner_id       │   │  unit_price     │   │  Card           │       │
//! │  │  items[]        │   │  quantity       │   └─────────────────┘       │
//! │  │  payment        │   │  line_total     │                             │
//! │  │  total, rest    │   └─────────────────┘   ┌─────────────────┐       │
//! │  │  created_at     │                         │  PaymentKind    │       │
//! │  └─────────────────┘                         │  cash | card    │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutability
//! A receipt and its line items are built once by the aggregator (or
//! rehydrated from storage through [`Receipt::from_parts`]) and never
//! mutated afterwards. Fields are private; totals are always derived.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Line Item
// =============================================================================

/// One product entry on a receipt.
///
/// `line_total` is computed exactly in [`LineItem::new`] and cannot be set
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    name: String,
    unit_price: Money,
    quantity: Decimal,
    line_total: Money,
}

impl LineItem {
    /// Creates a line item and derives `line_total = unit_price × quantity`.
    ///
    /// ## Errors
    /// - `AmountOverflow` if the product does not fit in a `Decimal`
    pub fn new(name: impl Into<String>, unit_price: Money, quantity: Decimal) -> CoreResult<Self> {
        let line_total = unit_price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| CoreError::overflow("line total"))?;

        Ok(LineItem {
            name: name.into(),
            unit_price,
            quantity,
            line_total,
        })
    }

    /// Display name of the product.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price of a single unit.
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Quantity sold (may be fractional).
    #[inline]
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.line_total
    }
}

// =============================================================================
// Payment
// =============================================================================

/// The payment type tag as stored and filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
}

impl PaymentKind {
    /// Wire/storage tag: `"cash"` or `"card"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Cash => "cash",
            PaymentKind::Card => "card",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentKind {
    type Err = String;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentKind::Cash),
            "card" => Ok(PaymentKind::Card),
            other => Err(other.to_string()),
        }
    }
}

/// How a receipt was paid.
///
/// Card payments carry no tendered amount, so no change is computed for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaymentInfo {
    /// Cash with the amount handed over by the customer.
    Cash { tendered: Money },
    /// Card, no tendered amount.
    Card,
}

impl PaymentInfo {
    /// Returns the payment type tag.
    pub const fn kind(&self) -> PaymentKind {
        match self {
            PaymentInfo::Cash { .. } => PaymentKind::Cash,
            PaymentInfo::Card => PaymentKind::Card,
        }
    }

    /// Tendered cash, `None` for card payments.
    pub const fn tendered(&self) -> Option<Money> {
        match self {
            PaymentInfo::Cash { tendered } => Some(*tendered),
            PaymentInfo::Card => None,
        }
    }

    /// Change due for a receipt with the given total.
    ///
    /// Cash: `tendered − total` (negative when the customer underpaid).
    /// Card: always zero.
    pub fn change_for(&self, total: Money) -> CoreResult<Money> {
        match self {
            PaymentInfo::Cash { tendered } => tendered
                .checked_sub(total)
                .ok_or_else(|| CoreError::overflow("change")),
            PaymentInfo::Card => Ok(Money::zero()),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A recorded purchase.
///
/// ## Invariants
/// - `total == Σ item.line_total`
/// - `rest == payment.change_for(total)`
///
/// Both are established in [`Receipt::from_parts`], the only constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    id: String,
    owner_id: String,
    items: Vec<LineItem>,
    payment: PaymentInfo,
    total: Money,
    rest: Money,
    created_at: DateTime<Utc>,
}

impl Receipt {
    /// Assembles a receipt from its parts, deriving `total` and `rest`.
    ///
    /// Used by the aggregator for new receipts and by storage when
    /// rehydrating saved ones, so both paths share the same arithmetic.
    /// Amounts are summed exactly; nothing is rounded here.
    ///
    /// ## Errors
    /// - `AmountOverflow` if the total or the change does not fit
    pub fn from_parts(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        items: Vec<LineItem>,
        payment: PaymentInfo,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let total = items.iter().try_fold(Money::zero(), |sum, item| {
            sum.checked_add(item.line_total())
                .ok_or_else(|| CoreError::overflow("total"))
        })?;
        let rest = payment.change_for(total)?;

        Ok(Receipt {
            id: id.into(),
            owner_id: owner_id.into(),
            items,
            payment,
            total,
            rest,
            created_at,
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier of the user who recorded the receipt.
    #[inline]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Line items in insertion order.
    #[inline]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[inline]
    pub fn payment(&self) -> &PaymentInfo {
        &self.payment
    }

    /// Sum of all line totals.
    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    /// Change due (cash) or zero (card).
    #[inline]
    pub fn rest(&self) -> Money {
        self.rest
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 19, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_line_item_total() {
        let item = LineItem::new("bread", Money::from_cents(250), Decimal::from(2)).unwrap();
        assert_eq!(item.name(), "bread");
        assert_eq!(item.unit_price(), Money::from_cents(250));
        assert_eq!(item.quantity(), Decimal::from(2));
        assert_eq!(item.line_total(), Money::from_cents(500));
    }

    #[test]
    fn test_line_item_total_is_exact() {
        // 0.005 × 0.5 = 0.0025, kept as is
        let item = LineItem::new("pin", Money::new(Decimal::new(5, 3)), Decimal::new(5, 1)).unwrap();
        assert_eq!(item.line_total().amount(), Decimal::new(25, 4));
    }

    #[test]
    fn test_line_item_overflow() {
        let err = LineItem::new("gold", Money::new(Decimal::MAX), Decimal::from(2)).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { .. }));
    }

    #[test]
    fn test_payment_kind_parse() {
        assert_eq!("cash".parse::<PaymentKind>(), Ok(PaymentKind::Cash));
        assert_eq!("card".parse::<PaymentKind>(), Ok(PaymentKind::Card));
        assert!("Cash".parse::<PaymentKind>().is_err());
        assert!("crypto".parse::<PaymentKind>().is_err());
        assert_eq!(PaymentKind::Card.to_string(), "card");
    }

    #[test]
    fn test_change_for() {
        let cash = PaymentInfo::Cash {
            tendered: Money::from_cents(1000),
        };
        assert_eq!(cash.change_for(Money::from_cents(675)).unwrap(), Money::from_cents(325));
        assert_eq!(cash.change_for(Money::from_cents(1200)).unwrap(), Money::from_cents(-200));
        assert_eq!(PaymentInfo::Card.change_for(Money::from_cents(675)).unwrap(), Money::zero());
    }

    #[test]
    fn test_receipt_from_parts_derives_totals() {
        let items = vec![
            LineItem::new("bread", Money::from_cents(250), Decimal::from(2)).unwrap(),
            LineItem::new("milk", Money::from_cents(175), Decimal::ONE).unwrap(),
        ];
        let receipt = Receipt::from_parts(
            "r-1",
            "u-1",
            items,
            PaymentInfo::Cash {
                tendered: Money::from_cents(1000),
            },
            at_noon(),
        )
        .unwrap();

        assert_eq!(receipt.total(), Money::from_cents(675));
        assert_eq!(receipt.rest(), Money::from_cents(325));
        assert_eq!(receipt.items()[0].name(), "bread");
        assert_eq!(receipt.items()[1].name(), "milk");
        assert_eq!(receipt.payment().kind(), PaymentKind::Cash);
        assert_eq!(receipt.created_at(), at_noon());
    }

    #[test]
    fn test_receipt_total_overflow() {
        let items = vec![
            LineItem::new("a", Money::new(Decimal::MAX), Decimal::ONE).unwrap(),
            LineItem::new("b", Money::new(Decimal::MAX), Decimal::ONE).unwrap(),
        ];
        let err = Receipt::from_parts("r-1", "u-1", items, PaymentInfo::Card, at_noon()).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { .. }));
    }

    #[test]
    fn test_payment_info_serde_tag() {
        let json = serde_json::to_value(PaymentInfo::Card).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "card" }));

        let cash: PaymentInfo =
            serde_json::from_value(serde_json::json!({ "type": "cash", "tendered": "5.00" })).unwrap();
        assert_eq!(cash.tendered(), Some(Money::from_cents(500)));
    }
}
