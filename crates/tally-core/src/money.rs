//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floating point:                                            │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  THE EARLY ROUNDING PROBLEM                                             │
//! │    0.005 per gram × 1000 g, rounded to cents first = 0.00  ❌ WRONG!    │
//! │                                                                         │
//! │  OUR SOLUTION: Exact base-10 decimals                                   │
//! │    Prices, line totals, sums and change stay exact                      │
//! │    Rounding to 2 places happens only when text is printed               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::money::Money;
//!
//! let price = Money::new(Decimal::new(5, 3)); // 0.005
//! let line = price.checked_mul_quantity(Decimal::from(1000)).unwrap();
//! assert_eq!(line, Money::from_cents(500));
//! assert_eq!(line.to_string(), "5.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fractional digits used when an amount is printed.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// An exact monetary amount.
///
/// ## Design Decisions
/// - **Decimal (signed)**: change can be negative when cash is short
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **Checked arithmetic**: overflow is reported, never clamped
/// - **Equality is numeric**: `5.000 == 5.00`
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  LineItem.unit_price × quantity ──► LineItem.line_total                 │
/// │                                          │                              │
/// │                                          ▼                              │
/// │                              Σ line_total ──► Receipt.total             │
/// │                                                   │                     │
/// │  PaymentInfo::Cash.tendered ──── minus ───────────┘                     │
/// │                                   │                                     │
/// │                                   ▼                                     │
/// │                              Receipt.rest (change)                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from whole cents.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, DISPLAY_DECIMAL_PLACES))
    }

    /// The exact amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded half-to-even to two places, for display.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    ///
    /// // 0.125 → 0.12, 0.135 → 0.14
    /// assert_eq!(Money::new(Decimal::new(125, 3)).rounded(), Decimal::new(12, 2));
    /// assert_eq!(Money::new(Decimal::new(135, 3)).rounded(), Decimal::new(14, 2));
    /// ```
    pub fn rounded(&self) -> Decimal {
        let mut rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }
        rounded.rescale(DISPLAY_DECIMAL_PLACES);
        rounded
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Adds two amounts, `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts `other`, `None` on overflow.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Multiplies a unit price by a (possibly fractional) quantity, exactly.
    ///
    /// Returns `None` when the product does not fit in a `Decimal`.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    ///
    /// // 3.99 per kg × 0.5 kg = 1.995 (printed as 2.00)
    /// let total = Money::from_cents(399).checked_mul_quantity(Decimal::new(5, 1)).unwrap();
    /// assert_eq!(total.amount(), Decimal::new(1995, 3));
    /// ```
    pub fn checked_mul_quantity(self, quantity: Decimal) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two-decimal rendering (`6.75`, `-1.50`, `0.00`), no currency sign.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rounded())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), Decimal::new(1099, 2));
        assert_eq!(Money::from_cents(500), Money::new(Decimal::from(5)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
        assert_eq!(Money::new(Decimal::from(5)).to_string(), "5.00");
    }

    #[test]
    fn test_display_rounds_half_even() {
        assert_eq!(Money::new(Decimal::new(125, 3)).to_string(), "0.12");
        assert_eq!(Money::new(Decimal::new(135, 3)).to_string(), "0.14");
        assert_eq!(Money::new(Decimal::new(1995, 3)).to_string(), "2.00");
        // No "-0.00"
        assert_eq!(Money::new(Decimal::new(-1, 3)).to_string(), "0.00");
    }

    #[test]
    fn test_sub_cent_amounts_stay_exact() {
        let price = Money::new(Decimal::new(5, 3)); // 0.005
        assert!(!price.is_zero());
        assert_eq!(price.amount(), Decimal::new(5, 3));

        let line = price.checked_mul_quantity(Decimal::new(5, 1)).unwrap();
        assert_eq!(line.amount(), Decimal::new(25, 4));
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(675);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1675)));
        assert_eq!(a.checked_sub(b), Some(Money::from_cents(325)));
        assert_eq!(b.checked_sub(a), Some(Money::from_cents(-325)));
        assert!(b.checked_sub(a).unwrap().is_negative());
    }

    #[test]
    fn test_checked_mul_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.checked_mul_quantity(Decimal::from(3)), Some(Money::from_cents(897)));
        assert_eq!(
            unit_price.checked_mul_quantity(Decimal::new(25, 2)),
            Some(Money::new(Decimal::new(7475, 4)))
        );
        assert_eq!(Money::zero().checked_mul_quantity(Decimal::from(7)), Some(Money::zero()));
    }

    #[test]
    fn test_overflow_is_reported() {
        let huge = Money::new(Decimal::MAX);
        assert_eq!(huge.checked_mul_quantity(Decimal::from(1000)), None);
        assert_eq!(huge.checked_add(Money::from_cents(100)), None);
        assert_eq!(Money::new(Decimal::MIN).checked_sub(Money::from_cents(100)), None);
    }
}
