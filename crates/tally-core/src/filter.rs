//! # Receipt Filter
//!
//! Optional predicates over a collection of receipts belonging to one owner.
//!
//! Each predicate is independent; an absent predicate places no constraint
//! on its axis. The result is the input subsequence satisfying all supplied
//! predicates, in input order.
//!
//! ```text
//!   start_date  ≤ created_at ≤ end_date      (both inclusive)
//!   min_total   ≤ total                      (inclusive)
//!   payment_type == payment tag              (exact, case-sensitive)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Receipt;

/// Predicate set for listing receipts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub min_total: Option<Money>,
    /// Compared verbatim against `"cash"` / `"card"`; an unknown value simply
    /// matches nothing.
    pub payment_type: Option<String>,
}

impl ReceiptFilter {
    /// A filter with no predicates.
    pub fn new() -> Self {
        ReceiptFilter::default()
    }

    pub fn start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn min_total(mut self, min: Money) -> Self {
        self.min_total = Some(min);
        self
    }

    pub fn payment_type(mut self, kind: impl Into<String>) -> Self {
        self.payment_type = Some(kind.into());
        self
    }

    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.min_total.is_none()
            && self.payment_type.is_none()
    }

    /// Checks a single receipt against every supplied predicate.
    pub fn matches(&self, receipt: &Receipt) -> bool {
        let created_at = receipt.created_at();

        if self.start_date.is_some_and(|start| created_at < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| created_at > end) {
            return false;
        }
        if self.min_total.is_some_and(|min| receipt.total() < min) {
            return false;
        }
        if let Some(kind) = &self.payment_type {
            if receipt.payment().kind().as_str() != kind {
                return false;
            }
        }

        true
    }

    /// Returns the receipts that satisfy the filter, order preserved.
    pub fn apply(&self, receipts: Vec<Receipt>) -> Vec<Receipt> {
        if self.is_empty() {
            return receipts;
        }
        receipts.into_iter().filter(|r| self.matches(r)).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
