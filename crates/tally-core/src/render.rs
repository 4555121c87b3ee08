//! # Receipt Text Renderer
//!
//! Formats a receipt as fixed-width plain text.
//!
//! ## Layout
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │      ФОП Джонсонюк Борис                     │  vendor
//! │================================              │
//! │СУМА                6.75                      │  total
//! │Картка              6.75                      │  total again (card slip)
//! │Решта                       3.25              │  change
//! │================================              │
//! │        19.02  12:30                          │  dd.mm  HH:MM (UTC)
//! │      Дякуємо за покупку!                     │  closing
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The template is fixed: line items are not listed. Every line is cut to
//! the requested width (no ellipsis) and right-padded with spaces to exactly
//! that width. Widths are counted in Unicode scalar values.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Receipt;
use crate::{DEFAULT_RENDER_WIDTH, MAX_RENDER_WIDTH, MIN_RENDER_WIDTH};

const SEPARATOR: &str = "================================";
const TOTAL_LABEL: &str = "СУМА                ";
const CARD_LABEL: &str = "Картка              ";
const CHANGE_LABEL: &str = "Решта                       ";
const HEADER_INDENT: &str = "      ";
const TIMESTAMP_INDENT: &str = "        ";

/// Number of lines every rendered receipt has: six text lines plus the two
/// `=` separators around the amounts.
pub const RENDERED_LINE_COUNT: usize = 8;

// =============================================================================
// Render Width
// =============================================================================

/// A line width within `MIN_RENDER_WIDTH..=MAX_RENDER_WIDTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct RenderWidth(usize);

impl RenderWidth {
    /// Validates the requested width.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::render::RenderWidth;
    ///
    /// assert!(RenderWidth::new(50).is_ok());
    /// assert!(RenderWidth::new(9).is_err());
    /// assert!(RenderWidth::new(201).is_err());
    /// ```
    pub fn new(chars: usize) -> CoreResult<Self> {
        if !(MIN_RENDER_WIDTH..=MAX_RENDER_WIDTH).contains(&chars) {
            return Err(CoreError::InvalidRenderWidth {
                requested: chars,
                min: MIN_RENDER_WIDTH,
                max: MAX_RENDER_WIDTH,
            });
        }
        Ok(RenderWidth(chars))
    }

    #[inline]
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl Default for RenderWidth {
    fn default() -> Self {
        RenderWidth(DEFAULT_RENDER_WIDTH)
    }
}

impl TryFrom<usize> for RenderWidth {
    type Error = CoreError;

    fn try_from(chars: usize) -> CoreResult<Self> {
        RenderWidth::new(chars)
    }
}

impl From<RenderWidth> for usize {
    fn from(width: RenderWidth) -> usize {
        width.0
    }
}

// =============================================================================
// Layout
// =============================================================================

/// The configurable text of the receipt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLayout {
    /// Printed in the header line.
    pub vendor_name: String,
    /// Printed as the last line.
    pub closing_line: String,
}

impl Default for ReceiptLayout {
    fn default() -> Self {
        ReceiptLayout {
            vendor_name: "ФОП Джонсонюк Борис".to_string(),
            closing_line: "Дякуємо за покупку!".to_string(),
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders a receipt into `RENDERED_LINE_COUNT` lines of exactly `width`
/// characters, joined by `\n`.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
/// use tally_core::aggregator::{assemble_receipt, PaymentSpec};
/// use tally_core::render::{render_receipt, ReceiptLayout, RenderWidth};
///
/// let at = Utc.with_ymd_and_hms(2024, 2, 19, 12, 30, 0).unwrap();
/// let receipt = assemble_receipt("r-1", "u-1", &[], &PaymentSpec::cash(Decimal::from(5)), at).unwrap();
///
/// let text = render_receipt(&receipt, RenderWidth::new(40).unwrap(), &ReceiptLayout::default());
/// assert!(text.lines().all(|line| line.chars().count() == 40));
/// ```
pub fn render_receipt(receipt: &Receipt, width: RenderWidth, layout: &ReceiptLayout) -> String {
    let created_at = receipt.created_at();

    let lines = [
        format!("{}{}", HEADER_INDENT, layout.vendor_name),
        SEPARATOR.to_string(),
        format!("{}{}", TOTAL_LABEL, receipt.total()),
        format!("{}{}", CARD_LABEL, receipt.total()),
        format!("{}{}", CHANGE_LABEL, receipt.rest()),
        SEPARATOR.to_string(),
        format!(
            "{indent}{:02}.{:02}  {:02}:{:02}{indent}",
            created_at.day(),
            created_at.month(),
            created_at.hour(),
            created_at.minute(),
            indent = TIMESTAMP_INDENT,
        ),
        format!("{}{}", HEADER_INDENT, layout.closing_line),
    ];

    lines
        .iter()
        .map(|line| fit_line(line, width.get()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cuts `line` to `width` characters, then pads it with spaces to `width`.
fn fit_line(line: &str, width: usize) -> String {
    let mut fitted: String = line.chars().take(width).collect();
    let len = fitted.chars().count();
    fitted.extend(std::iter::repeat(' ').take(width - len));
    fitted
}

// =============================================================================
// Unit Tests
// =============================================================================
