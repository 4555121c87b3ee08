//! Request and response bodies.
//!
//! Amounts travel as JSON numbers (e.g. `6.75`). Inbound numbers are parsed
//! into `Decimal` exactly; outbound values are converted from cents.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_core::{LineItem, LineItemSpec, Money, PaymentInfo, PaymentSpec, Receipt, ReceiptFilter, ValidationError};
use tally_db::UserRecord;

// =============================================================================
// Auth
// =============================================================================

/// `POST /register` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// `POST /token` form (OAuth2 password flow field names).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
}

impl From<UserRecord> for UserView {
    fn from(user: UserRecord) -> Self {
        UserView {
            id: user.id,
            username: user.username,
        }
    }
}

/// `POST /token` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

// =============================================================================
// Receipts
// =============================================================================

/// `POST /create_receipt` body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReceiptRequest {
    #[serde(default)]
    pub products: Vec<LineItemSpec>,
    pub payment: PaymentSpec,
}

/// One product line as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl From<&LineItem> for ProductView {
    fn from(item: &LineItem) -> Self {
        ProductView {
            name: item.name().to_string(),
            price: item.unit_price().amount(),
            quantity: item.quantity().normalize(),
            total: item.line_total().amount(),
        }
    }
}

/// Payment as returned to clients; `amount` is omitted for card payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentView {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
}

impl From<&PaymentInfo> for PaymentView {
    fn from(payment: &PaymentInfo) -> Self {
        PaymentView {
            kind: payment.kind().as_str().to_string(),
            amount: payment.tendered().map(|m| m.amount()),
        }
    }
}

/// A receipt as returned by create and list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptView {
    pub id: String,
    pub products: Vec<ProductView>,
    pub payment: PaymentView,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rest: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<&Receipt> for ReceiptView {
    fn from(receipt: &Receipt) -> Self {
        ReceiptView {
            id: receipt.id().to_string(),
            products: receipt.items().iter().map(ProductView::from).collect(),
            payment: PaymentView::from(receipt.payment()),
            total: receipt.total().amount(),
            rest: receipt.rest().amount(),
            created_at: receipt.created_at(),
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

/// `GET /receipts` query string. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceiptListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_total_amount: Option<Decimal>,
    pub payment_type: Option<String>,
}

impl ReceiptListQuery {
    /// Converts the query string into a core filter.
    pub fn to_filter(&self) -> Result<ReceiptFilter, ValidationError> {
        let mut filter = ReceiptFilter::new();

        if let Some(raw) = &self.start_date {
            filter = filter.start_date(parse_query_datetime("start_date", raw, false)?);
        }
        if let Some(raw) = &self.end_date {
            filter = filter.end_date(parse_query_datetime("end_date", raw, true)?);
        }
        if let Some(amount) = self.min_total_amount {
            // Compared exactly: 6.745 excludes a 6.74 total
            filter = filter.min_total(Money::new(amount));
        }
        if let Some(kind) = &self.payment_type {
            filter = filter.payment_type(kind.clone());
        }

        Ok(filter)
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (taken as UTC), or a
/// bare date. A bare date means the start of that day, or its last instant
/// when used as an upper bound.
fn parse_query_datetime(field: &str, raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected an ISO 8601 date or date-time".to_string(),
    };

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    let naive = if end_of_day {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    naive.map(|n| n.and_utc()).ok_or_else(invalid)
}

/// `GET /receipts/{id}/view` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderQuery {
    pub chars: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tally_core::aggregator::assemble_receipt;

    #[test]
    fn test_receipt_view_json_shape() {
        let at = Utc.with_ymd_and_hms(2024, 2, 19, 12, 30, 0).unwrap();
        let items = [
            LineItemSpec::new("bread", Decimal::new(250, 2), Decimal::from(2)),
            LineItemSpec::new("milk", Decimal::new(175, 2), Decimal::ONE),
        ];
        let receipt = assemble_receipt("r-1", "u-1", &items, &PaymentSpec::cash(Decimal::from(10)), at).unwrap();

        let json = serde_json::to_value(ReceiptView::from(&receipt)).unwrap();

        assert_eq!(json["total"], serde_json::json!(6.75));
        assert_eq!(json["rest"], serde_json::json!(3.25));
        assert_eq!(json["payment"], serde_json::json!({ "type": "cash", "amount": 10.0 }));
        assert_eq!(json["products"][0]["price"], serde_json::json!(2.5));
        assert_eq!(json["products"][0]["quantity"], serde_json::json!(2.0));
        assert_eq!(json["products"][0]["total"], serde_json::json!(5.0));
    }

    #[test]
    fn test_card_payment_view_has_no_amount() {
        let json = serde_json::to_value(PaymentView::from(&PaymentInfo::Card)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "card" }));
    }

    #[test]
    fn test_query_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        assert_eq!(parse_query_datetime("d", "2024-03-01T09:30:00Z", false).unwrap(), expected);
        assert_eq!(parse_query_datetime("d", "2024-03-01T11:30:00+02:00", false).unwrap(), expected);
        assert_eq!(parse_query_datetime("d", "2024-03-01T09:30:00", false).unwrap(), expected);
        assert_eq!(
            parse_query_datetime("d", "2024-03-01", false).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
        assert!(parse_query_datetime("d", "2024-03-01", true).unwrap() > Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap());
        assert!(parse_query_datetime("d", "yesterday", false).is_err());
    }

    #[test]
    fn test_list_query_to_filter() {
        let query = ReceiptListQuery {
            start_date: Some("2024-03-01".to_string()),
            end_date: None,
            min_total_amount: Some(Decimal::new(1050, 2)),
            payment_type: Some("cash".to_string()),
        };

        let filter = query.to_filter().unwrap();
        assert_eq!(filter.min_total, Some(Money::from_cents(1050)));
        assert_eq!(filter.payment_type.as_deref(), Some("cash"));
        assert!(filter.end_date.is_none());

        assert!(ReceiptListQuery::default().to_filter().unwrap().is_empty());
    }

    #[test]
    fn test_min_total_amount_is_not_rounded() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let items = [LineItemSpec::new("item", Decimal::new(674, 2), Decimal::ONE)];
        let receipt = assemble_receipt("r-1", "u-1", &items, &PaymentSpec::card(), at).unwrap();

        let query = ReceiptListQuery {
            min_total_amount: Some(Decimal::new(6745, 3)),
            ..ReceiptListQuery::default()
        };
        let filter = query.to_filter().unwrap();

        assert_eq!(filter.min_total, Some(Money::new(Decimal::new(6745, 3))));
        assert!(!filter.matches(&receipt));
    }

    #[test]
    fn test_views_carry_exact_amounts() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let items = [LineItemSpec::new("screw", Decimal::new(5, 3), Decimal::from(3))];
        let receipt = assemble_receipt("r-1", "u-1", &items, &PaymentSpec::card(), at).unwrap();

        let json = serde_json::to_value(ReceiptView::from(&receipt)).unwrap();
        assert_eq!(json["products"][0]["price"], serde_json::json!(0.005));
        assert_eq!(json["total"], serde_json::json!(0.015));
    }
}
