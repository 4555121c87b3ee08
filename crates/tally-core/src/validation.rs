//! # Validation Module
//!
//! Input validation for everything that crosses the HTTP boundary.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Shape and type checks                                             │
//! │  └── Malformed JSON rejected by the extractor                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Lengths, ranges, collection sizes                                 │
//! │  └── Runs once, before the aggregator                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (username)                                                 │
//! │  └── Foreign keys (receipt → user, item → receipt)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::validation::{validate_quantity, validate_username};
//!
//! validate_username("cashier").unwrap();
//! validate_quantity(Decimal::new(15, 1)).unwrap();
//! ```

use rust_decimal::Decimal;

use crate::aggregator::{LineItemSpec, PaymentSpec};
use crate::error::{ValidationError, ValidationResult};
use crate::{MAX_ITEM_QUANTITY, MAX_RECEIPT_ITEMS, MAX_UNIT_PRICE_CENTS};

const MAX_USERNAME_LEN: usize = 50;
const MIN_PASSWORD_LEN: usize = 4;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a username.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 50 characters
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LEN,
        });
    }

    Ok(())
}

/// Validates a password. Whitespace is significant and not trimmed.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_password;
///
/// assert!(validate_password("s3cret").is_ok());
/// assert!(validate_password("abc").is_err());
/// ```
pub fn validate_password(password: &str) -> ValidationResult<()> {
    let len = password.chars().count();

    if len < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    if len > MAX_PASSWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Line Item Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(Decimal::new(1099, 2)).is_ok()); // 10.99
/// assert!(validate_unit_price(Decimal::ZERO).is_ok());         // free item
/// assert!(validate_unit_price(Decimal::new(-1, 0)).is_err());
/// ```
pub fn validate_unit_price(price: Decimal) -> ValidationResult<()> {
    let max = Decimal::new(MAX_UNIT_PRICE_CENTS, 2);

    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    if price > max {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: "0".to_string(),
            max: max.to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity. Fractional quantities (weighed goods) are allowed.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(quantity: Decimal) -> ValidationResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > Decimal::from(MAX_ITEM_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: "0".to_string(),
            max: MAX_ITEM_QUANTITY.to_string(),
        });
    }

    Ok(())
}

/// Validates every field of a single requested line.
pub fn validate_line_item_spec(item: &LineItemSpec) -> ValidationResult<()> {
    validate_product_name(&item.name)?;
    validate_unit_price(item.unit_price)?;
    validate_quantity(item.quantity)
}

// =============================================================================
// Payment Validators
// =============================================================================

/// Validates a tendered amount. Zero is accepted; the change then comes out
/// negative.
pub fn validate_payment_amount(amount: Decimal) -> ValidationResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of lines on one receipt.
pub fn validate_item_count(count: usize) -> ValidationResult<()> {
    if count > MAX_RECEIPT_ITEMS {
        return Err(ValidationError::TooMany {
            field: "products".to_string(),
            max: MAX_RECEIPT_ITEMS,
        });
    }

    Ok(())
}

/// Validates a whole create-receipt request.
///
/// The payment type itself is checked by the aggregator, which reports
/// unknown tags as `InvalidPayment`.
pub fn validate_receipt_request(items: &[LineItemSpec], payment: &PaymentSpec) -> ValidationResult<()> {
    validate_item_count(items.len())?;

    for item in items {
        validate_line_item_spec(item)?;
    }

    if let Some(amount) = payment.amount {
        validate_payment_amount(amount)?;
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
