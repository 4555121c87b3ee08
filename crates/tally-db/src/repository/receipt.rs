//! # Receipt Repository
//!
//! Stores receipts with their line items and rehydrates them.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  receipts                          receipt_items                        │
//! │  ─────────                         ─────────────                        │
//! │  id (UUID) ◄───────────────────────receipt_id                           │
//! │  user_id                           position (0-based, input order)      │
//! │  payment_type  cash | card         name                                 │
//! │  tendered_amount (NULL for card)   unit_price                           │
//! │  total_amount, rest_amount         quantity                             │
//! │  created_at                        line_total                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rehydration
//! Loaded rows go back through [`LineItem::new`] and
//! [`Receipt::from_parts`], so line totals, the receipt total and the change
//! are recomputed with the same arithmetic that created them. The stored
//! `total_amount` / `rest_amount` / `line_total` columns are informational.
//!
//! Every amount and quantity column is exact decimal TEXT.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::{LineItem, Money, PaymentInfo, PaymentKind, Receipt, ReceiptFilter};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ReceiptRow {
    id: String,
    user_id: String,
    payment_type: String,
    tendered_amount: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    receipt_id: String,
    name: String,
    unit_price: String,
    quantity: String,
}

impl ReceiptRow {
    fn payment(&self) -> DbResult<PaymentInfo> {
        let kind = PaymentKind::from_str(&self.payment_type)
            .map_err(|other| DbError::corrupt("receipts", &self.id, format!("unknown payment type '{}'", other)))?;

        match (kind, &self.tendered_amount) {
            (PaymentKind::Cash, Some(raw)) => Ok(PaymentInfo::Cash {
                tendered: Money::new(parse_decimal("receipts", &self.id, "tendered_amount", raw)?),
            }),
            (PaymentKind::Cash, None) => Err(DbError::corrupt("receipts", &self.id, "cash receipt without tendered amount")),
            (PaymentKind::Card, _) => Ok(PaymentInfo::Card),
        }
    }

    fn into_receipt(self, items: Vec<LineItem>) -> DbResult<Receipt> {
        let payment = self.payment()?;
        let id = self.id.clone();
        Receipt::from_parts(self.id, self.user_id, items, payment, self.created_at)
            .map_err(|e| DbError::corrupt("receipts", &id, e.to_string()))
    }
}

impl ItemRow {
    fn into_line_item(self) -> DbResult<LineItem> {
        let unit_price = parse_decimal("receipt_items", &self.receipt_id, "unit_price", &self.unit_price)?;
        let quantity = parse_decimal("receipt_items", &self.receipt_id, "quantity", &self.quantity)?;

        LineItem::new(self.name, Money::new(unit_price), quantity)
            .map_err(|e| DbError::corrupt("receipt_items", &self.receipt_id, e.to_string()))
    }
}

fn parse_decimal(entity: &str, id: &str, column: &str, raw: &str) -> DbResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| DbError::corrupt(entity, id, format!("bad {} '{}': {}", column, raw, e)))
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for receipt database operations.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    /// Creates a new ReceiptRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Stores a receipt and its items atomically.
    ///
    /// ## Errors
    /// - `ForeignKeyViolation` if the owner does not exist
    /// - `UniqueViolation` if the receipt ID is already used
    pub async fn insert(&self, receipt: &Receipt) -> DbResult<()> {
        debug!(
            id = %receipt.id(),
            owner_id = %receipt.owner_id(),
            items = receipt.items().len(),
            total = %receipt.total(),
            "Inserting receipt"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO receipts (
                id, user_id, payment_type, tendered_amount,
                total_amount, rest_amount, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(receipt.id())
        .bind(receipt.owner_id())
        .bind(receipt.payment().kind().as_str())
        .bind(receipt.payment().tendered().map(|m| m.amount().to_string()))
        .bind(receipt.total().amount().to_string())
        .bind(receipt.rest().amount().to_string())
        .bind(receipt.created_at())
        .execute(&mut *tx)
        .await?;

        for (position, item) in receipt.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO receipt_items (
                    receipt_id, position, name,
                    unit_price, quantity, line_total
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(receipt.id())
            .bind(position as i64)
            .bind(item.name())
            .bind(item.unit_price().amount().to_string())
            .bind(item.quantity().to_string())
            .bind(item.line_total().amount().to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Loads one receipt by ID, regardless of owner.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Receipt>> {
        let row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT id, user_id, payment_type, tendered_amount, created_at
            FROM receipts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            debug!(id = %id, "Receipt not found");
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT receipt_id, name, unit_price, quantity
            FROM receipt_items
            WHERE receipt_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ItemRow::into_line_item)
        .collect::<DbResult<Vec<_>>>()?;

        row.into_receipt(items).map(Some)
    }

    /// Loads every receipt of one owner, oldest first (ties broken by ID).
    pub async fn list_by_owner(&self, owner_id: &str) -> DbResult<Vec<Receipt>> {
        let rows = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT id, user_id, payment_type, tendered_amount, created_at
            FROM receipts
            WHERE user_id = ?1
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let item_rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT i.receipt_id, i.name, i.unit_price, i.quantity
            FROM receipt_items i
            JOIN receipts r ON r.id = i.receipt_id
            WHERE r.user_id = ?1
            ORDER BY i.receipt_id, i.position
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_receipt: HashMap<String, Vec<LineItem>> = HashMap::with_capacity(rows.len());
        for item_row in item_rows {
            let receipt_id = item_row.receipt_id.clone();
            items_by_receipt
                .entry(receipt_id)
                .or_default()
                .push(item_row.into_line_item()?);
        }

        let mut receipts = rows
            .into_iter()
            .map(|row| {
                let items = items_by_receipt.remove(&row.id).unwrap_or_default();
                row.into_receipt(items)
            })
            .collect::<DbResult<Vec<_>>>()?;

        // TEXT timestamps have variable sub-second precision
        receipts.sort_by(|a, b| (a.created_at(), a.id()).cmp(&(b.created_at(), b.id())));

        debug!(owner_id = %owner_id, count = receipts.len(), "Loaded receipts");
        Ok(receipts)
    }

    /// Loads an owner's receipts and keeps those matching `filter`.
    pub async fn list_filtered(&self, owner_id: &str, filter: &ReceiptFilter) -> DbResult<Vec<Receipt>> {
        let receipts = self.list_by_owner(owner_id).await?;
        Ok(filter.apply(receipts))
    }

    /// Counts an owner's receipts.
    pub async fn count_by_owner(&self, owner_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts WHERE user_id = ?1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
