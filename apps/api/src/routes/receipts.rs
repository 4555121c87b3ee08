//! Receipt endpoints.
//!
//! ```text
//! POST /create_receipt ─► validate ─► aggregate_receipt ─► insert ─► ReceiptView
//! GET  /receipts       ─► query → ReceiptFilter ─► list_filtered ─► [ReceiptView]
//! GET  /receipts/{id}/view?chars=N ─► get_by_id ─► render_receipt ─► text/plain
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::{debug, info};

use tally_core::validation::validate_receipt_request;
use tally_core::{aggregate_receipt, render_receipt, CoreError, RenderWidth, DEFAULT_RENDER_WIDTH};

use crate::auth::AuthUser;
use crate::dto::{CreateReceiptRequest, ReceiptListQuery, ReceiptView, RenderQuery};
use crate::error::ApiResult;
use crate::AppState;

/// `POST /create_receipt`
pub async fn create_receipt(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateReceiptRequest>, JsonRejection>,
) -> ApiResult<Json<ReceiptView>> {
    let Json(request) = payload?;

    validate_receipt_request(&request.products, &request.payment)?;
    let receipt = aggregate_receipt(&user.id, &request.products, &request.payment)?;

    state.db.receipts().insert(&receipt).await?;

    info!(
        receipt_id = %receipt.id(),
        user_id = %user.id,
        items = receipt.items().len(),
        total = %receipt.total(),
        payment = %receipt.payment().kind(),
        "Receipt created"
    );

    Ok(Json(ReceiptView::from(&receipt)))
}

/// `GET /receipts`
///
/// The caller's receipts, oldest first, narrowed by the optional query
/// parameters.
pub async fn list_receipts(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<ReceiptListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ReceiptView>>> {
    let Query(query) = query?;
    let filter = query.to_filter()?;

    let receipts = state.db.receipts().list_filtered(&user.id, &filter).await?;
    debug!(user_id = %user.id, count = receipts.len(), "Listed receipts");

    Ok(Json(receipts.iter().map(ReceiptView::from).collect()))
}

/// `GET /receipts/{id}/view`
///
/// Plain-text rendering. Public: the receipt ID acts as the share link.
pub async fn view_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<RenderQuery>, QueryRejection>,
) -> ApiResult<String> {
    let Query(query) = query?;
    let width = RenderWidth::new(query.chars.unwrap_or(DEFAULT_RENDER_WIDTH))?;

    let receipt = state
        .db
        .receipts()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| CoreError::ReceiptNotFound(id.clone()))?;

    Ok(render_receipt(&receipt, width, &state.layout))
}
