//! Stock movement endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::ProductId;
use inventory_store::{EntityStore, Transaction, TransactionQuery, TransactionType};
use ledger::RecordTransaction;
use reporting::TransactionWithProduct;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

/// History filters. Every field is optional; `from` and `to` are inclusive
/// RFC 3339 instants.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListParams {
    pub product_id: Option<ProductId>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl From<TransactionListParams> for TransactionQuery {
    fn from(params: TransactionListParams) -> Self {
        TransactionQuery {
            product_id: params.product_id,
            transaction_type: params.transaction_type,
            from_timestamp: params.from,
            to_timestamp: params.to,
            limit: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub product_id: Option<ProductId>,
    #[serde(rename = "type", default)]
    pub transaction_type: String,
    #[serde(default)]
    pub quantity: i64,
    pub notes: Option<String>,
}

impl From<CreateTransactionRequest> for RecordTransaction {
    fn from(req: CreateTransactionRequest) -> Self {
        RecordTransaction {
            product_id: req.product_id,
            transaction_type: req.transaction_type,
            quantity: req.quantity,
            notes: req.notes,
        }
    }
}

// -- Handlers --

/// GET /api/transactions: newest first, joined with product name and SKU.
#[tracing::instrument(skip(state))]
pub async fn list<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<TransactionListParams>, QueryRejection>,
) -> Result<Json<Vec<TransactionWithProduct>>, ApiError> {
    let Query(params) = params?;
    let transactions = state.reporting.transactions(params.into()).await?;
    Ok(Json(transactions))
}

/// POST /api/transactions: records a movement and adjusts the product's stock.
#[tracing::instrument(skip_all)]
pub async fn create<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let Json(req) = payload?;
    let transaction = state.ledger.record_transaction(req.into()).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}
