//! Dashboard endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use inventory_store::{EntityStore, Product};
use reporting::{DEFAULT_RECENT_LIMIT, DashboardMetrics, TransactionWithProduct};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Raw dashboard query string. Values are parsed leniently: anything
/// missing, unparsable or zero falls back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub limit: Option<String>,
    pub threshold: Option<String>,
}

fn positive<T>(raw: Option<&str>) -> Option<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    raw.and_then(|s| s.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
}

/// GET /api/dashboard/metrics
#[tracing::instrument(skip(state))]
pub async fn metrics<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<DashboardMetrics>, ApiError> {
    let metrics = state.reporting.dashboard_metrics().await?;
    Ok(Json(metrics))
}

/// GET /api/dashboard/recent-transactions?limit=
#[tracing::instrument(skip(state))]
pub async fn recent_transactions<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<DashboardParams>, QueryRejection>,
) -> Result<Json<Vec<TransactionWithProduct>>, ApiError> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let limit = positive::<usize>(params.limit.as_deref()).unwrap_or(DEFAULT_RECENT_LIMIT);
    let transactions = state.reporting.recent_transactions(limit).await?;
    Ok(Json(transactions))
}

/// GET /api/dashboard/low-stock?threshold=
#[tracing::instrument(skip(state))]
pub async fn low_stock<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<DashboardParams>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let threshold = positive::<u32>(params.threshold.as_deref())
        .unwrap_or_else(|| state.reporting.low_stock_threshold());
    let products = state.reporting.low_stock_products(threshold).await?;
    Ok(Json(products))
}
