//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::ProductId;
use inventory_store::{EntityStore, Product};
use ledger::{CreateProduct, ProductFilter, StockStatus, UpdateProduct};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub stock_status: Option<StockStatus>,
}

impl From<ProductListParams> for ProductFilter {
    fn from(params: ProductListParams) -> Self {
        ProductFilter {
            search: params.search,
            category: params.category,
            stock_status: params.stock_status,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub current_stock: i64,
}

impl From<CreateProductRequest> for CreateProduct {
    fn from(req: CreateProductRequest) -> Self {
        CreateProduct::new(req.name, req.sku, req.category, req.current_stock)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub current_stock: Option<i64>,
}

impl From<UpdateProductRequest> for UpdateProduct {
    fn from(req: UpdateProductRequest) -> Self {
        UpdateProduct {
            name: req.name,
            sku: req.sku,
            category: req.category,
            current_stock: req.current_stock,
        }
    }
}

// -- Handlers --

/// GET /api/products: all products ordered by name, optionally filtered.
#[tracing::instrument(skip(state))]
pub async fn list<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<ProductListParams>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(params) = params?;
    let products = state.catalog.list_products(params.into()).await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<ProductId>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let product = state.catalog.get_product(id).await?;
    Ok(Json(product))
}

/// POST /api/products
#[tracing::instrument(skip_all)]
pub async fn create<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(req) = payload?;
    let product = state.catalog.create_product(req.into()).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id}: changes only the fields present in the body.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<ProductId>, PathRejection>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let product = state.catalog.update_product(id, req.into()).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}: the product's transactions are kept.
#[tracing::instrument(skip(state))]
pub async fn delete<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<ProductId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.catalog.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
