//! HTTP API server with observability for the inventory tracker.
//!
//! Provides REST endpoints for login, the product catalog, stock movements
//! and the dashboard, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use common::Clock;
use inventory_store::EntityStore;
use ledger::{CatalogService, LedgerService, PasswordAuthenticator};
use metrics_exporter_prometheus::PrometheusHandle;
use reporting::ReportingService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: EntityStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/auth/login", post(routes::auth::login::<S>))
        .route(
            "/api/products",
            get(routes::products::list::<S>).post(routes::products::create::<S>),
        )
        .route(
            "/api/products/{id}",
            get(routes::products::get::<S>)
                .put(routes::products::update::<S>)
                .delete(routes::products::delete::<S>),
        )
        .route(
            "/api/transactions",
            get(routes::transactions::list::<S>).post(routes::transactions::create::<S>),
        )
        .route("/api/dashboard/metrics", get(routes::dashboard::metrics::<S>))
        .route(
            "/api/dashboard/recent-transactions",
            get(routes::dashboard::recent_transactions::<S>),
        )
        .route(
            "/api/dashboard/low-stock",
            get(routes::dashboard::low_stock::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the catalog, ledger, reporting and login services over one store.
///
/// `clock` should be the clock the store stamps records with.
pub fn create_default_state<S: EntityStore + Clone + 'static>(
    store: S,
    clock: Arc<dyn Clock>,
    config: &Config,
) -> Arc<AppState<S>> {
    let reporting = ReportingService::new(store.clone(), clock)
        .with_day_boundary(config.day_boundary)
        .with_low_stock_threshold(config.low_stock_threshold);

    Arc::new(AppState {
        catalog: CatalogService::new(store.clone()),
        ledger: LedgerService::new(store.clone()),
        reporting,
        authenticator: Arc::new(PasswordAuthenticator::new(store)),
    })
}
