//! Read-only reporting over the entity store.

use std::sync::Arc;

use common::Clock;
use inventory_store::{
    DEFAULT_LOW_STOCK_THRESHOLD, EntityStore, Product, StoreSnapshot, TransactionQuery,
    TransactionType,
};
use serde::Serialize;

use crate::day::DayBoundary;
use crate::error::Result;
use crate::view::{TransactionWithProduct, join_all};

/// Number of transactions shown in the recent activity feed by default.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_products: usize,
    /// Units received since the start of the current day.
    pub stock_in_today: u64,
    /// Units shipped since the start of the current day.
    pub stock_out_today: u64,
    pub low_stock_items: usize,
}

/// Service answering dashboard and history queries.
pub struct ReportingService<S: EntityStore> {
    store: S,
    clock: Arc<dyn Clock>,
    day_boundary: DayBoundary,
    low_stock_threshold: u32,
}

impl<S: EntityStore> ReportingService<S> {
    /// Creates a service reading "now" from `clock`.
    ///
    /// Pass the same clock the store stamps records with so that "today"
    /// agrees with transaction timestamps.
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            day_boundary: DayBoundary::default(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    pub fn with_day_boundary(mut self, day_boundary: DayBoundary) -> Self {
        self.day_boundary = day_boundary;
        self
    }

    pub fn with_low_stock_threshold(mut self, threshold: u32) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    pub fn day_boundary(&self) -> DayBoundary {
        self.day_boundary
    }

    /// Threshold used by the dashboard and as the default for
    /// [`low_stock_products`](Self::low_stock_products) callers.
    pub fn low_stock_threshold(&self) -> u32 {
        self.low_stock_threshold
    }

    /// Computes the dashboard counters.
    ///
    /// "Today" runs from the start of the current calendar day, per the
    /// configured [`DayBoundary`], up to now inclusive.
    #[tracing::instrument(skip(self))]
    pub async fn dashboard_metrics(&self) -> Result<DashboardMetrics> {
        let now = self.clock.now();
        let start = self.day_boundary.start_of_day(now);

        let StoreSnapshot {
            products,
            transactions: today,
        } = self
            .store
            .snapshot(TransactionQuery::new().from_timestamp(start).to_timestamp(now))
            .await?;

        let (stock_in_today, stock_out_today) =
            today
                .iter()
                .fold((0u64, 0u64), |(inbound, outbound), t| match t.transaction_type {
                    TransactionType::In => (inbound + u64::from(t.quantity), outbound),
                    TransactionType::Out => (inbound, outbound + u64::from(t.quantity)),
                });

        let metrics = DashboardMetrics {
            total_products: products.len(),
            stock_in_today,
            stock_out_today,
            low_stock_items: products
                .iter()
                .filter(|p| p.is_low_stock(self.low_stock_threshold))
                .count(),
        };

        tracing::debug!(?metrics, since = %start, "dashboard metrics computed");
        Ok(metrics)
    }

    /// Returns the `limit` most recent transactions, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn recent_transactions(&self, limit: usize) -> Result<Vec<TransactionWithProduct>> {
        self.transactions(TransactionQuery::new().limit(limit)).await
    }

    /// Returns products with stock at or below `threshold`, lowest first.
    ///
    /// Ties are ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn low_stock_products(&self, threshold: u32) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self
            .store
            .list_products()
            .await?
            .into_iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect();

        // list_products is already ordered by name; the stable sort keeps that for ties.
        products.sort_by_key(|p| p.current_stock);
        Ok(products)
    }

    /// Returns transactions matching `query`, newest first, joined with
    /// their products as they exist now.
    #[tracing::instrument(skip(self))]
    pub async fn transactions(&self, query: TransactionQuery) -> Result<Vec<TransactionWithProduct>> {
        let StoreSnapshot {
            products,
            transactions,
        } = self.store.snapshot(query).await?;
        Ok(join_all(transactions, products))
    }
}
