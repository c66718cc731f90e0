//! Read-side queries for the inventory tracker.
//!
//! Nothing here mutates the store:
//! - [`ReportingService`] computes dashboard metrics, recent activity and low-stock lists
//! - [`TransactionWithProduct`] joins a transaction with its product at read time
//! - [`DayBoundary`] decides where "today" starts

pub mod day;
pub mod error;
pub mod service;
pub mod view;

pub use day::DayBoundary;
pub use error::{ReportingError, Result};
pub use service::{DEFAULT_RECENT_LIMIT, DashboardMetrics, ReportingService};
pub use view::{TransactionWithProduct, UNKNOWN_PRODUCT_NAME, UNKNOWN_PRODUCT_SKU};
