use chrono::{DateTime, Utc};

use crate::{ProductId, TransactionType};

/// Builder for filtering the transaction log.
///
/// Results are always returned newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Filter by product.
    pub product_id: Option<ProductId>,

    /// Filter by movement direction.
    pub transaction_type: Option<TransactionType>,

    /// Only transactions at or after this instant.
    pub from_timestamp: Option<DateTime<Utc>>,

    /// Only transactions at or before this instant.
    pub to_timestamp: Option<DateTime<Utc>>,

    /// Maximum number of transactions to return.
    pub limit: Option<usize>,
}

impl TransactionQuery {
    /// Creates a query matching every transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for a single product.
    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Default::default()
        }
    }

    pub fn product_id(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn from_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.from_timestamp = Some(timestamp);
        self
    }

    pub fn to_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.to_timestamp = Some(timestamp);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
