use thiserror::Error;

use crate::ProductId;

/// Errors raised when a store invariant would be violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No product with this id exists.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Another product already holds this SKU.
    #[error("SKU already exists: {0}")]
    DuplicateSku(String),

    /// A stock-out would drive the product below zero.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// A stock-in would push the product past the largest storable level.
    #[error(
        "Stock limit exceeded for product {product_id}: requested {requested}, current {current}"
    )]
    StockLimitExceeded {
        product_id: ProductId,
        requested: u32,
        current: u32,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
