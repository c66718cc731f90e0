//! Domain error types.

use common::ProductId;
use inventory_store::StoreError;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors that can occur during domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input was malformed or incomplete.
    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Another product already holds this SKU.
    #[error("SKU already exists: {0}")]
    DuplicateSku(String),

    /// A stock-out exceeds the product's current stock.
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

    /// Username unknown or password mismatch.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl DomainError {
    pub fn product_not_found(id: ProductId) -> Self {
        DomainError::NotFound {
            entity: "Product",
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ProductNotFound(id) => DomainError::product_not_found(id),
            StoreError::DuplicateSku(sku) => DomainError::DuplicateSku(sku),
            StoreError::InsufficientStock {
                product_id,
                requested,
                available,
            } => DomainError::InsufficientStock {
                product_id,
                requested,
                available,
            },
            StoreError::StockLimitExceeded {
                product_id,
                requested,
                current,
            } => DomainError::StockLimitExceeded {
                product_id,
                requested,
                current,
            },
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(e: ValidationErrors) -> Self {
        DomainError::Validation(e)
    }
}
