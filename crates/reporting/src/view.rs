//! Transactions joined with the product they reference.

use std::collections::HashMap;

use common::ProductId;
use inventory_store::{Product, Transaction};
use serde::Serialize;

/// Name reported for a transaction whose product has been deleted.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// SKU reported for a transaction whose product has been deleted.
pub const UNKNOWN_PRODUCT_SKU: &str = "Unknown SKU";

/// A transaction plus the name and SKU of its product at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithProduct {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub product_name: String,
    pub product_sku: String,
}

impl TransactionWithProduct {
    /// Joins `transaction` with `product`, falling back to the unknown
    /// sentinels when the product no longer exists.
    pub fn join(transaction: Transaction, product: Option<&Product>) -> Self {
        let (product_name, product_sku) = match product {
            Some(p) => (p.name.clone(), p.sku.clone()),
            None => (
                UNKNOWN_PRODUCT_NAME.to_string(),
                UNKNOWN_PRODUCT_SKU.to_string(),
            ),
        };
        Self {
            transaction,
            product_name,
            product_sku,
        }
    }
}

/// Joins every transaction against a snapshot of the catalog.
pub(crate) fn join_all(
    transactions: Vec<Transaction>,
    products: Vec<Product>,
) -> Vec<TransactionWithProduct> {
    let by_id: HashMap<ProductId, Product> = products.into_iter().map(|p| (p.id, p)).collect();
    transactions
        .into_iter()
        .map(|t| {
            let product = by_id.get(&t.product_id);
            TransactionWithProduct::join(t, product)
        })
        .collect()
}
