//! Records held by the store and the inputs used to create them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ProductId, TransactionId, UserId};

/// Stock level at or below which a product counts as low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// A user account.
///
/// The password is kept in plain text and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Input for [`EntityStore::create_user`](crate::EntityStore::create_user).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A catalog product and its on-hand quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub current_stock: u32,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns true if the stock is at or below `threshold`.
    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.current_stock <= threshold
    }
}

/// Input for [`EntityStore::create_product`](crate::EntityStore::create_product).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub current_stock: u32,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        category: impl Into<String>,
        current_stock: u32,
    ) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            category: category.into(),
            current_stock,
        }
    }
}

/// Partial update of a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub current_stock: Option<u32>,
}

impl ProductPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn current_stock(mut self, current_stock: u32) -> Self {
        self.current_stock = Some(current_stock);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.category.is_none()
            && self.current_stock.is_none()
    }

    /// Merges the provided fields onto `product`.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(sku) = self.sku {
            product.sku = sku;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(current_stock) = self.current_stock {
            product.current_stock = current_stock;
        }
    }
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

impl TransactionType {
    /// Returns the wire name (`"IN"` or `"OUT"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
        }
    }

    /// Returns the stock level after moving `quantity` units, or `None` if
    /// the result would fall below zero or exceed `u32::MAX`.
    pub fn apply(&self, stock: u32, quantity: u32) -> Option<u32> {
        match self {
            TransactionType::In => stock.checked_add(quantity),
            TransactionType::Out => stock.checked_sub(quantity),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(TransactionType::In),
            "OUT" => Ok(TransactionType::Out),
            other => Err(format!("unknown transaction type '{other}' (expected IN or OUT)")),
        }
    }
}

/// An immutable entry in the stock movement log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub product_id: ProductId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub quantity: u32,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Input for creating a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub product_id: ProductId,
    pub transaction_type: TransactionType,
    pub quantity: u32,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn stock_in(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            transaction_type: TransactionType::In,
            quantity,
            notes: None,
        }
    }

    pub fn stock_out(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            transaction_type: TransactionType::Out,
            quantity,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
