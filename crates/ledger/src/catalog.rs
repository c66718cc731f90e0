//! Product catalog service.

use common::ProductId;
use inventory_store::{
    DEFAULT_LOW_STOCK_THRESHOLD, EntityStore, EntityStoreExt, NewProduct, Product, ProductPatch,
};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::validation::ValidationErrors;

const NAME_MAX_LEN: usize = 200;
const SKU_MAX_LEN: usize = 64;
const CATEGORY_MAX_LEN: usize = 100;

/// Request to add a product to the catalog.
///
/// `current_stock` is signed so that negative input can be reported as a
/// field issue instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateProduct {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub current_stock: i64,
}

impl CreateProduct {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        category: impl Into<String>,
        current_stock: i64,
    ) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            category: category.into(),
            current_stock,
        }
    }

    fn validate(self) -> Result<NewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = errors.text("name", "Name", &self.name, NAME_MAX_LEN);
        let sku = errors.text("sku", "SKU", &self.sku, SKU_MAX_LEN);
        let category = errors.text("category", "Category", &self.category, CATEGORY_MAX_LEN);
        let current_stock = errors.count("currentStock", "Current stock", self.current_stock, 0);
        errors.into_result()?;

        Ok(NewProduct {
            name,
            sku,
            category,
            current_stock,
        })
    }
}

/// Request to change some fields of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub current_stock: Option<i64>,
}

impl UpdateProduct {
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

    pub fn current_stock(mut self, current_stock: i64) -> Self {
        self.current_stock = Some(current_stock);
        self
    }

    fn validate(self) -> Result<ProductPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let patch = ProductPatch {
            name: self
                .name
                .map(|v| errors.text("name", "Name", &v, NAME_MAX_LEN)),
            sku: self.sku.map(|v| errors.text("sku", "SKU", &v, SKU_MAX_LEN)),
            category: self
                .category
                .map(|v| errors.text("category", "Category", &v, CATEGORY_MAX_LEN)),
            current_stock: self
                .current_stock
                .map(|v| errors.count("currentStock", "Current stock", v, 0)),
        };
        errors.into_result()?;
        Ok(patch)
    }
}

/// Stock band used by the catalog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    /// More than the low-stock threshold on hand.
    InStock,
    /// Between one unit and the low-stock threshold.
    LowStock,
    /// Nothing on hand.
    OutOfStock,
}

impl StockStatus {
    pub fn of(stock: u32) -> Self {
        match stock {
            0 => StockStatus::OutOfStock,
            s if s <= DEFAULT_LOW_STOCK_THRESHOLD => StockStatus::LowStock,
            _ => StockStatus::InStock,
        }
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-stock" => Ok(StockStatus::InStock),
            "low-stock" => Ok(StockStatus::LowStock),
            "out-of-stock" => Ok(StockStatus::OutOfStock),
            other => Err(format!(
                "unknown stock status '{other}' (expected in-stock, low-stock or out-of-stock)"
            )),
        }
    }
}

/// Catalog listing filter. Empty strings count as "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the name or SKU.
    pub search: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    pub stock_status: Option<StockStatus>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn stock_status(mut self, status: StockStatus) -> Self {
        self.stock_status = Some(status);
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !product.name.to_lowercase().contains(&needle)
                && !product.sku.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty())
            && product.category != category
        {
            return false;
        }
        if let Some(status) = self.stock_status
            && StockStatus::of(product.current_stock) != status
        {
            return false;
        }
        true
    }
}

/// Service for managing the product catalog.
///
/// SKU uniqueness is enforced by the store itself; this layer validates
/// input and translates store failures into [`DomainError`]s.
pub struct CatalogService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists products ordered by name, keeping those matching `filter`.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, DomainError> {
        let products = self.store.list_products().await?;
        Ok(products.into_iter().filter(|p| filter.matches(p)).collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, DomainError> {
        Ok(self.store.require_product(id).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_product(&self, cmd: CreateProduct) -> Result<Product, DomainError> {
        let new_product = cmd.validate()?;
        let product = self.store.create_product(new_product).await?;

        metrics::counter!("inventory_products_created_total").increment(1);
        tracing::info!(product_id = %product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        cmd: UpdateProduct,
    ) -> Result<Product, DomainError> {
        let patch = cmd.validate()?;
        let product = self.store.update_product(id, patch).await?;

        tracing::info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    /// Removes a product; its transactions stay in the log.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), DomainError> {
        if !self.store.delete_product(id).await? {
            return Err(DomainError::product_not_found(id));
        }

        metrics::counter!("inventory_products_deleted_total").increment(1);
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}
