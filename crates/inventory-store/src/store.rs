use async_trait::async_trait;

use crate::{
    NewProduct, NewTransaction, NewUser, Product, ProductId, ProductPatch, Result, StoreError,
    Transaction, TransactionQuery, User, UserId,
};

/// Products and transactions read together from one consistent state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// All products, in [`EntityStore::list_products`] order.
    pub products: Vec<Product>,
    /// Matching transactions, newest first.
    pub transactions: Vec<Transaction>,
}

/// Core trait for entity store implementations.
///
/// A store owns users, products and the transaction log, allocates their
/// identities, and enforces the invariants that must hold no matter who
/// calls it: SKUs are unique across live products and stock never goes
/// negative. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Inserts a user with the next user id. Usernames are not checked.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Lists all products ordered by name ascending.
    async fn list_products(&self) -> Result<Vec<Product>>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>>;

    /// Finds the product holding `sku`, if any.
    async fn get_product_by_sku(&self, sku: &str) -> Result<Option<Product>>;

    /// Inserts a product with the next product id and the current time.
    ///
    /// Fails with `DuplicateSku` if any product already holds the SKU.
    async fn create_product(&self, product: NewProduct) -> Result<Product>;

    /// Merges `patch` onto an existing product.
    ///
    /// Fails with `ProductNotFound` if the id is absent, or `DuplicateSku` if
    /// the new SKU belongs to a different product.
    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product>;

    /// Removes a product. Its transactions are kept.
    ///
    /// Returns whether a product was removed.
    async fn delete_product(&self, id: ProductId) -> Result<bool>;

    /// Returns the number of live products.
    async fn product_count(&self) -> Result<usize>;

    /// Lists every transaction, newest first.
    async fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// Lists the transactions of one product, newest first.
    async fn list_transactions_by_product(&self, product_id: ProductId)
    -> Result<Vec<Transaction>>;

    /// Retrieves transactions matching a query, newest first.
    async fn query_transactions(&self, query: TransactionQuery) -> Result<Vec<Transaction>>;

    /// Reads all products and the transactions matching `query` as of one
    /// instant, so no movement can land between the two reads.
    async fn snapshot(&self, query: TransactionQuery) -> Result<StoreSnapshot>;

    /// Appends a transaction to the log without touching product stock.
    async fn create_transaction(&self, transaction: NewTransaction) -> Result<Transaction>;

    /// Appends a transaction and applies it to its product's stock as one
    /// atomic step.
    ///
    /// Fails with `ProductNotFound` if the product is absent,
    /// `InsufficientStock` if a stock-out exceeds the current level, or
    /// `StockLimitExceeded` if a stock-in would overflow it. On failure
    /// neither the log nor the product is modified.
    async fn apply_movement(&self, transaction: NewTransaction) -> Result<Transaction>;
}

/// Extension trait providing convenience methods for entity stores.
#[async_trait]
pub trait EntityStoreExt: EntityStore {
    /// Loads a product, failing with `ProductNotFound` if it is absent.
    async fn require_product(&self, id: ProductId) -> Result<Product> {
        self.get_product(id)
            .await?
            .ok_or(StoreError::ProductNotFound(id))
    }
}

// Blanket implementation for all EntityStore implementations
impl<T: EntityStore + ?Sized> EntityStoreExt for T {}
