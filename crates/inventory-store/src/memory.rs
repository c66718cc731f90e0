use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Clock, SystemClock};
use tokio::sync::RwLock;

use crate::{
    NewProduct, NewTransaction, NewUser, Product, ProductId, ProductPatch, Result, StoreError,
    Transaction, TransactionId, TransactionQuery, TransactionType, User, UserId,
    store::{EntityStore, StoreSnapshot},
};

/// Tables and identity counters guarded by one lock.
struct Tables {
    users: HashMap<UserId, User>,
    products: HashMap<ProductId, Product>,
    transactions: Vec<Transaction>,
    next_user_id: u64,
    next_product_id: u64,
    next_transaction_id: u64,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            products: HashMap::new(),
            transactions: Vec::new(),
            next_user_id: 1,
            next_product_id: 1,
            next_transaction_id: 1,
        }
    }
}

impl Tables {
    fn sku_holder(&self, sku: &str) -> Option<ProductId> {
        self.products
            .values()
            .find(|p| p.sku == sku)
            .map(|p| p.id)
    }

    /// Products ordered by name, case-insensitively, then by exact name and id.
    fn sorted_products(&self) -> Vec<Product> {
        let mut products: Vec<_> = self.products.values().cloned().collect();
        products.sort_by_cached_key(|p| (p.name.to_lowercase(), p.name.clone(), p.id));
        products
    }

    fn matching_transactions(&self, query: &TransactionQuery) -> Vec<Transaction> {
        let mut transactions: Vec<_> = self
            .transactions
            .iter()
            .filter(|t| {
                if let Some(id) = query.product_id
                    && t.product_id != id
                {
                    return false;
                }
                if let Some(kind) = query.transaction_type
                    && t.transaction_type != kind
                {
                    return false;
                }
                if let Some(from) = query.from_timestamp
                    && t.timestamp < from
                {
                    return false;
                }
                if let Some(to) = query.to_timestamp
                    && t.timestamp > to
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        newest_first(&mut transactions);

        if let Some(limit) = query.limit {
            transactions.truncate(limit);
        }
        transactions
    }

    fn insert_transaction(
        &mut self,
        new: NewTransaction,
        timestamp: DateTime<Utc>,
    ) -> Transaction {
        let id = TransactionId::new(self.next_transaction_id);
        self.next_transaction_id += 1;

        let transaction = Transaction {
            id,
            product_id: new.product_id,
            transaction_type: new.transaction_type,
            quantity: new.quantity,
            notes: new.notes,
            timestamp,
        };
        self.transactions.push(transaction.clone());
        transaction
    }
}

fn newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

/// In-memory entity store.
///
/// Every mutation runs under a single write lock, so readers never observe a
/// half-applied change. Cloning yields another handle to the same tables.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Creates a new empty store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates a new empty store stamped by `clock`.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            clock: Arc::new(clock),
        }
    }

    /// Returns the clock used to stamp new records.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Returns the total number of transactions logged.
    pub async fn transaction_count(&self) -> usize {
        self.tables.read().await.transactions.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        let id = UserId::new(tables.next_user_id);
        tables.next_user_id += 1;

        let user = User {
            id,
            username: user.username,
            password: user.password,
        };
        tables.users.insert(id, user.clone());
        tracing::debug!(user_id = %id, username = %user.username, "user created");
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.tables.read().await.sorted_products())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn get_product_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().find(|p| p.sku == sku).cloned())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let mut tables = self.tables.write().await;
        if tables.sku_holder(&product.sku).is_some() {
            return Err(StoreError::DuplicateSku(product.sku));
        }

        let id = ProductId::new(tables.next_product_id);
        tables.next_product_id += 1;

        let product = Product {
            id,
            name: product.name,
            sku: product.sku,
            category: product.category,
            current_stock: product.current_stock,
            created_at: self.clock.now(),
        };
        tables.products.insert(id, product.clone());
        tracing::debug!(product_id = %id, sku = %product.sku, "product created");
        Ok(product)
    }

    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Err(StoreError::ProductNotFound(id));
        }

        if let Some(ref sku) = patch.sku
            && let Some(holder) = tables.sku_holder(sku)
            && holder != id
        {
            return Err(StoreError::DuplicateSku(sku.clone()));
        }

        let product = tables
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound(id))?;
        patch.apply_to(product);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool> {
        let removed = self.tables.write().await.products.remove(&id).is_some();
        if removed {
            tracing::debug!(product_id = %id, "product deleted");
        }
        Ok(removed)
    }

    async fn product_count(&self) -> Result<usize> {
        Ok(self.tables.read().await.products.len())
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut transactions = self.tables.read().await.transactions.clone();
        newest_first(&mut transactions);
        Ok(transactions)
    }

    async fn list_transactions_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Transaction>> {
        self.query_transactions(TransactionQuery::for_product(product_id))
            .await
    }

    async fn query_transactions(&self, query: TransactionQuery) -> Result<Vec<Transaction>> {
        Ok(self.tables.read().await.matching_transactions(&query))
    }

    async fn snapshot(&self, query: TransactionQuery) -> Result<StoreSnapshot> {
        let tables = self.tables.read().await;
        Ok(StoreSnapshot {
            products: tables.sorted_products(),
            transactions: tables.matching_transactions(&query),
        })
    }

    async fn create_transaction(&self, transaction: NewTransaction) -> Result<Transaction> {
        let mut tables = self.tables.write().await;
        let timestamp = self.clock.now();
        Ok(tables.insert_transaction(transaction, timestamp))
    }

    async fn apply_movement(&self, transaction: NewTransaction) -> Result<Transaction> {
        let mut tables = self.tables.write().await;
        let timestamp = self.clock.now();

        let product = tables
            .products
            .get_mut(&transaction.product_id)
            .ok_or(StoreError::ProductNotFound(transaction.product_id))?;

        let stock_after = match transaction
            .transaction_type
            .apply(product.current_stock, transaction.quantity)
        {
            Some(stock) => stock,
            None if transaction.transaction_type == TransactionType::Out => {
                return Err(StoreError::InsufficientStock {
                    product_id: product.id,
                    requested: transaction.quantity,
                    available: product.current_stock,
                });
            }
            None => {
                return Err(StoreError::StockLimitExceeded {
                    product_id: product.id,
                    requested: transaction.quantity,
                    current: product.current_stock,
                });
            }
        };
        product.current_stock = stock_after;

        let transaction = tables.insert_transaction(transaction, timestamp);
        tracing::debug!(
            transaction_id = %transaction.id,
            product_id = %transaction.product_id,
            kind = %transaction.transaction_type,
            quantity = transaction.quantity,
            stock_after,
            "stock movement applied"
        );
        Ok(transaction)
    }
}
