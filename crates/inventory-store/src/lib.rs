pub mod entity;
pub mod error;
pub mod memory;
pub mod query;
pub mod store;

pub use common::{ProductId, TransactionId, UserId};
pub use entity::{
    DEFAULT_LOW_STOCK_THRESHOLD, NewProduct, NewTransaction, NewUser, Product, ProductPatch,
    Transaction, TransactionType, User,
};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use query::TransactionQuery;
pub use store::{EntityStore, EntityStoreExt, StoreSnapshot};
