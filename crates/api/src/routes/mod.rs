pub mod auth;
pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod products;
pub mod transactions;
