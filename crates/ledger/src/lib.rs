//! Domain services for the inventory tracker.
//!
//! This crate provides:
//! - [`CatalogService`] for validated product create/update/delete and filtered listing
//! - [`LedgerService`] for recording stock movements against the entity store
//! - [`Authenticator`] as the pluggable login collaborator
//! - [`ValidationErrors`] carrying per-field issues back to callers

pub mod auth;
pub mod catalog;
pub mod error;
pub mod ledger;
pub mod validation;

pub use auth::{
    AuthenticatedUser, Authenticator, Credentials, PasswordAuthenticator, bootstrap_admin,
};
pub use catalog::{CatalogService, CreateProduct, ProductFilter, StockStatus, UpdateProduct};
pub use error::DomainError;
pub use ledger::{LedgerService, RecordTransaction};
pub use validation::{FieldIssue, ValidationErrors};
