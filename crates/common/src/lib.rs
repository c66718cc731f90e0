//! Shared types for the inventory tracker.
//!
//! - Integer identity newtypes for users, products and transactions
//! - [`Clock`] abstraction so timestamps can be controlled in tests

pub mod clock;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use types::{ProductId, TransactionId, UserId};
