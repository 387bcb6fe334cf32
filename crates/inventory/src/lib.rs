//! Inventory domain module.
//!
//! An in-memory stock store keyed by item name, with JSON file persistence
//! and low-stock reporting. Every operation comes in two forms: a `try_*`
//! method returning an explicit outcome, and a plain method that logs the
//! outcome as a diagnostic and never fails.

pub mod config;
pub mod input;
pub mod item;
pub mod persistence;
pub mod report;
pub mod store;

pub use config::{DEFAULT_LOW_STOCK_THRESHOLD, InventoryConfig};
pub use item::{Amount, ItemName};
pub use persistence::{DEFAULT_DATA_FILE, PersistenceError, PersistenceResult};
pub use store::{Added, Inventory, Removed};
