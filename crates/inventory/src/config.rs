//! Inventory configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::persistence::DEFAULT_DATA_FILE;

/// Threshold used by low-stock scans when none (or an invalid one) is given.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Settings an `Inventory` is created with.
///
/// Every field has a default, so a partial (or empty) JSON document
/// deserializes into a usable config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// File used by `load_default` / `save_default`.
    pub data_file: PathBuf,
    /// Default threshold for `low_items_default`.
    pub low_stock_threshold: i64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}
