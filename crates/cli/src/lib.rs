//! `stockroom` command-line driver.

pub mod demo;

use std::path::PathBuf;

use clap::Parser;

use stockroom_inventory::{DEFAULT_DATA_FILE, DEFAULT_LOW_STOCK_THRESHOLD, InventoryConfig};
use stockroom_observability::{LogFormat, ObservabilityConfig};

/// Track item stock, persist it to JSON and report low stock.
#[derive(Debug, Parser)]
#[command(name = "stockroom", version, long_about = None)]
pub struct Cli {
    /// Inventory data file to save to and load from
    #[arg(default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Items strictly below this quantity are reported as low
    #[arg(short, long, default_value_t = DEFAULT_LOW_STOCK_THRESHOLD, allow_negative_numbers = true)]
    pub threshold: i64,

    /// Log level directive (e.g. `info`, `warn`, `stockroom_inventory=debug`)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit diagnostics as JSON objects instead of text lines
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    pub fn inventory_config(&self) -> InventoryConfig {
        InventoryConfig {
            data_file: self.file.clone(),
            low_stock_threshold: self.threshold,
        }
    }

    pub fn observability_config(&self) -> ObservabilityConfig {
        ObservabilityConfig {
            level: self.log_level.clone(),
            format: if self.log_json {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
        }
    }
}
