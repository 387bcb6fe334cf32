//! The canonical walk-through: stock a few items, exercise every rejection
//! path, persist, reload and report.

use std::io::Write;

use serde_json::json;
use tracing::info;

use stockroom_inventory::Inventory;

/// Run the walk-through against `inventory`, writing console lines to `out`.
///
/// Saves to and reloads from the inventory's configured data file.
pub fn run<W: Write>(inventory: &mut Inventory, out: &mut W) -> anyhow::Result<()> {
    info!("Starting inventory system");

    inventory.add("apple", 10, None);
    inventory.add("banana", 5, None);
    // Rejected with warnings.
    inventory.add_value(&json!(123), &json!("ten"), None);
    inventory.add("orange", -2, None);

    inventory.remove("apple", 3);
    // Not stocked: logged as an error.
    inventory.remove("orange", 1);

    writeln!(out, "Apple stock: {}", inventory.quantity("apple"))?;
    writeln!(out, "Low items: {:?}", inventory.low_items_default())?;

    inventory.save_default();
    inventory.load_default();
    inventory.write_report(out)?;

    info!("Inventory system completed successfully");
    Ok(())
}
