use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use serde_json::Value;
use tracing::{error, info, warn};

use stockroom_core::{DomainError, DomainResult};

use crate::config::{DEFAULT_LOW_STOCK_THRESHOLD, InventoryConfig};
use crate::input;
use crate::item::{Amount, ItemName};
use crate::persistence::{self, PersistenceResult};
use crate::report;

const AUDIT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Outcome of a successful addition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    pub item: ItemName,
    pub quantity: i64,
    /// Quantity held after the addition (0 if no entry is held).
    pub total: i64,
    /// `"<timestamp>: Added <qty> of <item>"`.
    pub audit: String,
}

/// Outcome of a successful removal.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub item: String,
    /// Amount requested.
    pub amount: Amount,
    /// Whole units that actually left stock.
    pub taken: i64,
    /// `None` when the entry was deleted.
    pub remaining: Option<i64>,
}

/// In-memory stock store: item name -> quantity.
///
/// Entries produced by `add`/`remove` always hold a positive quantity; an
/// entry driven to zero or below is deleted. `load` replaces the whole
/// mapping with the file contents as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    stock: BTreeMap<String, i64>,
    config: InventoryConfig,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::with_config(InventoryConfig::default())
    }

    pub fn with_config(config: InventoryConfig) -> Self {
        Self {
            stock: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Current mapping, in iteration order.
    pub fn stock(&self) -> &BTreeMap<String, i64> {
        &self.stock
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.stock.iter().map(|(item, qty)| (item.as_str(), *qty))
    }

    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.stock.contains_key(item)
    }

    // ---------------------------------------------------------------------
    // Add
    // ---------------------------------------------------------------------

    pub fn try_add(&mut self, item: &str, qty: i64) -> DomainResult<Added> {
        let item = ItemName::parse(item)?;
        self.add_validated(item, qty)
    }

    pub fn try_add_value(&mut self, item: &Value, qty: &Value) -> DomainResult<Added> {
        let item = input::item_name(item)?;
        let qty = input::whole_quantity(&item, qty)?;
        self.add_validated(item, qty)
    }

    /// Add `qty` units of `item`. Rejections are logged as warnings.
    ///
    /// On success the audit line is pushed to `logs` (if given) and logged.
    pub fn add(&mut self, item: &str, qty: i64, logs: Option<&mut Vec<String>>) {
        let outcome = self.try_add(item, qty);
        record_add(outcome, logs);
    }

    pub fn add_value(&mut self, item: &Value, qty: &Value, logs: Option<&mut Vec<String>>) {
        let outcome = self.try_add_value(item, qty);
        record_add(outcome, logs);
    }

    fn add_validated(&mut self, item: ItemName, qty: i64) -> DomainResult<Added> {
        if qty < 0 {
            return Err(DomainError::invalid_input(format!(
                "Cannot add negative quantity for {item}"
            )));
        }

        let current = self.quantity(item.as_str());
        let total = current.checked_add(qty).ok_or_else(|| {
            DomainError::invalid_input(format!("Quantity overflow for {item}"))
        })?;

        let total = if total > 0 {
            self.stock.insert(item.as_str().to_owned(), total);
            total
        } else {
            // Adding 0 to an absent item, or topping up a loaded non-positive entry.
            self.stock.remove(item.as_str());
            0
        };

        let audit = format!(
            "{}: Added {qty} of {item}",
            Local::now().format(AUDIT_TIME_FORMAT)
        );

        Ok(Added {
            item,
            quantity: qty,
            total,
            audit,
        })
    }

    // ---------------------------------------------------------------------
    // Remove
    // ---------------------------------------------------------------------

    /// Take `amount` out of `item`'s stock, deleting the entry once it
    /// reaches zero. Taking more than is held deletes the entry.
    pub fn try_remove(&mut self, item: &str, amount: impl Into<Amount>) -> DomainResult<Removed> {
        let amount = Amount::validate(amount.into())?;
        let current = self.get(item).ok_or_else(|| DomainError::not_found(item))?;

        let remaining = amount.subtract_from(current);
        let (taken, remaining) = if remaining > 0 {
            if let Some(qty) = self.stock.get_mut(item) {
                *qty = remaining;
            }
            (current - remaining, Some(remaining))
        } else {
            self.stock.remove(item);
            (current.max(0), None)
        };

        Ok(Removed {
            item: item.to_owned(),
            amount,
            taken,
            remaining,
        })
    }

    pub fn try_remove_value(&mut self, item: &Value, amount: &Value) -> DomainResult<Removed> {
        let item = input::item_key(item)?;
        let amount = input::amount(amount)?;
        self.try_remove(item, amount)
    }

    /// Remove stock. Rejections and unknown items are logged as errors.
    pub fn remove(&mut self, item: &str, amount: impl Into<Amount>) {
        let outcome = self.try_remove(item, amount);
        record_remove(outcome);
    }

    pub fn remove_value(&mut self, item: &Value, amount: &Value) {
        let outcome = self.try_remove_value(item, amount);
        record_remove(outcome);
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Stored quantity, or `None` if the item has no entry.
    pub fn get(&self, item: &str) -> Option<i64> {
        self.stock.get(item).copied()
    }

    /// Stored quantity, or 0 if the item has no entry.
    pub fn quantity(&self, item: &str) -> i64 {
        self.get(item).unwrap_or(0)
    }

    pub fn try_quantity_value(&self, item: &Value) -> DomainResult<Option<i64>> {
        let item = input::item_key(item)?;
        Ok(self.get(item))
    }

    /// Stored quantity for an untyped item key.
    ///
    /// Returns 0 both for absent items and for non-string keys (the latter is
    /// logged as an error); use `try_quantity_value` to tell them apart.
    pub fn quantity_value(&self, item: &Value) -> i64 {
        match self.try_quantity_value(item) {
            Ok(qty) => qty.unwrap_or(0),
            Err(err) => {
                error!("{err}");
                0
            }
        }
    }

    /// Items whose quantity is strictly below `threshold`.
    pub fn try_low_items(&self, threshold: impl Into<Amount>) -> DomainResult<Vec<String>> {
        let threshold: Amount = threshold.into();
        let threshold = threshold.validate().map_err(|_| {
            DomainError::invalid_input(format!("Invalid threshold: {threshold}"))
        })?;
        Ok(self.below(threshold))
    }

    pub fn try_low_items_value(&self, threshold: &Value) -> DomainResult<Vec<String>> {
        let threshold = input::threshold(threshold)?;
        Ok(self.below(threshold))
    }

    /// Items below `threshold`; an invalid threshold falls back to the
    /// configured default with a warning.
    pub fn low_items(&self, threshold: impl Into<Amount>) -> Vec<String> {
        let outcome = self.try_low_items(threshold);
        self.low_items_or_default(outcome)
    }

    pub fn low_items_value(&self, threshold: &Value) -> Vec<String> {
        let outcome = self.try_low_items_value(threshold);
        self.low_items_or_default(outcome)
    }

    /// Items below the configured default threshold.
    pub fn low_items_default(&self) -> Vec<String> {
        self.low_items(self.config.low_stock_threshold)
    }

    fn low_items_or_default(&self, outcome: DomainResult<Vec<String>>) -> Vec<String> {
        outcome.unwrap_or_else(|err| {
            let fallback = self.default_threshold();
            warn!("{err}, using default {fallback}");
            self.below(fallback)
        })
    }

    fn default_threshold(&self) -> Amount {
        Amount::from(self.config.low_stock_threshold)
            .validate()
            .unwrap_or(Amount::Whole(DEFAULT_LOW_STOCK_THRESHOLD))
    }

    fn below(&self, threshold: Amount) -> Vec<String> {
        self.stock
            .iter()
            .filter(|(_, qty)| threshold.exceeds(**qty))
            .map(|(item, _)| item.clone())
            .collect()
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    /// Replace the store with the contents of `path`.
    ///
    /// A missing file empties the store before the error is returned; any
    /// other failure leaves the store untouched.
    pub fn try_load(&mut self, path: impl AsRef<Path>) -> PersistenceResult<usize> {
        match persistence::read_stock(path.as_ref()) {
            Ok(stock) => {
                self.stock = stock;
                Ok(self.stock.len())
            }
            Err(err) => {
                if err.is_missing() {
                    self.stock.clear();
                }
                Err(err)
            }
        }
    }

    pub fn load(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.try_load(path) {
            Ok(_) => info!("Data loaded from {}", path.display()),
            Err(err) if err.is_missing() => warn!("{err}"),
            Err(err) => error!("{err}"),
        }
    }

    pub fn load_default(&mut self) {
        let path = self.config.data_file.clone();
        self.load(path);
    }

    pub fn try_save(&self, path: impl AsRef<Path>) -> PersistenceResult<()> {
        persistence::write_stock(path.as_ref(), &self.stock)
    }

    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.try_save(path) {
            Ok(()) => info!("Data saved to {}", path.display()),
            Err(err) => error!("Error saving data: {err}"),
        }
    }

    pub fn save_default(&self) {
        self.save(&self.config.data_file);
    }

    // ---------------------------------------------------------------------
    // Report
    // ---------------------------------------------------------------------

    pub fn write_report<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        report::write_report(out, self.iter())
    }

    pub fn print_report(&self) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = self.write_report(&mut stdout) {
            error!("Error printing report: {err}");
        }
    }
}

fn record_add(outcome: DomainResult<Added>, logs: Option<&mut Vec<String>>) {
    match outcome {
        Ok(added) => {
            info!("{}", added.audit);
            if let Some(logs) = logs {
                logs.push(added.audit);
            }
        }
        Err(err) => warn!("{err}"),
    }
}

fn record_remove(outcome: DomainResult<Removed>) {
    match outcome {
        Ok(removed) if Amount::Whole(removed.taken) == removed.amount => {
            info!("Removed {} of {}", removed.taken, removed.item)
        }
        Ok(removed) => info!(
            "Removed {} of {} (requested {})",
            removed.taken, removed.item, removed.amount
        ),
        Err(err) if err.is_not_found() => error!("Error removing item: {err}"),
        Err(err) => error!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use tracing_test::traced_test;

    fn seeded(entries: &[(&str, i64)]) -> Inventory {
        let mut inventory = Inventory::new();
        for (item, qty) in entries {
            inventory.try_add(item, *qty).unwrap();
        }
        inventory
    }

    fn all_positive(inventory: &Inventory) -> bool {
        inventory.iter().all(|(_, qty)| qty > 0)
    }

    #[test]
    fn add_accumulates_quantities() {
        let mut inventory = Inventory::new();
        inventory.add("apple", 10, None);
        inventory.add("apple", 4, None);
        assert_eq!(inventory.quantity("apple"), 14);
    }

    #[test]
    fn add_then_remove_leaves_the_difference() {
        let mut inventory = Inventory::new();
        inventory.add("apple", 10, None);
        inventory.remove("apple", 3);
        assert_eq!(inventory.quantity("apple"), 7);
    }

    #[test]
    fn removing_everything_deletes_the_entry() {
        let mut inventory = Inventory::new();
        inventory.add("apple", 5, None);

        let removed = inventory.try_remove("apple", 5).unwrap();

        assert_eq!(removed.remaining, None);
        assert_eq!(inventory.quantity("apple"), 0);
        assert_eq!(inventory.get("apple"), None);
        assert!(inventory.iter().all(|(item, _)| item != "apple"));
    }

    #[test]
    fn removing_more_than_held_clamps_to_deletion() {
        let mut inventory = seeded(&[("apple", 2)]);
        let removed = inventory.try_remove("apple", 50).unwrap();
        assert_eq!(removed.remaining, None);
        assert_eq!(removed.taken, 2);
        assert!(inventory.is_empty());
    }

    #[test]
    fn fractional_removal_keeps_whole_units() {
        let mut inventory = seeded(&[("apple", 10)]);
        let removed = inventory.try_remove("apple", 2.5).unwrap();
        assert_eq!(removed.remaining, Some(8));
        assert_eq!(removed.taken, 2);
        assert_eq!(inventory.quantity("apple"), 8);
    }

    #[traced_test]
    #[test]
    fn sub_unit_removal_reports_nothing_taken() {
        let mut inventory = seeded(&[("apple", 10)]);

        inventory.remove("apple", 0.5);

        assert_eq!(inventory.quantity("apple"), 10);
        assert!(logs_contain("Removed 0 of apple (requested 0.5)"));
        assert!(!logs_contain("Removed 0.5 of apple"));

        let removed = inventory.try_remove("apple", 0.999).unwrap();
        assert_eq!(removed.taken, 0);
        assert_eq!(removed.remaining, Some(10));
    }

    #[traced_test]
    #[test]
    fn removal_logs_units_actually_taken() {
        let mut inventory = seeded(&[("apple", 10), ("pear", 2)]);

        inventory.remove("apple", 3);
        inventory.remove("pear", 50);

        assert!(logs_contain("Removed 3 of apple"));
        assert!(logs_contain("Removed 2 of pear (requested 50)"));
    }

    #[test]
    fn add_collects_audit_line_when_asked() {
        let mut inventory = Inventory::new();
        let mut logs = Vec::new();

        inventory.add("apple", 10, Some(&mut logs));
        inventory.add("", 10, Some(&mut logs));

        assert_eq!(logs.len(), 1);
        assert!(logs[0].ends_with(": Added 10 of apple"), "{}", logs[0]);
    }

    #[test]
    fn adding_zero_of_an_absent_item_creates_no_entry() {
        let mut inventory = Inventory::new();
        let added = inventory.try_add("ghost", 0).unwrap();
        assert_eq!(added.total, 0);
        assert!(!inventory.contains("ghost"));
    }

    #[test]
    fn add_overflow_is_rejected() {
        let mut inventory = seeded(&[("apple", i64::MAX)]);
        let err = inventory.try_add("apple", 1).unwrap_err();
        assert_eq!(err, DomainError::invalid_input("Quantity overflow for apple"));
        assert_eq!(inventory.quantity("apple"), i64::MAX);
    }

    #[traced_test]
    #[test]
    fn invalid_adds_warn_and_leave_store_unchanged() {
        let mut inventory = seeded(&[("apple", 10)]);
        let before = inventory.clone();

        inventory.add("", 3, None);
        inventory.add("orange", -2, None);
        inventory.add_value(&json!(123), &json!("ten"), None);
        inventory.add_value(&json!("pear"), &json!(1.5), None);

        assert_eq!(inventory, before);
        assert!(logs_contain("Invalid item name provided"));
        assert!(logs_contain("Cannot add negative quantity for orange"));
        assert!(logs_contain("Invalid quantity type for pear: expected int, got float"));
    }

    #[traced_test]
    #[test]
    fn removing_unknown_item_logs_error_without_change() {
        let mut inventory = seeded(&[("apple", 10)]);
        let before = inventory.clone();

        inventory.remove("orange", 1);

        assert_eq!(inventory, before);
        assert!(logs_contain(
            "Error removing item: Item 'orange' not found in inventory"
        ));
    }

    #[traced_test]
    #[test]
    fn invalid_removals_log_errors() {
        let mut inventory = seeded(&[("apple", 10)]);
        let before = inventory.clone();

        inventory.remove("apple", -1);
        inventory.remove_value(&json!(7), &json!(1));
        inventory.remove_value(&json!("apple"), &json!("one"));

        assert_eq!(inventory, before);
        assert!(logs_contain("Invalid quantity: -1"));
        assert!(logs_contain("Invalid item type: expected str, got int"));
        assert!(logs_contain("Invalid quantity: \"one\""));
    }

    #[test]
    fn remove_checks_quantity_before_presence() {
        let mut inventory = Inventory::new();
        let err = inventory.try_remove("orange", -1).unwrap_err();
        assert!(!err.is_not_found());
    }

    #[traced_test]
    #[test]
    fn quantity_of_non_string_key_is_zero_and_logged() {
        let inventory = seeded(&[("apple", 10)]);

        assert_eq!(inventory.quantity_value(&json!(["apple"])), 0);
        assert_eq!(inventory.quantity_value(&json!("apple")), 10);
        assert_eq!(inventory.quantity_value(&json!("kiwi")), 0);
        assert!(logs_contain("Invalid item type: expected str, got array"));
    }

    #[test]
    fn try_quantity_value_distinguishes_absent_from_invalid() {
        let inventory = seeded(&[("apple", 10)]);
        assert_eq!(inventory.try_quantity_value(&json!("kiwi")).unwrap(), None);
        assert!(inventory.try_quantity_value(&json!(1)).is_err());
    }

    #[test]
    fn low_items_uses_strict_comparison() {
        let inventory = seeded(&[("apple", 10), ("banana", 5), ("cherry", 2)]);
        assert_eq!(inventory.low_items_default(), vec!["cherry".to_string()]);
        assert_eq!(
            inventory.low_items(11),
            vec!["apple".to_string(), "banana".to_string(), "cherry".to_string()]
        );
        assert_eq!(inventory.low_items(5.5), vec!["banana".to_string(), "cherry".to_string()]);
        assert!(inventory.low_items(0).is_empty());
    }

    #[traced_test]
    #[test]
    fn invalid_threshold_falls_back_to_default() {
        let inventory = seeded(&[("apple", 10), ("banana", 5), ("cherry", 2)]);

        assert_eq!(inventory.low_items(-3), vec!["cherry".to_string()]);
        assert_eq!(inventory.low_items_value(&json!("low")), vec!["cherry".to_string()]);
        assert!(logs_contain("Invalid threshold: -3, using default 5"));
        assert!(logs_contain("Invalid threshold: \"low\", using default 5"));
    }

    #[test]
    fn configured_threshold_drives_default_scan() {
        let mut inventory = Inventory::with_config(InventoryConfig {
            low_stock_threshold: 6,
            ..InventoryConfig::default()
        });
        inventory.add("banana", 5, None);
        inventory.add("apple", 10, None);
        assert_eq!(inventory.config().low_stock_threshold, 6);
        assert_eq!(inventory.low_items_default(), vec!["banana".to_string()]);
    }

    #[test]
    fn negative_configured_threshold_falls_back_to_five() {
        let mut inventory = Inventory::with_config(InventoryConfig {
            low_stock_threshold: -1,
            ..InventoryConfig::default()
        });
        inventory.add("banana", 5, None);
        inventory.add("cherry", 4, None);
        assert_eq!(inventory.low_items_default(), vec!["cherry".to_string()]);
    }

    #[test]
    fn report_lists_every_entry() {
        let inventory = seeded(&[("banana", 5), ("apple", 7)]);
        let mut out = Vec::new();
        inventory.write_report(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Items Report");
        assert_eq!(lines[1], "-".repeat(30));
        assert_eq!(&lines[2..], ["apple -> 7", "banana -> 5"]);
    }

    #[traced_test]
    #[test]
    fn load_of_missing_file_empties_store_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let mut inventory = seeded(&[("apple", 10)]);

        inventory.load(&path);

        assert!(inventory.is_empty());
        assert!(logs_contain("not found, starting with empty inventory"));
    }

    #[traced_test]
    #[test]
    fn load_of_malformed_file_keeps_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        std::fs::write(&path, "{\"apple\": ").unwrap();
        let mut inventory = seeded(&[("apple", 10), ("banana", 5)]);
        let before = inventory.clone();

        inventory.load(&path);

        assert_eq!(inventory, before);
        assert!(logs_contain("Invalid JSON in"));
    }

    #[traced_test]
    #[test]
    fn save_failure_is_logged_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("inventory.json");
        let inventory = seeded(&[("apple", 10)]);

        inventory.save(&path);

        assert!(!path.exists());
        assert!(logs_contain("Error saving data:"));
    }

    #[test]
    fn default_paths_come_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = InventoryConfig {
            data_file: dir.path().join("stock.json"),
            ..InventoryConfig::default()
        };
        let mut inventory = Inventory::with_config(config.clone());
        inventory.add("apple", 3, None);
        inventory.save_default();

        let mut reloaded = Inventory::with_config(config);
        reloaded.load_default();
        assert_eq!(reloaded.stock(), inventory.stock());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(String, i64),
        Remove(String, i64),
        RemoveFractional(String, f64),
    }

    fn op() -> impl Strategy<Value = Op> {
        let item = prop::sample::select(vec!["apple", "banana", "cherry", ""]).prop_map(String::from);
        prop_oneof![
            (item.clone(), -5i64..20).prop_map(|(i, q)| Op::Add(i, q)),
            (item.clone(), -5i64..20).prop_map(|(i, q)| Op::Remove(i, q)),
            (item, -2.0f64..20.0).prop_map(|(i, q)| Op::RemoveFractional(i, q)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: no sequence of adds and removes leaves a non-positive entry,
        /// and every rejected operation leaves the store exactly as it was.
        #[test]
        fn entries_stay_positive_and_rejections_are_no_ops(
            ops in prop::collection::vec(op(), 1..40)
        ) {
            let mut inventory = Inventory::new();

            for op in ops {
                let before = inventory.clone();
                let rejected = match &op {
                    Op::Add(item, qty) => inventory.try_add(item, *qty).is_err(),
                    Op::Remove(item, qty) => inventory.try_remove(item, *qty).is_err(),
                    Op::RemoveFractional(item, qty) => inventory.try_remove(item, *qty).is_err(),
                };

                if rejected {
                    prop_assert_eq!(&inventory, &before);
                }
                prop_assert!(all_positive(&inventory), "non-positive entry after {:?}", op);
            }
        }
    }
}
