//! # Inventory Manager
//!
//! The single gatekeeper for inventory mutations and lookups.
//!
//! ## Commit Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every mutating operation                             │
//! │                                                                         │
//! │  1. Look up / build the candidate item (a copy, never the stored one)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Check: validate() → SKU policy → uniqueness → version headroom     │
//! │       │                                                                 │
//! │       ├── any failure → return Err, inventory untouched                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Swap the candidate in (indexes follow)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. commit: last_sync = now, version += 1                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::{InventoryManager, Item, ItemUpdate};
//!
//! let mut manager = InventoryManager::new();
//! manager
//!     .add_item(Item::new("1", "COKE-330", "Coca-Cola 330ml", "drinks").with_price_cents(199))
//!     .unwrap();
//!
//! manager.update_item("1", &ItemUpdate::new().price_cents(249)).unwrap();
//! assert_eq!(manager.get_item("1").unwrap().price_cents, 249);
//! assert_eq!(manager.inventory().version(), 2);
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{InventoryError, InventoryResult};
use crate::inventory::{Inventory, ItemFilter};
use crate::item::{Item, ItemUpdate};
use crate::validation::SkuPolicy;

/// Owns one [`Inventory`] and keeps its invariants.
#[derive(Debug)]
pub struct InventoryManager {
    inventory: Inventory,
    clock: Arc<dyn Clock>,
    sku_policy: SkuPolicy,
}

impl InventoryManager {
    /// Creates a manager over an empty inventory, using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let inventory = Inventory::with_last_sync(clock.now());
        InventoryManager {
            inventory,
            clock,
            sku_policy: SkuPolicy::default(),
        }
    }

    pub fn with_sku_policy(mut self, sku_policy: SkuPolicy) -> Self {
        self.sku_policy = sku_policy;
        self
    }

    pub fn sku_policy(&self) -> &SkuPolicy {
        &self.sku_policy
    }

    // =========================================================================
    // Aggregate Access
    // =========================================================================

    /// Replaces the inventory wholesale. No merge, no validation.
    pub fn set_inventory(&mut self, inventory: Inventory) {
        debug!(
            items = inventory.len(),
            version = inventory.version(),
            "Replacing inventory"
        );
        self.inventory = inventory;
    }

    /// Read-only view of the live inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn into_inventory(self) -> Inventory {
        self.inventory
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a new item.
    ///
    /// ## Errors
    /// - `InvalidArgument` / field errors from [`Item::validate`]
    /// - `InvalidSku` when the SKU fails the policy
    /// - `ItemAlreadyExists` when the ID or SKU is taken (by any item,
    ///   including soft-deleted ones)
    /// - `VersionExhausted` when the version counter cannot advance
    pub fn add_item(&mut self, mut item: Item) -> InventoryResult<()> {
        item.validate()?;
        self.check_sku(&item.sku)?;

        if self.inventory.contains(&item.id) {
            return Err(InventoryError::already_exists("id", &item.id));
        }
        if self.inventory.find_by_sku(&item.sku).is_some() {
            return Err(InventoryError::already_exists("sku", &item.sku));
        }
        let version = self.inventory.next_version()?;

        let now = self.clock.now();
        item.created_at = now;
        item.updated_at = now;

        debug!(item_id = %item.id, sku = %item.sku, category = %item.category, "Adding item");
        self.inventory.insert(item);
        self.inventory.commit(now, version);
        debug!(version, "Item added");

        Ok(())
    }

    /// Applies a partial update to an existing item.
    ///
    /// The update is merged into a copy which is validated before it
    /// replaces the stored item, so a rejected update leaves the item, the
    /// indexes and the version exactly as they were.
    ///
    /// ## Errors
    /// - `ItemNotFound` when `item_id` is absent
    /// - `InvalidSku` / `ItemAlreadyExists` for a bad or taken new SKU
    /// - field errors from [`Item::validate`] on the merged item
    pub fn update_item(&mut self, item_id: &str, updates: &ItemUpdate) -> InventoryResult<&Item> {
        let current = self
            .inventory
            .get(item_id)
            .ok_or_else(|| InventoryError::not_found(item_id))?;

        let mut candidate = updates.merged_into(current);

        if let Some(sku) = &updates.sku {
            self.check_sku(sku)?;
            if self.inventory.sku_taken_by_other(sku, item_id) {
                return Err(InventoryError::already_exists("sku", sku));
            }
        }

        let now = self.clock.now();
        candidate.updated_at = now;
        candidate.validate()?;
        let version = self.inventory.next_version()?;

        debug!(item_id = %item_id, "Updating item");
        self.inventory.replace(candidate);
        self.inventory.commit(now, version);
        debug!(version, "Item updated");

        self.get_item(item_id)
    }

    /// Soft-deletes an item: it stays stored and keeps its category and SKU.
    pub fn delete_item(&mut self, item_id: &str) -> InventoryResult<()> {
        self.set_active(item_id, false)
    }

    /// Reactivates a soft-deleted item.
    pub fn restore_item(&mut self, item_id: &str) -> InventoryResult<()> {
        self.set_active(item_id, true)
    }

    /// Removes an item completely, freeing its SKU and, if nothing else
    /// uses it, its category.
    pub fn remove_item(&mut self, item_id: &str) -> InventoryResult<Item> {
        if !self.inventory.contains(item_id) {
            return Err(InventoryError::not_found(item_id));
        }
        let version = self.inventory.next_version()?;
        let item = self
            .inventory
            .remove(item_id)
            .ok_or_else(|| InventoryError::not_found(item_id))?;

        self.inventory.commit(self.clock.now(), version);
        debug!(item_id = %item_id, sku = %item.sku, version, "Item removed");

        Ok(item)
    }

    fn set_active(&mut self, item_id: &str, active: bool) -> InventoryResult<()> {
        if !self.inventory.contains(item_id) {
            return Err(InventoryError::not_found(item_id));
        }
        let version = self.inventory.next_version()?;
        let now = self.clock.now();
        let item = self
            .inventory
            .get_mut(item_id)
            .ok_or_else(|| InventoryError::not_found(item_id))?;

        item.is_active = active;
        item.updated_at = now;

        self.inventory.commit(now, version);
        debug!(item_id = %item_id, active, version, "Item activity changed");

        Ok(())
    }

    fn check_sku(&self, sku: &str) -> InventoryResult<()> {
        self.sku_policy
            .validate(sku)
            .map_err(|source| InventoryError::InvalidSku {
                sku: sku.to_string(),
                source,
            })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_item(&self, item_id: &str) -> InventoryResult<&Item> {
        self.inventory
            .get(item_id)
            .ok_or_else(|| InventoryError::not_found(item_id))
    }

    pub fn find_by_sku(&self, sku: &str) -> Option<&Item> {
        self.inventory.find_by_sku(sku)
    }

    /// Categories in use, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.inventory.categories().collect()
    }

    pub fn list_items(&self, filter: &ItemFilter) -> Vec<&Item> {
        self.inventory.list(filter)
    }
}

impl Default for InventoryManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    fn manager() -> (InventoryManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
        ));
        (InventoryManager::with_clock(clock.clone()), clock)
    }

    fn item(id: &str, sku: &str, category: &str) -> Item {
        Item::new(id, sku, format!("Item {id}"), category).with_price_cents(100)
    }

    #[test]
    fn test_new_manager_is_empty() {
        let manager = InventoryManager::new();
        assert!(manager.inventory().is_empty());
        assert_eq!(manager.inventory().version(), 0);
        assert!(manager.categories().is_empty());
    }

    #[test]
    fn test_add_item_stamps_and_commits() {
        let (mut manager, clock) = manager();
        clock.advance(Duration::minutes(1));
        manager.add_item(item("1", "A1", "food")).unwrap();

        let stored = manager.get_item("1").unwrap();
        assert_eq!(stored.updated_at, clock.now());
        assert_eq!(stored.created_at, clock.now());
        assert_eq!(manager.inventory().last_sync(), clock.now());
        assert_eq!(manager.inventory().version(), 1);
        assert_eq!(manager.categories(), vec!["food"]);
    }

    #[test]
    fn test_add_item_rejects_duplicates() {
        let (mut manager, _) = manager();
        manager.add_item(item("1", "A1", "food")).unwrap();

        let err = manager.add_item(item("1", "B1", "food")).unwrap_err();
        assert!(matches!(err, InventoryError::ItemAlreadyExists { ref field, .. } if field == "id"));

        let err = manager.add_item(item("2", "A1", "food")).unwrap_err();
        assert!(matches!(err, InventoryError::ItemAlreadyExists { ref field, .. } if field == "sku"));

        assert_eq!(manager.inventory().version(), 1);
    }

    #[test]
    fn test_add_item_checks_sku_policy() {
        let (manager, _) = manager();
        let mut manager = manager.with_sku_policy(SkuPolicy {
            max_length: 8,
            allow_lowercase: false,
        });

        let err = manager.add_item(item("1", "lower-1", "food")).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidSku { .. }));

        let err = manager.add_item(item("1", "A B", "food")).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidSku { .. }));

        assert!(manager.inventory().is_empty());
    }

    #[test]
    fn test_add_item_validates_fields_first() {
        let (mut manager, _) = manager();
        let err = manager
            .add_item(item("1", "not valid", "food").with_price_cents(-5))
            .unwrap_err();
        assert!(matches!(err, InventoryError::InvalidPrice(_)));
    }

    #[test]
    fn test_update_item_moves_category() {
        let (mut manager, _) = manager();
        manager.add_item(item("1", "A1", "food")).unwrap();
        manager.add_item(item("2", "A2", "food")).unwrap();

        manager
            .update_item("1", &ItemUpdate::new().category("drinks"))
            .unwrap();
        assert_eq!(manager.categories(), vec!["drinks", "food"]);

        manager
            .update_item("2", &ItemUpdate::new().category("drinks"))
            .unwrap();
        assert_eq!(manager.categories(), vec!["drinks"]);
    }

    #[test]
    fn test_update_item_same_category_keeps_it() {
        let (mut manager, _) = manager();
        manager.add_item(item("1", "A1", "food")).unwrap();
        manager
            .update_item("1", &ItemUpdate::new().category("food"))
            .unwrap();
        assert_eq!(manager.categories(), vec!["food"]);
        assert_eq!(manager.inventory().category_usage("food"), 1);
    }

    #[test]
    fn test_update_item_sku_rules() {
        let (mut manager, _) = manager();
        manager.add_item(item("1", "A1", "food")).unwrap();
        manager.add_item(item("2", "A2", "food")).unwrap();

        let err = manager
            .update_item("1", &ItemUpdate::new().sku("A2"))
            .unwrap_err();
        assert!(matches!(err, InventoryError::ItemAlreadyExists { .. }));

        let err = manager
            .update_item("1", &ItemUpdate::new().sku("bad sku"))
            .unwrap_err();
        assert!(matches!(err, InventoryError::InvalidSku { .. }));

        // Re-asserting its own SKU is not a collision.
        manager.update_item("1", &ItemUpdate::new().sku("A1")).unwrap();

        manager.update_item("1", &ItemUpdate::new().sku("Z9")).unwrap();
        assert!(manager.find_by_sku("A1").is_none());
        assert_eq!(manager.find_by_sku("Z9").map(|i| i.id.as_str()), Some("1"));
    }

    #[test]
    fn test_failed_update_leaves_item_untouched() {
        let (mut manager, clock) = manager();
        manager.add_item(item("1", "A1", "food")).unwrap();
        let before = manager.get_item("1").unwrap().clone();
        let version = manager.inventory().version();
        let last_sync = manager.inventory().last_sync();

        clock.advance(Duration::minutes(3));
        let update = ItemUpdate::new()
            .name("Renamed")
            .category("drinks")
            .sku("B1")
            .price_cents(-1);
        let err = manager.update_item("1", &update).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidPrice(_)));

        assert_eq!(manager.get_item("1").unwrap(), &before);
        assert_eq!(manager.categories(), vec!["food"]);
        assert!(manager.find_by_sku("A1").is_some());
        assert!(manager.find_by_sku("B1").is_none());
        assert_eq!(manager.inventory().version(), version);
        assert_eq!(manager.inventory().last_sync(), last_sync);
    }

    #[test]
    fn test_update_can_clear_optional_text_but_not_required() {
        let (mut manager, _) = manager();
        manager
            .add_item(item("1", "A1", "food").with_supplier("Acme"))
            .unwrap();

        let updated = manager
            .update_item("1", &ItemUpdate::new().supplier(""))
            .unwrap();
        assert_eq!(updated.supplier, "");

        let err = manager
            .update_item("1", &ItemUpdate::new().name(""))
            .unwrap_err();
        assert!(matches!(err, InventoryError::InvalidItemName(_)));
    }

    #[test]
    fn test_soft_delete_and_restore() {
        let (mut manager, _) = manager();
        manager.add_item(item("1", "A1", "food")).unwrap();

        manager.delete_item("1").unwrap();
        assert!(!manager.get_item("1").unwrap().is_active);
        assert_eq!(manager.inventory().version(), 2);
        assert!(manager.list_items(&ItemFilter::active()).is_empty());

        manager.restore_item("1").unwrap();
        assert!(manager.get_item("1").unwrap().is_active);
        assert_eq!(manager.inventory().version(), 3);
    }

    #[test]
    fn test_missing_item_errors() {
        let (mut manager, _) = manager();
        assert!(matches!(
            manager.get_item("nope"),
            Err(InventoryError::ItemNotFound(_))
        ));
        assert!(matches!(
            manager.delete_item("nope"),
            Err(InventoryError::ItemNotFound(_))
        ));
        assert!(matches!(
            manager.restore_item("nope"),
            Err(InventoryError::ItemNotFound(_))
        ));
        assert!(matches!(
            manager.remove_item("nope"),
            Err(InventoryError::ItemNotFound(_))
        ));
        assert_eq!(manager.inventory().version(), 0);
    }

    #[test]
    fn test_remove_item_returns_it() {
        let (mut manager, _) = manager();
        manager.add_item(item("1", "A1", "food")).unwrap();
        let removed = manager.remove_item("1").unwrap();
        assert_eq!(removed.sku, "A1");
        assert!(manager.inventory().is_empty());
        assert!(manager.categories().is_empty());
    }

    #[test]
    fn test_set_inventory_replaces_wholesale() {
        let (mut manager, _) = manager();
        manager.add_item(item("1", "A1", "food")).unwrap();

        let replacement = Inventory::from_items(vec![item("9", "Z9", "tools")], Utc::now(), 42);
        manager.set_inventory(replacement);

        assert!(manager.get_item("1").is_err());
        assert_eq!(manager.categories(), vec!["tools"]);
        assert_eq!(manager.inventory().version(), 42);

        manager.add_item(item("1", "A1", "food")).unwrap();
        assert_eq!(manager.inventory().version(), 43);
    }

    #[test]
    fn test_exhausted_version_rejects_every_mutation() {
        let (mut manager, clock) = manager();
        let loaded_at = clock.now();
        manager.set_inventory(Inventory::from_items(
            vec![item("1", "A1", "food")],
            loaded_at,
            u64::MAX,
        ));
        let before = manager.inventory().clone();
        clock.advance(Duration::minutes(1));

        let exhausted = |result: InventoryResult<()>| {
            matches!(result, Err(InventoryError::VersionExhausted(u64::MAX)))
        };
        assert!(exhausted(manager.add_item(item("2", "A2", "tools"))));
        assert!(exhausted(
            manager
                .update_item("1", &ItemUpdate::new().price_cents(5))
                .map(|_| ())
        ));
        assert!(exhausted(manager.delete_item("1")));
        assert!(exhausted(manager.restore_item("1")));
        assert!(exhausted(manager.remove_item("1").map(|_| ())));

        assert_eq!(manager.inventory(), &before);
        assert_eq!(manager.inventory().last_sync(), loaded_at);
        assert!(matches!(
            manager.delete_item("missing"),
            Err(InventoryError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_update_rejects_sku_shared_in_loaded_inventory() {
        let (mut manager, _) = manager();
        manager.set_inventory(Inventory::from_items(
            vec![item("1", "A1", "food"), item("2", "A1", "food")],
            Utc::now(),
            0,
        ));

        let err = manager
            .update_item("1", &ItemUpdate::new().sku("A1"))
            .unwrap_err();
        assert!(matches!(err, InventoryError::ItemAlreadyExists { .. }));
        assert_eq!(manager.inventory().version(), 0);
    }
}
