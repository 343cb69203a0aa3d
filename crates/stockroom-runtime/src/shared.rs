//! # Shared Inventory
//!
//! A cloneable, thread-safe handle around one [`InventoryManager`].
//!
//! ## Thread Safety
//! The manager is wrapped in `Arc<Mutex<T>>`:
//! - `Arc`: every clone of the handle sees the same inventory
//! - `Mutex`: one operation at a time, so the uniqueness check, the insert
//!   and the version bump of a write can never interleave with another write
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Thread A: add_item(SKU-1) ──┐                                         │
//! │                              ├──► lock ──► InventoryManager ──► unlock │
//! │  Thread B: add_item(SKU-1) ──┘       (one at a time)                   │
//! │                                                                         │
//! │  Result: exactly one Ok, one ItemAlreadyExists, version +1             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads return owned copies so no reference into the locked state escapes.
//! A poisoned lock is recovered: operations either commit fully or not at
//! all, so a panicking holder cannot leave a half-applied change behind.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stockroom_core::{
    Clock, Inventory, InventoryManager, InventoryResult, Item, ItemFilter, ItemUpdate,
};
use tracing::info;

use crate::config::StockroomConfig;

#[derive(Debug, Clone)]
pub struct SharedInventory {
    manager: Arc<Mutex<InventoryManager>>,
}

impl SharedInventory {
    /// Wraps an empty inventory with the default SKU policy.
    pub fn new() -> Self {
        Self::from_manager(InventoryManager::new())
    }

    pub fn from_manager(manager: InventoryManager) -> Self {
        SharedInventory {
            manager: Arc::new(Mutex::new(manager)),
        }
    }

    /// Builds a handle using the configured SKU policy.
    pub fn from_config(config: &StockroomConfig) -> Self {
        let policy = config.sku_policy();
        info!(
            sku_max_length = policy.max_length,
            sku_allow_lowercase = policy.allow_lowercase,
            "Creating shared inventory"
        );
        Self::from_manager(InventoryManager::new().with_sku_policy(policy))
    }

    /// Same as [`SharedInventory::from_config`] with an injected clock.
    pub fn from_config_with_clock(config: &StockroomConfig, clock: Arc<dyn Clock>) -> Self {
        Self::from_manager(InventoryManager::with_clock(clock).with_sku_policy(config.sku_policy()))
    }

    fn lock(&self) -> MutexGuard<'_, InventoryManager> {
        self.manager.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the manager.
    ///
    /// ## Usage
    /// ```rust
    /// use stockroom_runtime::SharedInventory;
    ///
    /// let shared = SharedInventory::new();
    /// let count = shared.with_manager(|m| m.inventory().len());
    /// assert_eq!(count, 0);
    /// ```
    pub fn with_manager<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&InventoryManager) -> R,
    {
        let manager = self.lock();
        f(&manager)
    }

    /// Executes a function with write access to the manager.
    ///
    /// Several operations inside one closure run as one critical section.
    pub fn with_manager_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut InventoryManager) -> R,
    {
        let mut manager = self.lock();
        f(&mut manager)
    }

    // =========================================================================
    // Manager Operations
    // =========================================================================

    pub fn add_item(&self, item: Item) -> InventoryResult<()> {
        self.lock().add_item(item)
    }

    pub fn update_item(&self, item_id: &str, updates: &ItemUpdate) -> InventoryResult<Item> {
        self.lock().update_item(item_id, updates).cloned()
    }

    pub fn delete_item(&self, item_id: &str) -> InventoryResult<()> {
        self.lock().delete_item(item_id)
    }

    pub fn restore_item(&self, item_id: &str) -> InventoryResult<()> {
        self.lock().restore_item(item_id)
    }

    pub fn remove_item(&self, item_id: &str) -> InventoryResult<Item> {
        self.lock().remove_item(item_id)
    }

    pub fn get_item(&self, item_id: &str) -> InventoryResult<Item> {
        self.lock().get_item(item_id).cloned()
    }

    pub fn find_by_sku(&self, sku: &str) -> Option<Item> {
        self.lock().find_by_sku(sku).cloned()
    }

    pub fn list_items(&self, filter: &ItemFilter) -> Vec<Item> {
        self.lock().list_items(filter).into_iter().cloned().collect()
    }

    pub fn categories(&self) -> Vec<String> {
        self.lock().categories().into_iter().map(str::to_string).collect()
    }

    pub fn version(&self) -> u64 {
        self.lock().inventory().version()
    }

    /// A point-in-time copy of the whole aggregate.
    pub fn snapshot(&self) -> Inventory {
        self.lock().inventory().clone()
    }

    pub fn set_inventory(&self, inventory: Inventory) {
        self.lock().set_inventory(inventory);
    }
}

impl Default for SharedInventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use stockroom_core::InventoryError;

    fn item(id: &str, sku: &str) -> Item {
        Item::new(id, sku, format!("Item {id}"), "general").with_price_cents(100)
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedInventory::new();
        let other = shared.clone();

        shared.add_item(item("1", "A1")).unwrap();
        assert_eq!(other.get_item("1").unwrap().sku, "A1");
        assert_eq!(other.version(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let shared = SharedInventory::new();
        shared.add_item(item("1", "A1")).unwrap();
        let snapshot = shared.snapshot();

        shared.remove_item("1").unwrap();
        assert!(snapshot.contains("1"));
        assert_eq!(snapshot.version(), 1);
        assert_eq!(shared.version(), 2);
    }

    #[test]
    fn test_config_policy_is_applied() {
        let mut config = StockroomConfig::default();
        config.sku.allow_lowercase = false;
        let shared = SharedInventory::from_config(&config);

        let err = shared.add_item(item("1", "abc")).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidSku { .. }));
        shared.add_item(item("1", "ABC")).unwrap();
    }

    #[test]
    fn test_concurrent_distinct_adds_all_commit() {
        let shared = SharedInventory::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        let id = format!("{t}-{i}");
                        shared.add_item(item(&id, &format!("SKU-{id}"))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.version(), 200);
        assert_eq!(shared.snapshot().len(), 200);
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let shared = SharedInventory::new();
        shared.add_item(item("1", "A1")).unwrap();

        let poisoner = shared.clone();
        let _ = thread::spawn(move || {
            poisoner.with_manager_mut(|_| panic!("boom"));
        })
        .join();

        assert_eq!(shared.get_item("1").unwrap().sku, "A1");
        shared.add_item(item("2", "A2")).unwrap();
        assert_eq!(shared.version(), 2);
    }
}
