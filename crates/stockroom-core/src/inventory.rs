//! # Inventory Aggregate
//!
//! The set of items plus the bookkeeping derived from it.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Inventory                                       │
//! │                                                                         │
//! │  items       BTreeMap<id, Item>         source of truth                │
//! │  categories  BTreeMap<category, count>  items per category             │
//! │  skus        HashMap<sku, {id}>         O(1) SKU uniqueness            │
//! │  last_sync   DateTime<Utc>              time of last commit            │
//! │  version     u64                        +1 per commit                  │
//! │                                                                         │
//! │  categories/skus are derived: they are rebuilt from `items` on         │
//! │  deserialize and kept in step by every mutation below.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only [`InventoryManager`](crate::InventoryManager) mutates an inventory;
//! the public surface here is read-only.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::{InventoryError, InventoryResult};
use crate::item::Item;

// =============================================================================
// Inventory
// =============================================================================

/// Items keyed by ID, with a category index, a SKU index, and commit counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InventoryRecord", into = "InventoryRecord")]
pub struct Inventory {
    items: BTreeMap<String, Item>,
    categories: BTreeMap<String, usize>,
    skus: HashMap<String, BTreeSet<String>>,
    last_sync: DateTime<Utc>,
    version: u64,
}

impl Inventory {
    /// Creates an empty inventory at version 0, stamped by [`SystemClock`].
    ///
    /// The manager builds its inventory from its own clock instead; use
    /// [`Inventory::with_last_sync`] for a pinned time.
    pub fn new() -> Self {
        Self::with_last_sync(SystemClock.now())
    }

    pub fn with_last_sync(last_sync: DateTime<Utc>) -> Self {
        Inventory {
            items: BTreeMap::new(),
            categories: BTreeMap::new(),
            skus: HashMap::new(),
            last_sync,
            version: 0,
        }
    }

    /// Builds an inventory from existing items, rebuilding both indexes.
    ///
    /// Nothing is validated. Later items win on duplicate IDs.
    pub fn from_items(
        items: impl IntoIterator<Item = Item>,
        last_sync: DateTime<Utc>,
        version: u64,
    ) -> Self {
        let mut inventory = Inventory::with_last_sync(last_sync);
        inventory.version = version;
        for item in items {
            if let Some(previous) = inventory.items.remove(&item.id) {
                inventory.unindex(&previous);
            }
            inventory.insert(item);
        }
        inventory
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last_sync(&self) -> DateTime<Utc> {
        self.last_sync
    }

    /// Number of items, active and soft-deleted.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// The item holding `sku`. A loaded inventory may hold a SKU more than
    /// once; the lowest ID is returned then.
    pub fn find_by_sku(&self, sku: &str) -> Option<&Item> {
        self.skus
            .get(sku)
            .and_then(|ids| ids.iter().next())
            .and_then(|id| self.items.get(id))
    }

    /// Whether any item other than `id` holds `sku`.
    pub fn sku_taken_by_other(&self, sku: &str, id: &str) -> bool {
        self.skus
            .get(sku)
            .map_or(false, |ids| ids.iter().any(|holder| holder != id))
    }

    /// All items, ordered by ID.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Categories in use, sorted.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Number of items (active or not) filed under `category`.
    pub fn category_usage(&self, category: &str) -> usize {
        self.categories.get(category).copied().unwrap_or(0)
    }

    /// Items matching `filter`, ordered by ID.
    pub fn list(&self, filter: &ItemFilter) -> Vec<&Item> {
        self.items().filter(|item| filter.matches(item)).collect()
    }

    // =========================================================================
    // Mutation (manager only)
    // =========================================================================

    /// Inserts an item the caller has already checked for ID/SKU clashes.
    pub(crate) fn insert(&mut self, item: Item) {
        self.index(&item);
        self.items.insert(item.id.clone(), item);
    }

    /// Swaps in a new version of an existing item, moving its index entries.
    pub(crate) fn replace(&mut self, item: Item) {
        if let Some(previous) = self.items.remove(&item.id) {
            self.unindex(&previous);
        }
        self.insert(item);
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Item> {
        let item = self.items.remove(id)?;
        self.unindex(&item);
        Some(item)
    }

    /// Mutable access for changes that touch neither category nor SKU.
    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    /// The version the next commit will carry.
    ///
    /// Fails when the counter is exhausted, before anything is changed.
    pub(crate) fn next_version(&self) -> InventoryResult<u64> {
        self.version
            .checked_add(1)
            .ok_or(InventoryError::VersionExhausted(self.version))
    }

    /// Records one committed mutation at `version`, taken from
    /// [`Inventory::next_version`].
    pub(crate) fn commit(&mut self, at: DateTime<Utc>, version: u64) -> u64 {
        self.last_sync = at;
        self.version = version;
        version
    }

    fn index(&mut self, item: &Item) {
        *self.categories.entry(item.category.clone()).or_insert(0) += 1;
        self.skus
            .entry(item.sku.clone())
            .or_default()
            .insert(item.id.clone());
    }

    fn unindex(&mut self, item: &Item) {
        if let Some(count) = self.categories.get_mut(&item.category) {
            *count -= 1;
            if *count == 0 {
                self.categories.remove(&item.category);
            }
        }
        if let Some(ids) = self.skus.get_mut(&item.sku) {
            ids.remove(&item.id);
            if ids.is_empty() {
                self.skus.remove(&item.sku);
            }
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Serialized Form
// =============================================================================

/// Wire shape of an [`Inventory`].
///
/// `categories` is written for readers of the serialized document and
/// ignored when reading back; indexes are always rebuilt from `items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub items: Vec<Item>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub last_sync: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl From<InventoryRecord> for Inventory {
    fn from(record: InventoryRecord) -> Self {
        Inventory::from_items(record.items, record.last_sync, record.version)
    }
}

impl From<Inventory> for InventoryRecord {
    fn from(inventory: Inventory) -> Self {
        InventoryRecord {
            categories: inventory.categories.into_keys().collect(),
            items: inventory.items.into_values().collect(),
            last_sync: inventory.last_sync,
            version: inventory.version,
        }
    }
}

// =============================================================================
// Item Filter
// =============================================================================

/// Selection criteria for [`Inventory::list`].
///
/// The default filter matches every item, including soft-deleted ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub active_only: bool,
    pub low_stock_only: bool,
}

impl ItemFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn active() -> Self {
        ItemFilter {
            active_only: true,
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn low_stock(mut self) -> Self {
        self.low_stock_only = true;
        self
    }

    pub fn matches(&self, item: &Item) -> bool {
        if self.active_only && !item.is_active {
            return false;
        }
        if self.low_stock_only && !item.is_low_stock() {
            return false;
        }
        match &self.category {
            Some(category) => item.category == *category,
            None => true,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
