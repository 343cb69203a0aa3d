//! # Items
//!
//! The stock item record and the partial update applied to it.
//!
//! ## Dual-Key Identity
//! Every item has:
//! - `id`: immutable, the key of the inventory map
//! - `sku`: human-readable business key, unique but mutable via `update_item`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::{InventoryError, InventoryResult};
use crate::validation::{
    validate_category, validate_item_id, validate_item_name, validate_price_cents,
    validate_stock_bounds, validate_stock_level,
};

// =============================================================================
// Item
// =============================================================================

/// A stock item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier. Never changes after creation.
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    pub category: String,

    #[serde(default)]
    pub supplier: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units on hand.
    #[serde(default)]
    pub quantity: i64,

    /// Reorder threshold.
    #[serde(default)]
    pub min_stock: i64,

    /// Stock ceiling.
    #[serde(default)]
    pub max_stock: i64,

    /// Whether the item is active (false = soft-deleted).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    /// Stamped by the manager on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Creates an active item with zero price and stock.
    ///
    /// Timestamps are provisional, read from [`SystemClock`]; the manager
    /// restamps them from its own clock when the item is added.
    pub fn new(
        id: impl Into<String>,
        sku: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let now = SystemClock.now();
        Item {
            id: id.into(),
            sku: sku.into(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            supplier: String::new(),
            price_cents: 0,
            quantity: 0,
            min_stock: 0,
            max_stock: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Generates a fresh item ID (UUID v4).
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into();
        self
    }

    pub fn with_price_cents(mut self, price_cents: i64) -> Self {
        self.price_cents = price_cents;
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_stock_limits(mut self, min_stock: i64, max_stock: i64) -> Self {
        self.min_stock = min_stock;
        self.max_stock = max_stock;
        self
    }

    /// Checks the item's own fields.
    ///
    /// ## Rules
    /// | Field | Rule | Error |
    /// |-------|------|-------|
    /// | id | non-blank, ≤ 64 chars | `InvalidArgument` |
    /// | category | non-blank, ≤ 100 chars | `InvalidArgument` |
    /// | name | non-blank, ≤ 200 chars | `InvalidItemName` |
    /// | price_cents | ≥ 0 | `InvalidPrice` |
    /// | quantity | ≥ 0 | `InvalidQuantity` |
    /// | min_stock | ≥ 0 | `InvalidMinStock` |
    /// | max_stock | ≥ 0; ≥ min_stock unless 0 (no ceiling) | `InvalidMaxStock` |
    ///
    /// SKU syntax is not checked here; it depends on the manager's policy.
    pub fn validate(&self) -> InventoryResult<()> {
        validate_item_id(&self.id).map_err(|e| InventoryError::InvalidArgument(e.to_string()))?;
        validate_category(&self.category)
            .map_err(|e| InventoryError::InvalidArgument(e.to_string()))?;
        validate_item_name(&self.name).map_err(InventoryError::InvalidItemName)?;
        validate_price_cents(self.price_cents).map_err(InventoryError::InvalidPrice)?;
        validate_stock_level("quantity", self.quantity).map_err(InventoryError::InvalidQuantity)?;
        validate_stock_level("min_stock", self.min_stock)
            .map_err(InventoryError::InvalidMinStock)?;
        validate_stock_level("max_stock", self.max_stock)
            .map_err(InventoryError::InvalidMaxStock)?;
        validate_stock_bounds(self.min_stock, self.max_stock)
            .map_err(InventoryError::InvalidMaxStock)?;
        Ok(())
    }

    /// True when stock is at or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

// =============================================================================
// Item Update
// =============================================================================

/// A partial update: `None` leaves a field alone, `Some` overwrites it.
///
/// `Some(String::new())` really does clear a text field, and
/// `Some(-1)` really is a negative number that validation will reject.
///
/// ## Usage
/// ```rust
/// use stockroom_core::ItemUpdate;
///
/// let update = ItemUpdate::new().name("Coca-Cola 500ml").price_cents(249);
/// assert!(!update.is_empty());
/// assert!(ItemUpdate::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemUpdate {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub price_cents: Option<i64>,
    pub quantity: Option<i64>,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
}

impl ItemUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn price_cents(mut self, price_cents: i64) -> Self {
        self.price_cents = Some(price_cents);
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn stock_limits(mut self, min_stock: i64, max_stock: i64) -> Self {
        self.min_stock = Some(min_stock);
        self.max_stock = Some(max_stock);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == ItemUpdate::default()
    }

    /// Returns a copy of `item` with every present field overwritten.
    ///
    /// Does not validate and does not stamp timestamps.
    pub fn merged_into(&self, item: &Item) -> Item {
        let mut merged = item.clone();

        if let Some(sku) = &self.sku {
            merged.sku = sku.clone();
        }
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(description) = &self.description {
            merged.description = description.clone();
        }
        if let Some(category) = &self.category {
            merged.category = category.clone();
        }
        if let Some(supplier) = &self.supplier {
            merged.supplier = supplier.clone();
        }
        if let Some(price_cents) = self.price_cents {
            merged.price_cents = price_cents;
        }
        if let Some(quantity) = self.quantity {
            merged.quantity = quantity;
        }
        if let Some(min_stock) = self.min_stock {
            merged.min_stock = min_stock;
        }
        if let Some(max_stock) = self.max_stock {
            merged.max_stock = max_stock;
        }

        merged
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cola() -> Item {
        Item::new("item-1", "COKE-330", "Coca-Cola 330ml", "drinks")
            .with_price_cents(199)
            .with_quantity(24)
            .with_stock_limits(6, 48)
    }

    #[test]
    fn test_valid_item_passes() {
        assert!(cola().validate().is_ok());
        assert!(cola().is_active);
    }

    #[test]
    fn test_validate_maps_field_errors() {
        let err = Item { name: String::new(), ..cola() }.validate().unwrap_err();
        assert!(matches!(err, InventoryError::InvalidItemName(_)));

        let err = cola().with_price_cents(-1).validate().unwrap_err();
        assert!(matches!(err, InventoryError::InvalidPrice(_)));

        let err = cola().with_quantity(-3).validate().unwrap_err();
        assert!(matches!(err, InventoryError::InvalidQuantity(_)));

        let err = cola().with_stock_limits(-1, 10).validate().unwrap_err();
        assert!(matches!(err, InventoryError::InvalidMinStock(_)));

        let err = cola().with_stock_limits(10, 5).validate().unwrap_err();
        assert!(matches!(err, InventoryError::InvalidMaxStock(_)));

        assert!(cola().with_stock_limits(10, 0).validate().is_ok());

        let err = Item { id: " ".to_string(), ..cola() }.validate().unwrap_err();
        assert!(matches!(err, InventoryError::InvalidArgument(_)));

        let err = Item { category: String::new(), ..cola() }.validate().unwrap_err();
        assert!(matches!(err, InventoryError::InvalidArgument(_)));
    }

    #[test]
    fn test_low_stock() {
        assert!(!cola().is_low_stock());
        assert!(cola().with_quantity(6).is_low_stock());
    }

    #[test]
    fn test_generate_id_is_unique() {
        assert_ne!(Item::generate_id(), Item::generate_id());
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let item = cola();
        assert_eq!(ItemUpdate::default().merged_into(&item), item);
    }

    #[test]
    fn test_update_overwrites_only_present_fields() {
        let item = cola().with_supplier("Bottlers Inc");
        let update = ItemUpdate::new().name("Cola Zero").price_cents(0).supplier("");
        let merged = update.merged_into(&item);

        assert_eq!(merged.name, "Cola Zero");
        assert_eq!(merged.price_cents, 0);
        assert_eq!(merged.supplier, "");
        assert_eq!(merged.sku, item.sku);
        assert_eq!(merged.category, item.category);
        assert_eq!(merged.quantity, item.quantity);
    }

    #[test]
    fn test_update_deserializes_missing_fields_as_absent() {
        let update: ItemUpdate = serde_json::from_str(r#"{"name":"Fanta"}"#).unwrap();
        assert_eq!(update, ItemUpdate::new().name("Fanta"));
    }
}
