//! # Validation Module
//!
//! Field validators used by [`Item::validate`](crate::Item::validate) and the
//! SKU syntax policy applied by [`InventoryManager`](crate::InventoryManager).
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Item::validate()                                             │
//! │  ├── Required fields (id, name, category)                              │
//! │  └── Numeric rules (price >= 0, min_stock <= max_stock, ...)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: SkuPolicy (THIS MODULE)                                      │
//! │  └── SKU syntax, configurable length / case                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: InventoryManager                                             │
//! │  └── Uniqueness of ID and SKU across the inventory                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_sku, validate_price_cents};
//!
//! assert!(validate_sku("COKE-330").is_ok());
//! assert!(validate_price_cents(-1).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::{MAX_CATEGORY_LENGTH, MAX_ITEM_ID_LENGTH, MAX_ITEM_NAME_LENGTH, MAX_SKU_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// SKU Policy
// =============================================================================

/// Syntax rules for SKUs.
///
/// ## Rules
/// - Must not be empty
/// - At most `max_length` characters
/// - Only ASCII letters, digits, hyphens, underscores
/// - Lowercase letters only when `allow_lowercase` is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuPolicy {
    pub max_length: usize,
    pub allow_lowercase: bool,
}

impl Default for SkuPolicy {
    fn default() -> Self {
        SkuPolicy {
            max_length: MAX_SKU_LENGTH,
            allow_lowercase: true,
        }
    }
}

impl SkuPolicy {
    /// Validates a SKU against this policy. Pure, no side effects.
    pub fn validate(&self, sku: &str) -> ValidationResult<()> {
        if sku.is_empty() {
            return Err(required("sku"));
        }

        if sku.chars().count() > self.max_length {
            return Err(ValidationError::TooLong {
                field: "sku".to_string(),
                max: self.max_length,
            });
        }

        if !sku
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidFormat {
                field: "sku".to_string(),
                reason: "must contain only letters, numbers, hyphens, and underscores"
                    .to_string(),
            });
        }

        if !self.allow_lowercase && sku.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidFormat {
                field: "sku".to_string(),
                reason: "must be uppercase".to_string(),
            });
        }

        Ok(())
    }

    /// Boolean form of [`SkuPolicy::validate`].
    pub fn is_valid(&self, sku: &str) -> bool {
        self.validate(sku).is_ok()
    }
}

/// Validates a SKU with the default policy.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_sku;
///
/// assert!(validate_sku("COKE-330").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    SkuPolicy::default().validate(sku)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item ID: non-blank, at most 64 characters.
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    required_text("id", id, MAX_ITEM_ID_LENGTH)
}

/// Validates an item name: non-blank, at most 200 characters.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Coca-Cola 330ml").is_ok());
/// assert!(validate_item_name("").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    required_text("name", name, MAX_ITEM_NAME_LENGTH)
}

/// Validates a category name: non-blank, at most 100 characters.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    required_text("category", category, MAX_CATEGORY_LENGTH)
}

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    non_negative("price", cents)
}

/// Validates a stock level (quantity, min_stock, max_stock): must be >= 0.
pub fn validate_stock_level(field: &str, value: i64) -> ValidationResult<()> {
    non_negative(field, value)
}

/// Validates that the stock ceiling is not below the floor.
///
/// A `max_stock` of 0 means the item has no ceiling.
pub fn validate_stock_bounds(min_stock: i64, max_stock: i64) -> ValidationResult<()> {
    if max_stock != 0 && max_stock < min_stock {
        return Err(ValidationError::MustNotExceed {
            field: "max_stock".to_string(),
            value: max_stock,
            other_field: "min_stock".to_string(),
            other_value: min_stock,
        });
    }

    Ok(())
}

fn non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
