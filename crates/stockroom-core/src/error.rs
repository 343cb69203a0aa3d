//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── InventoryError   - What InventoryManager operations return         │
//! │  └── ValidationError  - Why a single field was rejected                 │
//! │                                                                         │
//! │  stockroom-runtime errors (separate crate)                             │
//! │  └── RuntimeError     - Config / telemetry failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → InventoryError → RuntimeError                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field-level variants (`InvalidItemName`, `InvalidPrice`, ...) carry the
//! `ValidationError` that explains the rejection as their `source()`.

use thiserror::Error;

// =============================================================================
// Inventory Error
// =============================================================================

/// Errors returned by inventory operations.
///
/// Every failure is surfaced to the caller as one of these variants. A failed
/// operation never commits: item content, `version` and `last_sync` are left
/// exactly as they were.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A required input is absent (empty ID, empty category, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No item with this ID exists in the inventory.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Another item already uses this ID or SKU.
    ///
    /// ## When This Occurs
    /// - `add_item` with an ID that is already present
    /// - `add_item` or `update_item` with a SKU owned by another item
    /// - Soft-deleted items still hold their ID and SKU
    #[error("Item already exists: {field} '{value}' is taken")]
    ItemAlreadyExists { field: String, value: String },

    /// SKU failed syntax validation.
    #[error("Invalid SKU '{sku}': {source}")]
    InvalidSku {
        sku: String,
        #[source]
        source: ValidationError,
    },

    #[error("Invalid item name: {0}")]
    InvalidItemName(#[source] ValidationError),

    #[error("Invalid price: {0}")]
    InvalidPrice(#[source] ValidationError),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(#[source] ValidationError),

    #[error("Invalid minimum stock: {0}")]
    InvalidMinStock(#[source] ValidationError),

    #[error("Invalid maximum stock: {0}")]
    InvalidMaxStock(#[source] ValidationError),

    /// Insufficient stock to satisfy a request.
    ///
    /// The version counter is at its ceiling; no further commit is possible.
    #[error("Inventory version counter exhausted at {0}")]
    VersionExhausted(u64),

    /// Reserved for stock-movement operations; nothing in this crate raises
    /// it yet.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },
}

impl InventoryError {
    /// Creates an ItemAlreadyExists error for a given key field.
    pub fn already_exists(field: impl Into<String>, value: impl Into<String>) -> Self {
        InventoryError::ItemAlreadyExists {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an ItemNotFound error.
    pub fn not_found(id: impl Into<String>) -> Self {
        InventoryError::ItemNotFound(id.into())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These describe *why* a single value was rejected. Inventory operations
/// wrap them in the matching [`InventoryError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., forbidden characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// One bound exceeds the other (e.g., min_stock > max_stock).
    #[error("{field} ({value}) must not be less than {other_field} ({other_value})")]
    MustNotExceed {
        field: String,
        value: i64,
        other_field: String,
        other_value: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with InventoryError.
pub type InventoryResult<T> = Result<T, InventoryError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_messages() {
        let err = InventoryError::already_exists("sku", "COKE-330");
        assert_eq!(
            err.to_string(),
            "Item already exists: sku 'COKE-330' is taken"
        );

        let err = InventoryError::not_found("item-9");
        assert_eq!(err.to_string(), "Item not found: item-9");
    }

    #[test]
    fn test_version_exhausted_message() {
        let err = InventoryError::VersionExhausted(u64::MAX);
        assert_eq!(
            err.to_string(),
            format!("Inventory version counter exhausted at {}", u64::MAX)
        );
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = InventoryError::InsufficientStock {
            sku: "COKE-330".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for COKE-330: available 3, requested 5"
        );
    }

    #[test]
    fn test_field_errors_expose_source() {
        let err = InventoryError::InvalidPrice(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
        let source = err.source().expect("price error has a source");
        assert!(source.to_string().starts_with("price must be between 0"));
    }

    #[test]
    fn test_must_not_exceed_message() {
        let err = ValidationError::MustNotExceed {
            field: "max_stock".to_string(),
            value: 5,
            other_field: "min_stock".to_string(),
            other_value: 10,
        };
        assert_eq!(
            err.to_string(),
            "max_stock (5) must not be less than min_stock (10)"
        );
    }
}
