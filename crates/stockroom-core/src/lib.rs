//! # stockroom-core: In-Memory Inventory Tracking
//!
//! Items, the inventory aggregate that holds them, and the manager that is
//! the only way to change it. Pure logic: no files, no network, no env.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           stockroom-runtime (config, tracing, SharedInventory)  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockroom-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  manager  │  │ inventory │  │   item    │  │ validation│  │   │
//! │  │   │ add/update│  │ indexes   │  │ Item      │  │ SkuPolicy │  │   │
//! │  │   │ delete    │  │ version   │  │ ItemUpdate│  │ field     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`manager`] - `InventoryManager`, the gatekeeper
//! - [`inventory`] - `Inventory` aggregate and `ItemFilter`
//! - [`item`] - `Item` and `ItemUpdate`
//! - [`validation`] - Field validators and `SkuPolicy`
//! - [`clock`] - Injectable time source
//! - [`error`] - Domain error types
//!
//! ## Invariants
//!
//! 1. Item IDs and SKUs are unique across all stored items, soft-deleted included
//! 2. The category index holds exactly the categories of stored items
//! 3. `version` goes up by exactly one per committed mutation, together with `last_sync`
//! 4. A failed operation changes nothing

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod inventory;
pub mod item;
pub mod manager;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{InventoryError, InventoryResult, ValidationError};
pub use inventory::{Inventory, InventoryRecord, ItemFilter};
pub use item::{Item, ItemUpdate};
pub use manager::InventoryManager;
pub use validation::SkuPolicy;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default maximum SKU length (the SKU policy can lower or raise it).
pub const MAX_SKU_LENGTH: usize = 50;

pub const MAX_ITEM_ID_LENGTH: usize = 64;

pub const MAX_ITEM_NAME_LENGTH: usize = 200;

pub const MAX_CATEGORY_LENGTH: usize = 100;
