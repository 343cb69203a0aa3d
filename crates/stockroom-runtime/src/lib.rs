//! # stockroom-runtime
//!
//! Process-level wiring for `stockroom-core`.
//!
//! ## Startup Sequence
//! ```text
//! StockroomConfig::load(path)      defaults → stockroom.toml → STOCKROOM_*
//!        │
//!        ▼
//! init_tracing(&config.logging)    RUST_LOG or configured filter
//!        │
//!        ▼
//! SharedInventory::from_config     Arc<Mutex<InventoryManager>>
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use stockroom_core::Item;
//! use stockroom_runtime::bootstrap;
//!
//! let inventory = bootstrap(None).expect("stockroom starts");
//! inventory
//!     .add_item(Item::new(Item::generate_id(), "COKE-330", "Coca-Cola 330ml", "drinks"))
//!     .expect("item added");
//! ```

pub mod config;
pub mod error;
pub mod shared;
pub mod telemetry;

use std::path::PathBuf;

use tracing::info;

pub use config::{LogFormat, LoggingSettings, SkuSettings, StockroomConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use shared::SharedInventory;
pub use telemetry::init_tracing;

/// Loads config, installs tracing, and returns an empty shared inventory.
pub fn bootstrap(config_path: Option<PathBuf>) -> RuntimeResult<SharedInventory> {
    let config = StockroomConfig::load(config_path)?;
    init_tracing(&config.logging)?;

    info!(format = %config.logging.format, "Stockroom runtime ready");
    Ok(SharedInventory::from_config(&config))
}
