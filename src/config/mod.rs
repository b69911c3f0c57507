//! Configuration loading and management for the reimbursement engine.
//!
//! All calibrated constants (per-diem brackets, mileage bands, receipt tiers,
//! efficiency bonus, floor and cap) are collected in [`ReimbursementConfig`].
//! The built-in [`Default`] is the legacy constant set; alternatives can be
//! loaded from YAML.
//!
//! # Example
//!
//! ```no_run
//! use travel_reimbursement::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/legacy.yaml").unwrap();
//! println!("Loaded constants: {}", config.config().metadata.name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CapConfig, ClampConfig, Comparison, ConfigMetadata, EfficiencyConfig, EfficiencyTier,
    MileageConfig, PerDiemConfig, PerDiemTier, RateBand, ReceiptSchedule, ReceiptTier,
    ReimbursementConfig,
};
