// src/strategy/mod.rs

pub mod config;
pub mod implementations;
pub mod optimization;
pub mod traits;

pub use config::PolicyConfig;
pub use implementations::{
    ConservativeSafetyStock, LeadTimeServiceLevelSafetyStock, ServiceLevelSafetyStock,
    ZeroSafetyStock,
};
pub use optimization::{
    economic_order_quantity, z_for_service_level, InventoryPolicy, InventoryPolicyCalculator,
};
pub use traits::{DemandStats, FormulaValue, SafetyStockPolicy, DAYS_PER_YEAR};
