// src/model/mod.rs

pub mod observation;
pub mod timeseries;

pub use observation::{
    kits_to_orders, Contract, ContractReading, InventoryPoint, Observation, Station,
    StationReading, KITS_PER_ORDER,
};
pub use timeseries::{ContractSummary, StationHistory, StationStats, TimeSeries};
