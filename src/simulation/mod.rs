// src/simulation/mod.rs

pub mod config;
pub mod engine;

pub use config::{CapacityScenario, StationConfig};
pub use engine::{
    CapacityModel, CapacityResult, CapacityRow, Recommendation, RecommendationBasis,
    ScenarioComparison, HOURS_PER_DAY,
};
