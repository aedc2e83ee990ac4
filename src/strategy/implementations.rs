// src/strategy/implementations.rs

use crate::error::AnalyticsResult;
use crate::strategy::config::PolicyConfig;
use crate::strategy::traits::{DemandStats, SafetyStockPolicy};

// =========================================================================
// 1. No Safety Stock
// =========================================================================

/// Reorder exactly when expected lead-time demand is on hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroSafetyStock;

impl SafetyStockPolicy for ZeroSafetyStock {
    fn name(&self) -> &'static str {
        "zero"
    }

    fn formula(&self) -> &'static str {
        "ROP = avg * L"
    }

    fn safety_stock(&self, _stats: &DemandStats, _config: &PolicyConfig) -> AnalyticsResult<f64> {
        Ok(0.0)
    }
}

// =========================================================================
// 2. Conservative (Peak Demand)
// =========================================================================

/// Covers every day of the lead time as if it were the busiest day seen.
///
/// SS = (max daily demand - avg daily demand) * L
#[derive(Debug, Clone, Copy, Default)]
pub struct ConservativeSafetyStock;

impl SafetyStockPolicy for ConservativeSafetyStock {
    fn name(&self) -> &'static str {
        "conservative"
    }

    fn formula(&self) -> &'static str {
        "ROP = avg * L + (max - avg) * L"
    }

    fn safety_stock(&self, stats: &DemandStats, config: &PolicyConfig) -> AnalyticsResult<f64> {
        // max >= avg, rounding aside
        Ok(((stats.max - stats.average) * config.lead_time_days).max(0.0))
    }
}

// =========================================================================
// 3. Service Level
// =========================================================================

/// SS = z * sigma, using the daily standard deviation as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceLevelSafetyStock;

impl SafetyStockPolicy for ServiceLevelSafetyStock {
    fn name(&self) -> &'static str {
        "service"
    }

    fn formula(&self) -> &'static str {
        "ROP = avg * L + z * sigma"
    }

    fn safety_stock(&self, stats: &DemandStats, config: &PolicyConfig) -> AnalyticsResult<f64> {
        Ok(config.service_z * stats.require_std_dev()?)
    }
}

// =========================================================================
// 4. Service Level over the Lead Time
// =========================================================================

/// SS = z * sigma * sqrt(L), treating daily demand as i.i.d. over the lead time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadTimeServiceLevelSafetyStock;

impl SafetyStockPolicy for LeadTimeServiceLevelSafetyStock {
    fn name(&self) -> &'static str {
        "service_leadtime"
    }

    fn formula(&self) -> &'static str {
        "ROP = avg * L + z * sigma * sqrt(L)"
    }

    fn safety_stock(&self, stats: &DemandStats, config: &PolicyConfig) -> AnalyticsResult<f64> {
        let sigma = stats.require_std_dev()?;
        Ok(config.service_z * sigma * config.lead_time_days.sqrt())
    }
}
