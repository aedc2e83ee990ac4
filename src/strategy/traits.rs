// src/strategy/traits.rs

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::strategy::config::PolicyConfig;
use statrs::statistics::Statistics;
use std::fmt::Debug;

/// Summary statistics of a daily demand sample, in kits.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandStats {
    pub observations: usize,
    pub average: f64,
    pub max: f64,
    /// Sample standard deviation (n - 1). `None` with fewer than two observations.
    pub std_dev: Option<f64>,
}

impl DemandStats {
    pub fn from_sample(demand: &[f64]) -> AnalyticsResult<Self> {
        if demand.is_empty() {
            return Err(AnalyticsError::InsufficientData {
                what: "demand sample",
                required: 1,
                available: 0,
            });
        }
        if let Some(&bad) = demand.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(AnalyticsError::invalid(
                "demand",
                bad,
                "daily demand must be finite and non-negative",
            ));
        }

        let std_dev = if demand.len() >= 2 {
            Some(demand.iter().std_dev())
        } else {
            None
        };

        Ok(Self {
            observations: demand.len(),
            average: demand.iter().mean(),
            max: Statistics::max(demand.iter()),
            std_dev,
        })
    }

    pub fn annual_demand(&self) -> f64 {
        self.average * DAYS_PER_YEAR
    }

    /// The standard deviation, or `InsufficientData` when it is undefined.
    pub fn require_std_dev(&self) -> AnalyticsResult<f64> {
        self.std_dev.ok_or(AnalyticsError::InsufficientData {
            what: "sample standard deviation",
            required: 2,
            available: self.observations,
        })
    }
}

pub const DAYS_PER_YEAR: f64 = 365.0;

/// A computed quantity together with the formula and inputs that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaValue {
    pub value: f64,
    pub formula: &'static str,
    pub inputs: Vec<(&'static str, f64)>,
}

/// Decides how much safety stock to hold on top of lead-time demand.
///
/// Every reorder point has the shape `avg * L + SS`; implementors only supply SS.
pub trait SafetyStockPolicy: Debug + Send + Sync {
    /// Short label, e.g. "conservative".
    fn name(&self) -> &'static str;

    /// Human-readable safety-stock formula.
    fn formula(&self) -> &'static str;

    fn safety_stock(&self, stats: &DemandStats, config: &PolicyConfig) -> AnalyticsResult<f64>;

    fn reorder_point(
        &self,
        stats: &DemandStats,
        config: &PolicyConfig,
    ) -> AnalyticsResult<FormulaValue> {
        let safety_stock = self.safety_stock(stats, config)?;
        let lead_time_demand = stats.average * config.lead_time_days;

        Ok(FormulaValue {
            value: lead_time_demand + safety_stock,
            formula: self.formula(),
            inputs: vec![
                ("avg_daily_demand", stats.average),
                ("lead_time_days", config.lead_time_days),
                ("safety_stock", safety_stock),
            ],
        })
    }
}
