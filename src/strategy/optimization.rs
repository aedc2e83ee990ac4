// src/strategy/optimization.rs

//! Economic order quantity and reorder points.
//!
//! The calculator works in kits. Converting to whole orders for display is
//! left to callers (see [`crate::model::kits_to_orders`]).

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::strategy::config::PolicyConfig;
use crate::strategy::implementations::{
    ConservativeSafetyStock, LeadTimeServiceLevelSafetyStock, ServiceLevelSafetyStock,
    ZeroSafetyStock,
};
use crate::strategy::traits::{DemandStats, FormulaValue, SafetyStockPolicy};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, info, warn};

/// Standard normal quantile for a service level `p` in (0, 1).
pub fn z_for_service_level(p: f64) -> AnalyticsResult<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(AnalyticsError::invalid(
            "service_level",
            p,
            "must lie strictly between 0 and 1",
        ));
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|_| AnalyticsError::invalid("service_level", p, "normal distribution unavailable"))?;
    Ok(normal.inverse_cdf(p))
}

/// Calculates the Economic Order Quantity.
///
/// # Formula
/// EOQ = sqrt(2 * D * S / H)
///
/// Where D is annual demand, S the cost per order and H the yearly holding
/// cost per unit.
pub fn economic_order_quantity(
    annual_demand: f64,
    order_cost: f64,
    holding_cost: f64,
) -> AnalyticsResult<f64> {
    if !(holding_cost.is_finite() && holding_cost > 0.0) {
        return Err(AnalyticsError::invalid(
            "holding_cost",
            holding_cost,
            "must be a finite positive number",
        ));
    }
    if !(order_cost.is_finite() && order_cost > 0.0) {
        return Err(AnalyticsError::invalid(
            "order_cost",
            order_cost,
            "must be a finite positive number",
        ));
    }
    if !(annual_demand.is_finite() && annual_demand >= 0.0) {
        return Err(AnalyticsError::invalid(
            "annual_demand",
            annual_demand,
            "must be a finite non-negative number",
        ));
    }
    Ok((2.0 * annual_demand * order_cost / holding_cost).sqrt())
}

/// EOQ plus the four reorder-point variants for one demand sample.
///
/// No variant is preferred; callers pick the one that matches their policy.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryPolicy {
    pub stats: DemandStats,
    pub eoq: FormulaValue,
    pub rop_zero: FormulaValue,
    pub rop_conservative: FormulaValue,
    /// `None` when fewer than two demand observations were supplied.
    pub rop_service: Option<FormulaValue>,
    pub rop_service_leadtime: Option<FormulaValue>,
}

impl InventoryPolicy {
    /// All available reorder points, labeled, in a fixed order.
    pub fn reorder_points(&self) -> Vec<(&'static str, &FormulaValue)> {
        let mut points = vec![
            ("zero", &self.rop_zero),
            ("conservative", &self.rop_conservative),
        ];
        if let Some(rop) = &self.rop_service {
            points.push(("service", rop));
        }
        if let Some(rop) = &self.rop_service_leadtime {
            points.push(("service_leadtime", rop));
        }
        points
    }
}

#[derive(Debug, Clone, Default)]
pub struct InventoryPolicyCalculator {
    config: PolicyConfig,
}

impl InventoryPolicyCalculator {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn eoq(&self, stats: &DemandStats) -> AnalyticsResult<FormulaValue> {
        self.config.validate()?;
        let annual_demand = stats.annual_demand();
        let value =
            economic_order_quantity(annual_demand, self.config.order_cost, self.config.holding_cost)?;

        Ok(FormulaValue {
            value,
            formula: "EOQ = sqrt(2 * D * S / H)",
            inputs: vec![
                ("annual_demand", annual_demand),
                ("order_cost", self.config.order_cost),
                ("holding_cost", self.config.holding_cost),
            ],
        })
    }

    /// Reorder point under an arbitrary safety-stock rule.
    pub fn reorder_point(
        &self,
        policy: &dyn SafetyStockPolicy,
        stats: &DemandStats,
    ) -> AnalyticsResult<FormulaValue> {
        self.config.validate()?;
        policy.reorder_point(stats, &self.config)
    }

    /// Computes EOQ and every reorder-point variant from daily demand.
    ///
    /// Service-level variants are left empty rather than failing the whole
    /// calculation when the sample is too short for a standard deviation.
    pub fn calculate(&self, demand: &[f64]) -> AnalyticsResult<InventoryPolicy> {
        self.config.validate()?;
        let stats = DemandStats::from_sample(demand)?;
        debug!(
            observations = stats.observations,
            average = stats.average,
            max = stats.max,
            std_dev = ?stats.std_dev,
            "demand statistics"
        );

        let eoq = self.eoq(&stats)?;
        let rop_zero = ZeroSafetyStock.reorder_point(&stats, &self.config)?;
        let rop_conservative = ConservativeSafetyStock.reorder_point(&stats, &self.config)?;
        let rop_service = optional(ServiceLevelSafetyStock.reorder_point(&stats, &self.config))?;
        let rop_service_leadtime =
            optional(LeadTimeServiceLevelSafetyStock.reorder_point(&stats, &self.config))?;

        if rop_service.is_none() {
            warn!(
                observations = stats.observations,
                "service-level reorder points need at least two days of demand"
            );
        }
        info!(
            eoq = eoq.value,
            rop_zero = rop_zero.value,
            rop_conservative = rop_conservative.value,
            "inventory policy computed"
        );

        Ok(InventoryPolicy {
            stats,
            eoq,
            rop_zero,
            rop_conservative,
            rop_service,
            rop_service_leadtime,
        })
    }
}

/// Turns `InsufficientData` into `None`, keeping every other error.
fn optional<T>(result: AnalyticsResult<T>) -> AnalyticsResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AnalyticsError::InsufficientData { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}
