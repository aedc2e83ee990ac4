// src/strategy/config.rs

use crate::error::{ensure_positive, AnalyticsError, AnalyticsResult};
use crate::strategy::optimization::z_for_service_level;

/// Cost and service constants for the EOQ / reorder-point calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Fixed cost per replenishment order.
    pub order_cost: f64,
    /// Holding cost per kit per year.
    pub holding_cost: f64,
    /// Supplier lead time in days.
    pub lead_time_days: f64,
    /// Standard normal quantile of the target service level.
    pub service_z: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            order_cost: 1000.0,
            holding_cost: 1.0,
            lead_time_days: 4.0,
            service_z: 2.33, // ~99%
        }
    }
}

impl PolicyConfig {
    pub fn with_order_cost(mut self, order_cost: f64) -> Self {
        self.order_cost = order_cost;
        self
    }

    pub fn with_holding_cost(mut self, holding_cost: f64) -> Self {
        self.holding_cost = holding_cost;
        self
    }

    pub fn with_lead_time_days(mut self, lead_time_days: f64) -> Self {
        self.lead_time_days = lead_time_days;
        self
    }

    pub fn with_service_z(mut self, service_z: f64) -> Self {
        self.service_z = service_z;
        self
    }

    /// Sets `service_z` from a service level probability such as `0.99`.
    pub fn with_service_level(mut self, service_level: f64) -> AnalyticsResult<Self> {
        self.service_z = z_for_service_level(service_level)?;
        Ok(self)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_positive("order_cost", self.order_cost)?;
        ensure_positive("holding_cost", self.holding_cost)?;
        ensure_positive("lead_time_days", self.lead_time_days)?;
        if !self.service_z.is_finite() {
            return Err(AnalyticsError::invalid(
                "service_z",
                self.service_z,
                "must be a finite number",
            ));
        }
        Ok(())
    }
}
