// src/model/timeseries.rs

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::model::observation::{Contract, InventoryPoint, Observation, Station};
use std::collections::BTreeMap;

/// Read-only, day-ordered table of factory observations.
///
/// Days are unique and strictly increasing. Gaps between days are allowed;
/// anything measured in days uses the `day` values, never row positions.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

/// Mean queue length and utilization of one station over a day range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationStats {
    pub mean_queue: f64,
    pub mean_utilization: f64,
}

/// Per-station history averaged over the days the caller selected.
#[derive(Debug, Clone, PartialEq)]
pub struct StationHistory {
    pub from_day: u32,
    pub days: usize,
    pub stats: BTreeMap<Station, StationStats>,
}

impl StationHistory {
    pub fn get(&self, station: Station) -> Option<&StationStats> {
        self.stats.get(&station)
    }
}

/// Business-overview aggregates for one contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractSummary {
    pub contract: Contract,
    pub mean_revenue: f64,
    pub mean_lead_time: f64,
    pub total_completed: u64,
}

impl TimeSeries {
    /// Validates and wraps the observations.
    pub fn new(observations: Vec<Observation>) -> AnalyticsResult<Self> {
        if observations.is_empty() {
            return Err(AnalyticsError::Schema("time series has no rows".into()));
        }

        let mut previous_day = 0;
        for obs in &observations {
            if obs.day == 0 {
                return Err(AnalyticsError::Schema("day numbers start at 1".into()));
            }
            if obs.day <= previous_day {
                return Err(AnalyticsError::Schema(format!(
                    "day {} does not follow day {} (days must be unique and increasing)",
                    obs.day, previous_day
                )));
            }
            previous_day = obs.day;
            validate_observation(obs)?;
        }

        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_day(&self) -> u32 {
        self.observations.first().map_or(0, |o| o.day)
    }

    pub fn last_day(&self) -> u32 {
        self.observations.last().map_or(0, |o| o.day)
    }

    /// Daily demand in kits, in day order.
    pub fn demand(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.demand).collect()
    }

    /// Inventory levels, failing if any row lacks one.
    pub fn inventory_points(&self) -> AnalyticsResult<Vec<InventoryPoint>> {
        self.observations
            .iter()
            .map(|o| {
                o.inventory_level
                    .map(|level| InventoryPoint::new(o.day, level))
                    .ok_or_else(|| {
                        AnalyticsError::Schema(format!("day {} has no inventory_level", o.day))
                    })
            })
            .collect()
    }

    /// Mean queue and utilization per station over days `>= from_day`.
    pub fn station_history(&self, from_day: u32) -> AnalyticsResult<StationHistory> {
        let window: Vec<&Observation> = self
            .observations
            .iter()
            .filter(|o| o.day >= from_day)
            .collect();

        if window.is_empty() {
            return Err(AnalyticsError::InsufficientData {
                what: "station history window",
                required: 1,
                available: 0,
            });
        }

        let n = window.len() as f64;
        let stats = Station::ALL
            .iter()
            .map(|&station| {
                let (queue, utilization) = window.iter().fold((0.0, 0.0), |(q, u), o| {
                    let reading = o.station(station);
                    (q + reading.queue, u + reading.utilization)
                });
                (
                    station,
                    StationStats {
                        mean_queue: queue / n,
                        mean_utilization: utilization / n,
                    },
                )
            })
            .collect();

        Ok(StationHistory {
            from_day,
            days: window.len(),
            stats,
        })
    }

    pub fn contract_summary(&self, contract: Contract) -> ContractSummary {
        let n = self.observations.len().max(1) as f64;
        let (revenue, lead_time, completed) =
            self.observations
                .iter()
                .fold((0.0, 0.0, 0u64), |(r, l, c), o| {
                    let reading = o.contract(contract);
                    (
                        r + reading.revenue,
                        l + reading.lead_time,
                        c + u64::from(reading.completed),
                    )
                });

        ContractSummary {
            contract,
            mean_revenue: revenue / n,
            mean_lead_time: lead_time / n,
            total_completed: completed,
        }
    }
}

fn validate_observation(obs: &Observation) -> AnalyticsResult<()> {
    let bad = |field: String, value: f64| {
        AnalyticsError::Schema(format!("day {}: {} = {} is out of range", obs.day, field, value))
    };

    if !non_negative(obs.demand) {
        return Err(bad("demand".into(), obs.demand));
    }
    if let Some(level) = obs.inventory_level {
        if !non_negative(level) {
            return Err(bad("inventory_level".into(), level));
        }
    }
    for station in Station::ALL {
        let reading = obs.station(station);
        if !(0.0..=1.0).contains(&reading.utilization) {
            return Err(bad(
                format!("utilization_station_{}", station.number()),
                reading.utilization,
            ));
        }
        if !non_negative(reading.queue) {
            return Err(bad(format!("queue_station_{}", station.number()), reading.queue));
        }
    }
    for contract in Contract::ALL {
        let reading = obs.contract(contract);
        if !reading.revenue.is_finite() {
            return Err(bad(
                format!("revenue_contract_{}", contract.number()),
                reading.revenue,
            ));
        }
        if !non_negative(reading.lead_time) {
            return Err(bad(
                format!("lead_time_contract_{}", contract.number()),
                reading.lead_time,
            ));
        }
    }
    Ok(())
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
