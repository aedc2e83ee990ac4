// src/simulation/config.rs

use crate::error::{ensure_positive, AnalyticsError, AnalyticsResult};
use crate::model::Station;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationConfig {
    pub processing_time_hours_per_job: f64,
    pub machine_count: u32,
}

impl StationConfig {
    pub fn new(processing_time_hours_per_job: f64, machine_count: u32) -> Self {
        Self {
            processing_time_hours_per_job,
            machine_count,
        }
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_positive("processing_time_hours_per_job", self.processing_time_hours_per_job)?;
        if self.machine_count < 1 {
            return Err(AnalyticsError::invalid(
                "machine_count",
                f64::from(self.machine_count),
                "every station needs at least one machine",
            ));
        }
        Ok(())
    }
}

/// Machine allocation the caller wants evaluated.
///
/// Owned by the caller and passed to the capacity model on every call; the
/// model keeps nothing between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityScenario {
    stations: BTreeMap<Station, StationConfig>,
}

impl Default for CapacityScenario {
    fn default() -> Self {
        Self::littlefield_default()
    }
}

impl CapacityScenario {
    pub fn new(stations: impl IntoIterator<Item = (Station, StationConfig)>) -> Self {
        Self {
            stations: stations.into_iter().collect(),
        }
    }

    /// Processing times of the Littlefield exercise, one machine per station.
    pub fn littlefield_default() -> Self {
        Self::new([
            (Station::One, StationConfig::new(4.4, 1)),
            (Station::Two, StationConfig::new(3.2, 1)),
            (Station::Three, StationConfig::new(1.6, 1)),
        ])
    }

    /// Replaces the machine counts, station by station.
    pub fn with_machine_counts(mut self, counts: &[(Station, u32)]) -> Self {
        for &(station, count) in counts {
            if let Some(config) = self.stations.get_mut(&station) {
                config.machine_count = count;
            }
        }
        self
    }

    pub fn stations(&self) -> impl Iterator<Item = (Station, &StationConfig)> {
        self.stations.iter().map(|(station, config)| (*station, config))
    }

    pub fn station(&self, station: Station) -> Option<&StationConfig> {
        self.stations.get(&station)
    }

    /// Adds one machine to `station`. Capacities must be recomputed afterwards.
    pub fn add_machine(&mut self, station: Station) -> AnalyticsResult<()> {
        let config = self.stations.get_mut(&station).ok_or_else(|| {
            AnalyticsError::Schema(format!("{station} is not part of the scenario"))
        })?;
        config.machine_count += 1;
        Ok(())
    }

    pub fn with_added_machine(&self, station: Station) -> AnalyticsResult<Self> {
        let mut next = self.clone();
        next.add_machine(station)?;
        Ok(next)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.stations.is_empty() {
            return Err(AnalyticsError::Schema("scenario has no stations".into()));
        }
        self.stations.values().try_for_each(StationConfig::validate)
    }
}
