// src/simulation/engine.rs

//! Closed-form capacity model: station throughput, bottlenecks and cycle time.

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::model::{Station, StationHistory, StationStats};
use crate::simulation::config::CapacityScenario;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Hours in the day budget each machine works.
pub const HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CapacityResult {
    /// Relative throughput, machines / processing hours per job.
    pub capacity_per_station: BTreeMap<Station, f64>,
    pub min_capacity: f64,
    /// Never empty; more than one entry means tied bottlenecks.
    pub bottleneck_stations: BTreeSet<Station>,
    pub cycle_time_hours: f64,
}

impl CapacityResult {
    pub fn capacity(&self, station: Station) -> Option<f64> {
        self.capacity_per_station.get(&station).copied()
    }

    pub fn has_tied_bottlenecks(&self) -> bool {
        self.bottleneck_stations.len() > 1
    }

    /// Flat rows for CSV export.
    pub fn rows(&self) -> Vec<CapacityRow> {
        self.capacity_per_station
            .iter()
            .map(|(station, capacity)| CapacityRow {
                station: station.number(),
                capacity: *capacity,
                bottleneck: self.bottleneck_stations.contains(station),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CapacityRow {
    pub station: u8,
    pub capacity: f64,
    pub bottleneck: bool,
}

/// Why a station was picked for the next machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationBasis {
    SingleBottleneck,
    QueueLength,
    Utilization,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub station: Station,
    pub basis: RecommendationBasis,
}

/// Capacity before and after adding one machine to a station.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioComparison {
    pub added_to: Station,
    pub before: CapacityResult,
    pub after: CapacityResult,
}

impl ScenarioComparison {
    pub fn cycle_time_saved_hours(&self) -> f64 {
        self.before.cycle_time_hours - self.after.cycle_time_hours
    }
}

pub struct CapacityModel;

impl CapacityModel {
    /// Evaluates a machine allocation from scratch.
    pub fn evaluate(scenario: &CapacityScenario) -> AnalyticsResult<CapacityResult> {
        scenario.validate()?;

        let capacity_per_station: BTreeMap<Station, f64> = scenario
            .stations()
            .map(|(station, config)| {
                (
                    station,
                    f64::from(config.machine_count) / config.processing_time_hours_per_job,
                )
            })
            .collect();

        let min_capacity = capacity_per_station
            .values()
            .copied()
            .fold(f64::INFINITY, f64::min);

        // Exact comparison; every capacity below was produced the same way as the minimum.
        let bottleneck_stations: BTreeSet<Station> = capacity_per_station
            .iter()
            .filter(|(_, capacity)| **capacity == min_capacity)
            .map(|(station, _)| *station)
            .collect();

        let cycle_time_hours = HOURS_PER_DAY / min_capacity;

        debug!(?capacity_per_station, "station capacities");
        info!(
            min_capacity,
            cycle_time_hours,
            bottlenecks = ?bottleneck_stations,
            "capacity evaluated"
        );

        Ok(CapacityResult {
            capacity_per_station,
            min_capacity,
            bottleneck_stations,
            cycle_time_hours,
        })
    }

    /// Re-evaluates the scenario with one more machine at `station`.
    pub fn compare(
        scenario: &CapacityScenario,
        station: Station,
    ) -> AnalyticsResult<ScenarioComparison> {
        let before = Self::evaluate(scenario)?;
        let after = Self::evaluate(&scenario.with_added_machine(station)?)?;
        Ok(ScenarioComparison {
            added_to: station,
            before,
            after,
        })
    }

    /// Picks the bottleneck station that should get the next machine.
    ///
    /// Tied bottlenecks go to the longest mean queue. When every tied station
    /// has the same mean queue, the highest mean utilization wins instead.
    /// Any tie left over goes to the lowest-numbered station.
    pub fn recommend(
        result: &CapacityResult,
        history: &StationHistory,
    ) -> AnalyticsResult<Recommendation> {
        let first = result.bottleneck_stations.first().copied().ok_or_else(|| {
            AnalyticsError::Schema("capacity result has no bottleneck station".into())
        })?;

        if !result.has_tied_bottlenecks() {
            return Ok(Recommendation {
                station: first,
                basis: RecommendationBasis::SingleBottleneck,
            });
        }

        let candidates = result
            .bottleneck_stations
            .iter()
            .map(|&station| {
                history.get(station).map(|stats| (station, *stats)).ok_or_else(|| {
                    AnalyticsError::Schema(format!("no queue/utilization history for {station}"))
                })
            })
            .collect::<AnalyticsResult<Vec<_>>>()?;

        let first_queue = candidates[0].1.mean_queue;
        let queues_all_equal = candidates.iter().all(|(_, s)| s.mean_queue == first_queue);

        let basis = if queues_all_equal {
            RecommendationBasis::Utilization
        } else {
            RecommendationBasis::QueueLength
        };

        let mut leaders = if queues_all_equal {
            candidates
        } else {
            top_by(&candidates, |s| s.mean_queue)
        };
        // Partial queue ties fall back to utilization among the leaders.
        if leaders.len() > 1 {
            leaders = top_by(&leaders, |s| s.mean_utilization);
        }
        let station = leaders.first().map_or(first, |(station, _)| *station);

        info!(%station, ?basis, "machine recommendation");
        Ok(Recommendation { station, basis })
    }
}

/// Entries sharing the maximum of `key`, in station order.
fn top_by(
    candidates: &[(Station, StationStats)],
    key: impl Fn(&StationStats) -> f64,
) -> Vec<(Station, StationStats)> {
    let top = candidates
        .iter()
        .map(|(_, stats)| key(stats))
        .fold(f64::NEG_INFINITY, f64::max);
    candidates
        .iter()
        .filter(|(_, stats)| key(stats) == top)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Observation, TimeSeries};
    use crate::simulation::config::StationConfig;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn history(rows: &[(Station, f64, f64)]) -> StationHistory {
        let obs = rows
            .iter()
            .fold(Observation::new(1, 0.0), |obs, &(station, util, queue)| {
                obs.with_station(station, util, queue)
            });
        TimeSeries::new(vec![obs]).unwrap().station_history(1).unwrap()
    }

    fn tied_scenario() -> CapacityScenario {
        // Stations 1 and 2 both at 0.5 jobs per hour.
        CapacityScenario::new([
            (Station::One, StationConfig::new(2.0, 1)),
            (Station::Two, StationConfig::new(4.0, 2)),
            (Station::Three, StationConfig::new(1.0, 1)),
        ])
    }

    #[test]
    fn test_littlefield_defaults() {
        let result = CapacityModel::evaluate(&CapacityScenario::default()).unwrap();

        assert!((result.capacity(Station::One).unwrap() - 1.0 / 4.4).abs() < 1e-12);
        assert_eq!(
            result.bottleneck_stations,
            BTreeSet::from([Station::One])
        );
        assert!((result.cycle_time_hours - 24.0 * 4.4).abs() < 1e-9);
    }

    #[test]
    fn test_ties_are_reported() {
        let result = CapacityModel::evaluate(&tied_scenario()).unwrap();
        assert_eq!(
            result.bottleneck_stations,
            BTreeSet::from([Station::One, Station::Two])
        );
        assert!(result.has_tied_bottlenecks());
        assert_eq!(result.cycle_time_hours, 48.0);
    }

    #[test]
    fn test_invalid_scenarios_fail() {
        let zero_time = CapacityScenario::new([(Station::One, StationConfig::new(0.0, 1))]);
        assert!(matches!(
            CapacityModel::evaluate(&zero_time),
            Err(AnalyticsError::InvalidParameter { .. })
        ));
        let no_machines = CapacityScenario::default().with_machine_counts(&[(Station::One, 0)]);
        assert!(CapacityModel::evaluate(&no_machines).is_err());
    }

    #[test]
    fn test_adding_machine_moves_bottleneck() {
        let comparison = CapacityModel::compare(&CapacityScenario::default(), Station::One).unwrap();

        assert_eq!(
            comparison.after.bottleneck_stations,
            BTreeSet::from([Station::Two])
        );
        assert!((comparison.after.cycle_time_hours - 24.0 * 3.2).abs() < 1e-9);
        assert!(comparison.cycle_time_saved_hours() > 0.0);
    }

    #[test]
    fn test_capacity_monotonic_and_bottleneck_non_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let scenario = CapacityScenario::new(Station::ALL.map(|station| {
                (
                    station,
                    StationConfig::new(rng.gen_range(0.1..10.0), rng.gen_range(1..6)),
                )
            }));
            let station = Station::ALL[rng.gen_range(0..3)];

            let comparison = CapacityModel::compare(&scenario, station).unwrap();
            assert!(!comparison.before.bottleneck_stations.is_empty());
            assert!(!comparison.after.bottleneck_stations.is_empty());
            assert!(comparison.after.capacity(station) > comparison.before.capacity(station));
            assert!(comparison.after.min_capacity >= comparison.before.min_capacity);
        }
    }

    #[test]
    fn test_single_bottleneck_recommendation() {
        let result = CapacityModel::evaluate(&CapacityScenario::default()).unwrap();
        let hist = history(&[(Station::Three, 1.0, 99.0)]);
        let rec = CapacityModel::recommend(&result, &hist).unwrap();
        assert_eq!(rec.station, Station::One);
        assert_eq!(rec.basis, RecommendationBasis::SingleBottleneck);
    }

    #[test]
    fn test_tie_broken_by_queue() {
        let result = CapacityModel::evaluate(&tied_scenario()).unwrap();
        let hist = history(&[
            (Station::One, 0.9, 5.0),
            (Station::Two, 0.4, 12.0),
            (Station::Three, 1.0, 50.0),
        ]);
        let rec = CapacityModel::recommend(&result, &hist).unwrap();
        assert_eq!(rec.station, Station::Two);
        assert_eq!(rec.basis, RecommendationBasis::QueueLength);
    }

    #[test]
    fn test_equal_queues_broken_by_highest_utilization() {
        let result = CapacityModel::evaluate(&tied_scenario()).unwrap();
        let hist = history(&[
            (Station::One, 0.95, 8.0),
            (Station::Two, 0.60, 8.0),
            (Station::Three, 0.10, 0.0),
        ]);
        let rec = CapacityModel::recommend(&result, &hist).unwrap();
        assert_eq!(rec.station, Station::One);
        assert_eq!(rec.basis, RecommendationBasis::Utilization);
    }

    #[test]
    fn test_partial_queue_tie_uses_utilization_among_leaders() {
        let all_tied = CapacityScenario::new(Station::ALL.map(|s| (s, StationConfig::new(2.0, 1))));
        let result = CapacityModel::evaluate(&all_tied).unwrap();
        let hist = history(&[
            (Station::One, 0.99, 1.0),
            (Station::Two, 0.50, 9.0),
            (Station::Three, 0.70, 9.0),
        ]);
        let rec = CapacityModel::recommend(&result, &hist).unwrap();
        assert_eq!(rec.station, Station::Three);
        assert_eq!(rec.basis, RecommendationBasis::QueueLength);
    }
}
