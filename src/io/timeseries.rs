// src/io/timeseries.rs

//! Loads Littlefield exports into a [`TimeSeries`].
//!
//! Headers may use the canonical field names or the long labels of the
//! exercise's export sheet. Demand and completed jobs arrive in orders and
//! are converted to kits here.

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::model::{
    ContractReading, InventoryPoint, Observation, StationReading, TimeSeries, KITS_PER_ORDER,
};
use csv::StringRecord;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Canonical column name and the export labels that map onto it.
const LITTLEFIELD_COLUMNS: &[(&str, &[&str])] = &[
    ("day", &[]),
    ("daily_demand", &["number of jobs accepted each day (order by day)"]),
    ("inventory_level", &["inventory level", "inventory"]),
    ("utilization_station_1", &["utilization of station 1, averaged over each day"]),
    ("queue_station_1", &["daily average number of kits queued for station 1"]),
    ("utilization_station_2", &["utilization of station 2, averaged over each day"]),
    ("queue_station_2", &["daily average number of kits queued for station 2"]),
    ("utilization_station_3", &["utilization of station 3, averaged over each day"]),
    ("queue_station_3", &["daily average number of kits queued for station 3"]),
    ("revenue_contract_1", &["daily average revenue per job contract 1"]),
    ("revenue_contract_2", &["daily average revenue per job contract 2"]),
    ("revenue_contract_3", &["daily average revenue per job contract 3"]),
    ("lead_time_contract_1", &["daily average job lead time contract 1"]),
    ("lead_time_contract_2", &["daily average job lead time contract 2"]),
    ("lead_time_contract_3", &["daily average job lead time contract 3"]),
    ("completed_jobs_contract_1", &["number of completed jobs each day contract 1"]),
    ("completed_jobs_contract_2", &["number of completed jobs each day contract 2"]),
    ("completed_jobs_contract_3", &["number of completed jobs each day contract 3"]),
];

/// Littlefield columns that may be absent; rows then carry no inventory level.
const LITTLEFIELD_OPTIONAL: &[&str] = &["inventory_level"];

#[derive(Debug, Deserialize)]
struct LittlefieldRow {
    day: f64,
    daily_demand: f64,
    #[serde(default)]
    inventory_level: Option<f64>,
    utilization_station_1: f64,
    queue_station_1: f64,
    utilization_station_2: f64,
    queue_station_2: f64,
    utilization_station_3: f64,
    queue_station_3: f64,
    revenue_contract_1: f64,
    revenue_contract_2: f64,
    revenue_contract_3: f64,
    lead_time_contract_1: f64,
    lead_time_contract_2: f64,
    lead_time_contract_3: f64,
    completed_jobs_contract_1: f64,
    completed_jobs_contract_2: f64,
    completed_jobs_contract_3: f64,
}

#[derive(Debug, Deserialize)]
struct InventoryRow {
    day: f64,
    inventory_level: f64,
}

pub fn read_littlefield_csv(path: impl AsRef<Path>) -> AnalyticsResult<TimeSeries> {
    let path = path.as_ref();
    let series = littlefield_from_reader(File::open(path)?)?;
    info!(path = %path.display(), days = series.len(), "loaded Littlefield data");
    Ok(series)
}

pub fn littlefield_from_reader<R: Read>(reader: R) -> AnalyticsResult<TimeSeries> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = canonical_headers(rdr.headers()?, LITTLEFIELD_COLUMNS, LITTLEFIELD_OPTIONAL)?;

    let mut observations = Vec::new();
    for record in rdr.records() {
        let row: LittlefieldRow = record?.deserialize(Some(&headers))?;
        observations.push(row.into_observation()?);
    }
    debug!(rows = observations.len(), "parsed Littlefield rows");

    TimeSeries::new(observations)
}

/// Reads a two-column `day,inventory_level` file.
pub fn read_inventory_csv(path: impl AsRef<Path>) -> AnalyticsResult<Vec<InventoryPoint>> {
    let path = path.as_ref();
    let points = inventory_from_reader(File::open(path)?)?;
    info!(path = %path.display(), days = points.len(), "loaded inventory levels");
    Ok(points)
}

pub fn inventory_from_reader<R: Read>(reader: R) -> AnalyticsResult<Vec<InventoryPoint>> {
    const COLUMNS: &[(&str, &[&str])] = &[
        ("day", &[]),
        ("inventory_level", &["inventory level", "inventory"]),
    ];

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = canonical_headers(rdr.headers()?, COLUMNS, &[])?;

    rdr.records()
        .map(|record| -> AnalyticsResult<InventoryPoint> {
            let row: InventoryRow = record?.deserialize(Some(&headers))?;
            Ok(InventoryPoint::new(parse_day(row.day)?, row.inventory_level))
        })
        .collect()
}

/// Renames known headers to their canonical names and checks that every
/// column not listed in `optional` exists.
fn canonical_headers(
    raw: &StringRecord,
    columns: &[(&'static str, &[&str])],
    optional: &[&str],
) -> AnalyticsResult<StringRecord> {
    let canonical: StringRecord = raw
        .iter()
        .map(|header| {
            let wanted = header.trim().to_lowercase();
            columns
                .iter()
                .find(|(name, aliases)| {
                    *name == wanted || aliases.iter().any(|alias| *alias == wanted)
                })
                .map_or(header, |(name, _)| *name)
        })
        .collect();

    let missing: Vec<&str> = columns
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| !optional.contains(name))
        .filter(|name| !canonical.iter().any(|h| h == *name))
        .collect();

    if !missing.is_empty() {
        return Err(AnalyticsError::Schema(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }
    Ok(canonical)
}

fn parse_day(day: f64) -> AnalyticsResult<u32> {
    if day >= 1.0 && day.fract() == 0.0 && day <= f64::from(u32::MAX) {
        Ok(day as u32)
    } else {
        Err(AnalyticsError::Schema(format!("`{day}` is not a valid day number")))
    }
}

fn orders_to_kits(day: u32, field: &str, orders: f64) -> AnalyticsResult<f64> {
    if orders.is_finite() && orders >= 0.0 {
        Ok(orders * f64::from(KITS_PER_ORDER))
    } else {
        Err(AnalyticsError::Schema(format!("day {day}: {field} = {orders} is out of range")))
    }
}

impl LittlefieldRow {
    fn into_observation(self) -> AnalyticsResult<Observation> {
        let day = parse_day(self.day)?;
        let completed = |field: &str, orders: f64| -> AnalyticsResult<u32> {
            Ok(orders_to_kits(day, field, orders)?.round() as u32)
        };

        let stations = [
            (self.utilization_station_1, self.queue_station_1),
            (self.utilization_station_2, self.queue_station_2),
            (self.utilization_station_3, self.queue_station_3),
        ]
        .map(|(utilization, queue)| StationReading { utilization, queue });

        let contracts = [
            ContractReading {
                revenue: self.revenue_contract_1,
                lead_time: self.lead_time_contract_1,
                completed: completed("completed_jobs_contract_1", self.completed_jobs_contract_1)?,
            },
            ContractReading {
                revenue: self.revenue_contract_2,
                lead_time: self.lead_time_contract_2,
                completed: completed("completed_jobs_contract_2", self.completed_jobs_contract_2)?,
            },
            ContractReading {
                revenue: self.revenue_contract_3,
                lead_time: self.lead_time_contract_3,
                completed: completed("completed_jobs_contract_3", self.completed_jobs_contract_3)?,
            },
        ];

        let mut obs = Observation::new(day, orders_to_kits(day, "daily_demand", self.daily_demand)?);
        obs.inventory_level = self.inventory_level;
        obs.stations = stations;
        obs.contracts = contracts;
        Ok(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contract, Station};

    const CANONICAL: &str = "\
day,daily_demand,inventory_level,utilization_station_1,queue_station_1,utilization_station_2,queue_station_2,utilization_station_3,queue_station_3,revenue_contract_1,revenue_contract_2,revenue_contract_3,lead_time_contract_1,lead_time_contract_2,lead_time_contract_3,completed_jobs_contract_1,completed_jobs_contract_2,completed_jobs_contract_3
1,2,1440,0.9,3,0.5,1,0.2,0,750,0,0,1.5,0,0,1,0,0
2,3,,0.95,6,0.6,0,0.25,0,740,0,0,1.8,0,0,2,0,0
";

    #[test]
    fn test_reads_canonical_headers_and_converts_units() {
        let series = littlefield_from_reader(CANONICAL.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);

        let first = &series.observations()[0];
        assert_eq!(first.demand, 120.0);
        assert_eq!(first.inventory_level, Some(1440.0));
        assert_eq!(first.contract(Contract::One).completed, 60);
        assert_eq!(first.station(Station::One).queue, 3.0);
        assert_eq!(series.observations()[1].inventory_level, None);
    }

    #[test]
    fn test_reads_export_labels() {
        // Export labels contain commas, so real files quote them.
        let header = [
            "day",
            "number of jobs accepted each day (order by day)",
            "utilization of station 1, averaged over each day",
            "daily average number of kits queued for station 1",
            "utilization of station 2, averaged over each day",
            "daily average number of kits queued for station 2",
            "utilization of station 3, averaged over each day",
            "daily average number of kits queued for station 3",
            "daily average revenue per job contract 1",
            "daily average revenue per job contract 2",
            "daily average revenue per job contract 3",
            "daily average job lead time contract 1",
            "daily average job lead time contract 2",
            "daily average job lead time contract 3",
            "number of completed jobs each day contract 1",
            "number of completed jobs each day contract 2",
            "number of completed jobs each day contract 3",
        ]
        .iter()
        .map(|h| format!("\"{h}\""))
        .collect::<Vec<_>>()
        .join(",");
        let data = format!("{header}\n1.0,1.5,0.5,2,0.4,1,0.1,0,700,0,0,1,0,0,1,0,0\n");

        let series = littlefield_from_reader(data.as_bytes()).unwrap();
        let obs = &series.observations()[0];
        assert_eq!(obs.day, 1);
        assert_eq!(obs.demand, 90.0);
        assert_eq!(obs.inventory_level, None);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let csv = "day,daily_demand\n1,2\n";
        let err = littlefield_from_reader(csv.as_bytes()).unwrap_err();
        match err {
            AnalyticsError::Schema(msg) => {
                assert!(msg.contains("utilization_station_1"));
                assert!(!msg.contains("inventory_level"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_inventory_file() {
        let csv = "day,inventory_level\n1,500\n2,0\n3,0\n4,200\n5,0\n";
        let points = inventory_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points[4], InventoryPoint::new(5, 0.0));

        assert!(inventory_from_reader("day,inventory_level\n1.5,5\n".as_bytes()).is_err());
    }

    #[test]
    fn test_inventory_file_requires_level_column() {
        match inventory_from_reader("day,level\n1,5\n".as_bytes()) {
            Err(AnalyticsError::Schema(msg)) => assert!(msg.contains("inventory_level")),
            other => panic!("expected schema error, got {other:?}"),
        }

        // the long label is accepted in place of the canonical name
        let points = inventory_from_reader("day,Inventory Level\n1,5\n".as_bytes()).unwrap();
        assert_eq!(points, vec![InventoryPoint::new(1, 5.0)]);
    }
}
