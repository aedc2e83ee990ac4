// End-to-end: CSV files on disk -> time series -> all three analyses.

use littlefield_analytics::analysis::{IntervalConfig, ShortageIntervalAnalyzer, ShortageRun};
use littlefield_analytics::io::{read_inventory_csv, read_littlefield_csv, write_records};
use littlefield_analytics::logging;
use littlefield_analytics::model::{kits_to_orders, Station};
use littlefield_analytics::simulation::{
    CapacityModel, CapacityScenario, RecommendationBasis, StationConfig,
};
use littlefield_analytics::strategy::{InventoryPolicyCalculator, PolicyConfig};
use littlefield_analytics::AnalyticsError;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str = "day,daily_demand,inventory_level,utilization_station_1,queue_station_1,utilization_station_2,queue_station_2,utilization_station_3,queue_station_3,revenue_contract_1,revenue_contract_2,revenue_contract_3,lead_time_contract_1,lead_time_contract_2,lead_time_contract_3,completed_jobs_contract_1,completed_jobs_contract_2,completed_jobs_contract_3";

fn write_file(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

/// Five days (day 5 missing) with demand and completions in orders.
fn littlefield_fixture(dir: &TempDir) -> PathBuf {
    let rows = [
        "1,2,1500,0.90,5.0,0.70,2.0,0.30,0.0,750,0,0,1.2,0,0,2,0,0",
        "2,3,0,0.95,6.0,0.80,6.0,0.35,0.0,745,0,0,1.4,0,0,2,0,0",
        "3,1,0,0.99,8.0,0.90,6.0,0.40,0.0,730,0,0,1.9,0,0,3,0,0",
        "4,2,900,0.85,2.0,0.75,4.0,0.30,0.0,750,0,0,1.1,0,0,1,0,0",
        "6,2,0,0.80,0.0,0.95,2.0,0.25,0.0,750,0,0,1.0,0,0,2,0,0",
    ];
    write_file(dir, "littlefield.csv", &format!("{HEADER}\n{}\n", rows.join("\n")))
}

#[test]
fn policy_from_littlefield_export() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let series = read_littlefield_csv(littlefield_fixture(&dir)).unwrap();

    assert_eq!(series.demand(), vec![120.0, 180.0, 60.0, 120.0, 120.0]);

    let policy = InventoryPolicyCalculator::new(PolicyConfig::default())
        .calculate(&series.demand())
        .unwrap();

    // avg 120, max 180, L = 4
    assert!((policy.rop_zero.value - 480.0).abs() < 1e-9);
    assert!((policy.rop_conservative.value - 720.0).abs() < 1e-9);
    let expected_eoq = (2.0_f64 * 120.0 * 365.0 * 1000.0).sqrt();
    assert!((policy.eoq.value - expected_eoq).abs() < 1e-9);
    assert_eq!(kits_to_orders(policy.rop_conservative.value), 12);
    assert!(policy.rop_service.unwrap().value > policy.rop_zero.value);
}

#[test]
fn capacity_tie_uses_history_from_day() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let series = read_littlefield_csv(littlefield_fixture(&dir)).unwrap();

    // Stations 1 and 2 tie at 0.25 jobs/hour.
    let scenario = CapacityScenario::new([
        (Station::One, StationConfig::new(4.0, 1)),
        (Station::Two, StationConfig::new(8.0, 2)),
        (Station::Three, StationConfig::new(1.0, 1)),
    ]);
    let result = CapacityModel::evaluate(&scenario).unwrap();
    assert!(result.has_tied_bottlenecks());
    assert_eq!(result.cycle_time_hours, 96.0);

    // Whole history: mean queues 4.2 vs 4.0.
    let rec = CapacityModel::recommend(&result, &series.station_history(1).unwrap()).unwrap();
    assert_eq!(rec.station, Station::One);
    assert_eq!(rec.basis, RecommendationBasis::QueueLength);

    // From day 4: queues are 1.0 vs 3.0.
    let rec = CapacityModel::recommend(&result, &series.station_history(4).unwrap()).unwrap();
    assert_eq!(rec.station, Station::Two);

    let comparison = CapacityModel::compare(&scenario, Station::Two).unwrap();
    assert_eq!(
        comparison.after.bottleneck_stations.iter().copied().collect::<Vec<_>>(),
        vec![Station::One]
    );
}

#[test]
fn intervals_from_both_file_shapes() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let inventory = write_file(
        &dir,
        "inventory.csv",
        "day,inventory_level\n1,500\n2,0\n3,0\n4,200\n5,0\n",
    );

    let analyzer = ShortageIntervalAnalyzer::new(
        IntervalConfig::default()
            .with_reorder_threshold(300.0)
            .with_baseline_order_quantity(7200.0),
    );
    let analysis = analyzer.analyze(&read_inventory_csv(&inventory).unwrap()).unwrap();
    assert_eq!(analysis.breach_days, vec![2, 3, 4, 5]);
    assert_eq!(analysis.order_intervals, vec![1, 1, 1]);
    assert_eq!(
        analysis.shortage_runs,
        vec![
            ShortageRun { start_day: 2, end_day: 3 },
            ShortageRun { start_day: 5, end_day: 5 },
        ]
    );
    assert_eq!(analysis.k, 2.0);
    let oq = analyzer.optimized_order_quantity(&analysis, 8961.03);
    assert!((oq - 8961.03 * 2.0).abs() < 1e-6);

    // Same analysis straight off the Littlefield export's inventory column.
    let series = read_littlefield_csv(littlefield_fixture(&dir)).unwrap();
    let from_series = analyzer.analyze(&series.inventory_points().unwrap()).unwrap();
    assert_eq!(from_series.breach_days, vec![2, 3, 6]);
    assert_eq!(
        from_series.shortage_runs,
        vec![
            ShortageRun { start_day: 2, end_day: 3 },
            ShortageRun { start_day: 6, end_day: 6 },
        ]
    );
    assert_eq!(from_series.shortage_free_intervals, vec![3]);

    let out = dir.path().join("runs.csv");
    write_records(&out, &from_series.shortage_runs).unwrap();
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "start_day,end_day\n2,3\n6,6\n"
    );
}

#[test]
fn missing_columns_and_files_are_reported() {
    let dir = TempDir::new().unwrap();
    let broken = write_file(&dir, "broken.csv", "day,daily_demand\n1,2\n");
    assert!(matches!(
        read_littlefield_csv(&broken),
        Err(AnalyticsError::Schema(_))
    ));

    assert!(matches!(
        read_inventory_csv(dir.path().join("nope.csv")),
        Err(AnalyticsError::Io(_))
    ));
}
