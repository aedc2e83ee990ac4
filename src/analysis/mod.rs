// src/analysis/mod.rs

pub mod shortage;

pub use shortage::{
    breach_days, correction_factor, mean_interval, optimized_order_quantity, order_intervals,
    shortage_free_intervals, shortage_runs, IntervalAnalysis, IntervalConfig, ShortageIntervalAnalyzer,
    ShortageRun,
};
