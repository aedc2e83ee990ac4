// src/analysis/shortage.rs

//! Post-hoc analysis of an observed inventory-level series.
//!
//! Breach days are the days inventory sat at or below the reorder threshold;
//! shortage runs are maximal stretches of consecutive rows with zero stock.
//! From the gaps between those events we derive a correction factor `k` for
//! the order quantity:
//!
//! ```text
//! k = avg shortage-free period / avg order interval      (1 when either is undefined)
//! optimized OQ = max(EOQ, baseline OQ) * k
//! ```
//!
//! An average is defined as soon as one interval exists, i.e. with two breach
//! days or two shortage runs.

use crate::error::{ensure_non_negative, AnalyticsError, AnalyticsResult};
use crate::model::InventoryPoint;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalConfig {
    /// Inventory level at or below which an order would have been placed.
    pub reorder_threshold: f64,
    /// Order quantity in use before the analysis.
    pub baseline_order_quantity: f64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            reorder_threshold: 1440.0,
            baseline_order_quantity: 7200.0,
        }
    }
}

impl IntervalConfig {
    pub fn with_reorder_threshold(mut self, threshold: f64) -> Self {
        self.reorder_threshold = threshold;
        self
    }

    pub fn with_baseline_order_quantity(mut self, quantity: f64) -> Self {
        self.baseline_order_quantity = quantity;
        self
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_non_negative("reorder_threshold", self.reorder_threshold)?;
        ensure_non_negative("baseline_order_quantity", self.baseline_order_quantity)?;
        Ok(())
    }
}

/// Inclusive span of days with no stock on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShortageRun {
    pub start_day: u32,
    pub end_day: u32,
}

impl ShortageRun {
    /// Days in the run; a run whose end precedes its start counts as one day.
    pub fn duration(&self) -> u32 {
        self.end_day.saturating_sub(self.start_day).saturating_add(1)
    }

    pub fn contains(&self, day: u32) -> bool {
        (self.start_day..=self.end_day).contains(&day)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalAnalysis {
    pub breach_days: Vec<u32>,
    pub shortage_runs: Vec<ShortageRun>,
    pub order_intervals: Vec<u32>,
    /// `None` with fewer than two breach days.
    pub average_order_interval: Option<f64>,
    pub shortage_free_intervals: Vec<u32>,
    /// `None` with fewer than two shortage runs.
    pub average_shortage_free_period: Option<f64>,
    pub k: f64,
}

impl IntervalAnalysis {
    pub fn shortage_durations(&self) -> Vec<u32> {
        self.shortage_runs.iter().map(ShortageRun::duration).collect()
    }

    pub fn total_shortage_days(&self) -> u32 {
        self.shortage_runs.iter().map(ShortageRun::duration).sum()
    }

    pub fn optimized_order_quantity(&self, eoq: f64, baseline_order_quantity: f64) -> f64 {
        optimized_order_quantity(eoq, baseline_order_quantity, self.k)
    }
}

/// Days with inventory at or below `threshold`, in row order.
pub fn breach_days(points: &[InventoryPoint], threshold: f64) -> Vec<u32> {
    points
        .iter()
        .filter(|p| p.level <= threshold)
        .map(|p| p.day)
        .collect()
}

/// Maximal runs of adjacent rows at zero inventory.
///
/// Rows are adjacent when they follow each other in the table, whatever the
/// day numbers. A run still open at the end of the series closes on the last day.
pub fn shortage_runs(points: &[InventoryPoint]) -> Vec<ShortageRun> {
    let mut runs = Vec::new();
    let mut open: Option<ShortageRun> = None;

    for point in points {
        if point.is_stock_out() {
            match open.as_mut() {
                Some(run) => run.end_day = point.day,
                None => {
                    open = Some(ShortageRun {
                        start_day: point.day,
                        end_day: point.day,
                    })
                }
            }
        } else if let Some(run) = open.take() {
            runs.push(run);
        }
    }
    runs.extend(open);
    runs
}

/// Gaps between consecutive breach days, which must be strictly increasing.
pub fn order_intervals(breach_days: &[u32]) -> AnalyticsResult<Vec<u32>> {
    breach_days
        .windows(2)
        .map(|w| {
            forward_gap(w[0], w[1]).ok_or_else(|| {
                AnalyticsError::Schema(format!(
                    "breach day {} does not follow breach day {}",
                    w[1], w[0]
                ))
            })
        })
        .collect()
}

/// Days from the end of one shortage run to the start of the next.
///
/// Runs must be in day order and must not overlap.
pub fn shortage_free_intervals(runs: &[ShortageRun]) -> AnalyticsResult<Vec<u32>> {
    runs.windows(2)
        .map(|w| {
            forward_gap(w[0].end_day, w[1].start_day).ok_or_else(|| {
                AnalyticsError::Schema(format!(
                    "shortage run starting day {} does not follow run ending day {}",
                    w[1].start_day, w[0].end_day
                ))
            })
        })
        .collect()
}

fn forward_gap(from: u32, to: u32) -> Option<u32> {
    to.checked_sub(from).filter(|gap| *gap > 0)
}

/// Mean of the intervals, `None` when there are none.
pub fn mean_interval(intervals: &[u32]) -> Option<f64> {
    if intervals.is_empty() {
        return None;
    }
    let total: u64 = intervals.iter().map(|&i| u64::from(i)).sum();
    Some(total as f64 / intervals.len() as f64)
}

/// Order-quantity correction factor; exactly 1 whenever either average is missing.
pub fn correction_factor(
    average_shortage_free_period: Option<f64>,
    average_order_interval: Option<f64>,
) -> f64 {
    match (average_shortage_free_period, average_order_interval) {
        (Some(free), Some(order)) if free > 0.0 && order > 0.0 => free / order,
        _ => 1.0,
    }
}

pub fn optimized_order_quantity(eoq: f64, baseline_order_quantity: f64, k: f64) -> f64 {
    eoq.max(baseline_order_quantity) * k
}

#[derive(Debug, Clone, Default)]
pub struct ShortageIntervalAnalyzer {
    config: IntervalConfig,
}

impl ShortageIntervalAnalyzer {
    pub fn new(config: IntervalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IntervalConfig {
        &self.config
    }

    pub fn analyze(&self, points: &[InventoryPoint]) -> AnalyticsResult<IntervalAnalysis> {
        self.config.validate()?;
        validate_points(points)?;

        let breach_days = breach_days(points, self.config.reorder_threshold);
        let shortage_runs = shortage_runs(points);
        debug!(
            breaches = breach_days.len(),
            runs = shortage_runs.len(),
            "scanned inventory series"
        );

        let order_intervals = order_intervals(&breach_days)?;
        let average_order_interval = mean_interval(&order_intervals);
        let shortage_free_intervals = shortage_free_intervals(&shortage_runs)?;
        let average_shortage_free_period = mean_interval(&shortage_free_intervals);

        let k = correction_factor(average_shortage_free_period, average_order_interval);
        if average_order_interval.is_none() || average_shortage_free_period.is_none() {
            warn!(
                breach_days = breach_days.len(),
                shortage_runs = shortage_runs.len(),
                "not enough intervals for k, using 1"
            );
        }
        info!(
            ?average_order_interval,
            ?average_shortage_free_period,
            k,
            "interval analysis complete"
        );

        Ok(IntervalAnalysis {
            breach_days,
            shortage_runs,
            order_intervals,
            average_order_interval,
            shortage_free_intervals,
            average_shortage_free_period,
            k,
        })
    }

    /// `max(eoq, baseline) * k` using the configured baseline.
    pub fn optimized_order_quantity(&self, analysis: &IntervalAnalysis, eoq: f64) -> f64 {
        analysis.optimized_order_quantity(eoq, self.config.baseline_order_quantity)
    }
}

fn validate_points(points: &[InventoryPoint]) -> AnalyticsResult<()> {
    let mut previous: Option<u32> = None;
    for point in points {
        if previous.is_some_and(|day| point.day <= day) {
            return Err(AnalyticsError::Schema(format!(
                "inventory day {} is out of order",
                point.day
            )));
        }
        if !(point.level.is_finite() && point.level >= 0.0) {
            return Err(AnalyticsError::Schema(format!(
                "day {}: inventory_level = {} is out of range",
                point.day, point.level
            )));
        }
        previous = Some(point.day);
    }
    Ok(())
}
