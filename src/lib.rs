//! Inventory-control and capacity analytics for the Littlefield factory exercise.
//!
//! - [`strategy`]: EOQ and reorder points under several safety-stock rules
//! - [`simulation`]: station capacities, bottlenecks and cycle time for a machine allocation
//! - [`analysis`]: reorder breaches, shortage runs and the order-quantity correction factor
//! - [`io`]: CSV ingestion of the exercise's exports and CSV export of results
//!
//! All calculations are pure functions over caller-owned data.

pub mod analysis;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::{AnalyticsError, AnalyticsResult};
