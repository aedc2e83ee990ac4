// src/io/mod.rs

pub mod reporting;
pub mod timeseries;

pub use reporting::{write_records, write_records_to};
pub use timeseries::{
    inventory_from_reader, littlefield_from_reader, read_inventory_csv, read_littlefield_csv,
};
