// src/model/observation.rs

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kit units in one customer order; demand and completions are kept in kits.
pub const KITS_PER_ORDER: u32 = 60;

/// Converts a kit quantity to whole orders, rounding up.
///
/// Zero, negative and NaN quantities give 0 orders. Quantities beyond
/// `u32::MAX` orders (infinity included) saturate at `u32::MAX`.
pub fn kits_to_orders(kits: f64) -> u32 {
    if kits.is_nan() || kits <= 0.0 {
        return 0;
    }
    let orders = (kits / f64::from(KITS_PER_ORDER)).ceil();
    if orders >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        orders as u32
    }
}

/// A production station of the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Station {
    One,
    Two,
    Three,
}

impl Station {
    pub const ALL: [Station; 3] = [Station::One, Station::Two, Station::Three];

    /// 1-based station number as printed in the exercise.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn index(self) -> usize {
        match self {
            Station::One => 0,
            Station::Two => 1,
            Station::Three => 2,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Station::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station {}", self.number())
    }
}

impl FromStr for Station {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches(|c: char| !c.is_ascii_digit());
        digits
            .parse::<u8>()
            .ok()
            .and_then(Station::from_number)
            .ok_or_else(|| format!("unknown station `{s}` (expected 1, 2 or 3)"))
    }
}

/// A customer contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Contract {
    One,
    Two,
    Three,
}

impl Contract {
    pub const ALL: [Contract; 3] = [Contract::One, Contract::Two, Contract::Three];

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn index(self) -> usize {
        match self {
            Contract::One => 0,
            Contract::Two => 1,
            Contract::Three => 2,
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Contract {}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StationReading {
    /// Fraction of the day the station was busy, in [0, 1].
    pub utilization: f64,
    /// Average kits queued in front of the station.
    pub queue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContractReading {
    pub revenue: f64,
    /// Average job lead time in days.
    pub lead_time: f64,
    /// Completed jobs, in kits.
    pub completed: u32,
}

/// One simulated day of the factory.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub day: u32,
    /// Kits demanded that day.
    pub demand: f64,
    pub inventory_level: Option<f64>,
    pub stations: [StationReading; 3],
    pub contracts: [ContractReading; 3],
}

impl Observation {
    /// An observation with only day and demand populated. Handy for building series by hand.
    pub fn new(day: u32, demand: f64) -> Self {
        Self {
            day,
            demand,
            inventory_level: None,
            stations: [StationReading::default(); 3],
            contracts: [ContractReading::default(); 3],
        }
    }

    pub fn with_inventory(mut self, level: f64) -> Self {
        self.inventory_level = Some(level);
        self
    }

    pub fn with_station(mut self, station: Station, utilization: f64, queue: f64) -> Self {
        self.stations[station.index()] = StationReading { utilization, queue };
        self
    }

    pub fn with_contract(mut self, contract: Contract, reading: ContractReading) -> Self {
        self.contracts[contract.index()] = reading;
        self
    }

    pub fn station(&self, station: Station) -> &StationReading {
        &self.stations[station.index()]
    }

    pub fn contract(&self, contract: Contract) -> &ContractReading {
        &self.contracts[contract.index()]
    }
}

/// Inventory on hand at the end of a day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InventoryPoint {
    pub day: u32,
    pub level: f64,
}

impl InventoryPoint {
    pub fn new(day: u32, level: f64) -> Self {
        Self { day, level }
    }

    pub fn is_stock_out(&self) -> bool {
        self.level == 0.0
    }
}
