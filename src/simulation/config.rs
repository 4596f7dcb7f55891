//! Lot layout configuration, applied once at startup

use super::types::{FloorNumber, VehicleCategory};

/// Layout of one floor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorConfig {
    pub category: VehicleCategory,
    pub number: FloorNumber,
    pub capacity: u32,
    pub handicap_spots: u32,
    pub reserved_spots: u32,
}

impl FloorConfig {
    pub fn new(
        category: VehicleCategory,
        number: u32,
        capacity: u32,
        handicap_spots: u32,
        reserved_spots: u32,
    ) -> Self {
        Self {
            category,
            number: FloorNumber(number),
            capacity,
            handicap_spots,
            reserved_spots,
        }
    }
}

/// Every floor of the lot, in registration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotConfig {
    pub floors: Vec<FloorConfig>,
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            floors: vec![
                FloorConfig::new(VehicleCategory::Car, 1, 50, 5, 5),
                FloorConfig::new(VehicleCategory::Car, 2, 50, 5, 5),
                FloorConfig::new(VehicleCategory::Bike, 1, 100, 10, 10),
                FloorConfig::new(VehicleCategory::Heavy, 1, 20, 2, 2),
            ],
        }
    }
}

impl LotConfig {
    pub fn empty() -> Self {
        Self { floors: Vec::new() }
    }

    pub fn with_floor(mut self, floor: FloorConfig) -> Self {
        self.floors.push(floor);
        self
    }
}
