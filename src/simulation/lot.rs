//! The parking lot: every floor, grouped by vehicle category
//!
//! Floors are registered once at startup. After that the lot only hands out
//! and takes back spots through the per-floor locks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;

use super::clock::Clock;
use super::config::{FloorConfig, LotConfig};
use super::error::ParkingError;
use super::fees::RateCard;
use super::floor::ParkingFloor;
use super::spot::count_available;
use super::types::{FloorNumber, TicketId, VehicleCategory};

/// Free spot counts for one floor, as shown on the display board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorAvailability {
    pub category: VehicleCategory,
    pub floor: FloorNumber,
    pub capacity: usize,
    /// Free spots of any kind
    pub regular: usize,
    pub handicap: usize,
    pub reserved: usize,
}

pub struct ParkingLot {
    floors: HashMap<VehicleCategory, Vec<ParkingFloor>>,
    rates: RateCard,
    clock: Arc<dyn Clock>,
    /// Last ticket number handed out; starts at zero for every new lot
    ticket_sequence: AtomicU64,
}

impl ParkingLot {
    /// An empty lot with the default rate card
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            floors: HashMap::new(),
            rates: RateCard::default(),
            clock,
            ticket_sequence: AtomicU64::new(0),
        }
    }

    /// Build a lot with every floor in `config`
    pub fn from_config(config: &LotConfig, clock: Arc<dyn Clock>) -> Result<Self, ParkingError> {
        let mut lot = Self::new(clock);
        for floor in &config.floors {
            lot.add_floor(floor)?;
        }
        Ok(lot)
    }

    pub fn with_rates(mut self, rates: RateCard) -> Self {
        self.rates = rates;
        self
    }

    /// Register a floor. Floor numbers must be unique within a category.
    pub fn add_floor(&mut self, config: &FloorConfig) -> Result<(), ParkingError> {
        // Saturates so an absurd count is reported rather than wrapping
        let restricted = config.handicap_spots.saturating_add(config.reserved_spots);
        if restricted > config.capacity {
            return Err(ParkingError::RestrictedExceedsCapacity {
                category: config.category,
                floor: config.number,
                restricted,
                capacity: config.capacity,
            });
        }

        let floors = self.floors.entry(config.category).or_default();
        if floors.iter().any(|f| f.number == config.number) {
            return Err(ParkingError::DuplicateFloor {
                category: config.category,
                floor: config.number,
            });
        }

        floors.push(ParkingFloor::new(
            config.category,
            config.number,
            config.capacity,
            config.handicap_spots,
            config.reserved_spots,
        ));
        debug!(
            "Registered {} floor {} with {} spots ({} handicap, {} reserved)",
            config.category,
            config.number,
            config.capacity,
            config.handicap_spots,
            config.reserved_spots
        );
        Ok(())
    }

    pub fn rates(&self) -> &RateCard {
        &self.rates
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Next ticket number; monotonic for the lifetime of this lot
    pub fn next_ticket_id(&self) -> TicketId {
        TicketId(self.ticket_sequence.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Floors registered for `category`, in registration order
    pub fn floors(&self, category: VehicleCategory) -> Result<&[ParkingFloor], ParkingError> {
        match self.floors.get(&category) {
            Some(floors) if !floors.is_empty() => Ok(floors.as_slice()),
            _ => Err(ParkingError::UnknownCategory(category)),
        }
    }

    pub fn floor(
        &self,
        category: VehicleCategory,
        number: FloorNumber,
    ) -> Result<&ParkingFloor, ParkingError> {
        self.floors(category)?
            .iter()
            .find(|f| f.number == number)
            .ok_or(ParkingError::UnknownFloor {
                category,
                floor: number,
            })
    }

    /// Pick the floor with the most free spots matching the flags.
    ///
    /// Ties go to the floor registered first. Returns `None` when no floor
    /// has a matching free spot.
    pub fn select_floor(
        &self,
        category: VehicleCategory,
        needs_handicap: bool,
        needs_reserved: bool,
    ) -> Result<Option<&ParkingFloor>, ParkingError> {
        let mut best: Option<(&ParkingFloor, usize)> = None;
        for floor in self.floors(category)? {
            let available = floor.available_count(needs_handicap, needs_reserved)?;
            match best {
                Some((_, most)) if available <= most => {}
                _ => best = Some((floor, available)),
            }
        }

        Ok(best
            .filter(|(_, available)| *available > 0)
            .map(|(floor, _)| floor))
    }

    /// Read-only availability query for dashboards
    pub fn available_count(
        &self,
        category: VehicleCategory,
        floor: FloorNumber,
        needs_handicap: bool,
        needs_reserved: bool,
    ) -> Result<usize, ParkingError> {
        self.floor(category, floor)?
            .available_count(needs_handicap, needs_reserved)
    }

    /// Free spot counts for every floor, grouped by category
    pub fn availability(&self) -> Result<Vec<FloorAvailability>, ParkingError> {
        let mut rows = Vec::new();
        for category in VehicleCategory::ALL {
            let Some(floors) = self.floors.get(&category) else {
                continue;
            };
            for floor in floors {
                // One snapshot per floor keeps the three counts consistent
                let spots = floor.snapshot()?;
                rows.push(FloorAvailability {
                    category,
                    floor: floor.number,
                    capacity: floor.capacity(),
                    regular: count_available(&spots, false, false),
                    handicap: count_available(&spots, true, false),
                    reserved: count_available(&spots, false, true),
                });
            }
        }
        Ok(rows)
    }

    /// Occupied spots across the whole lot
    pub fn occupied_count(&self) -> Result<usize, ParkingError> {
        let mut total = 0;
        for floors in self.floors.values() {
            for floor in floors {
                total += floor.occupied_count()?;
            }
        }
        Ok(total)
    }

    pub fn total_capacity(&self) -> usize {
        self.floors
            .values()
            .flat_map(|floors| floors.iter())
            .map(|f| f.capacity())
            .sum()
    }
}
