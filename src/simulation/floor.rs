//! A single parking floor
//!
//! Each floor guards its spots with its own lock, so gates working on
//! different floors never wait on each other. Every allocate-then-occupy and
//! every check-then-release runs as one critical section under that lock.

use std::sync::{Mutex, MutexGuard};

use super::error::ParkingError;
use super::spot::{self, Spot};
use super::types::{FloorNumber, SpotId, SpotRequest, TicketId, VehicleCategory};

#[derive(Debug)]
pub struct ParkingFloor {
    pub category: VehicleCategory,
    pub number: FloorNumber,
    capacity: usize,
    spots: Mutex<Vec<Spot>>,
}

impl ParkingFloor {
    pub fn new(
        category: VehicleCategory,
        number: FloorNumber,
        capacity: u32,
        handicap_spots: u32,
        reserved_spots: u32,
    ) -> Self {
        let spots = spot::layout_spots(category, number, capacity, handicap_spots, reserved_spots);
        Self::with_spots(category, number, spots)
    }

    /// Build a floor from an explicit spot list (kept in the given order)
    pub fn with_spots(category: VehicleCategory, number: FloorNumber, spots: Vec<Spot>) -> Self {
        Self {
            category,
            number,
            capacity: spots.len(),
            spots: Mutex::new(spots),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Spot>>, ParkingError> {
        self.spots.lock().map_err(|_| ParkingError::FloorPoisoned {
            category: self.category,
            floor: self.number,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of free spots carrying the requested flags
    pub fn available_count(
        &self,
        needs_handicap: bool,
        needs_reserved: bool,
    ) -> Result<usize, ParkingError> {
        let spots = self.lock()?;
        Ok(spot::count_available(&spots, needs_handicap, needs_reserved))
    }

    pub fn occupied_count(&self) -> Result<usize, ParkingError> {
        let spots = self.lock()?;
        Ok(spots.iter().filter(|s| s.is_occupied()).count())
    }

    /// Ticket currently holding `spot_id`
    pub fn occupant_of(&self, spot_id: &SpotId) -> Result<Option<TicketId>, ParkingError> {
        let spots = self.lock()?;
        let index = find_spot(&spots, spot_id)?;
        Ok(spots[index].occupant())
    }

    /// A copy of the current spot states, in floor order
    pub fn snapshot(&self) -> Result<Vec<Spot>, ParkingError> {
        Ok(self.lock()?.clone())
    }

    /// Find the closest matching spot and occupy it in one step.
    ///
    /// `next_ticket` is called under the floor lock only once a spot has been
    /// found, so ticket numbers are never burned on a full floor.
    /// Returns `None` when no spot on this floor matches.
    pub fn claim_spot<F>(
        &self,
        request: &SpotRequest,
        next_ticket: F,
    ) -> Result<Option<(SpotId, TicketId)>, ParkingError>
    where
        F: FnOnce() -> TicketId,
    {
        let mut spots = self.lock()?;
        let Some(index) = spot::allocate(&spots, request)? else {
            return Ok(None);
        };

        let ticket = next_ticket();
        let spot = &mut spots[index];
        spot.occupy(ticket)?;
        Ok(Some((spot.id.clone(), ticket)))
    }

    /// Release `spot_id` on behalf of `ticket` once `settle` succeeds.
    ///
    /// The holder check, `settle` and the release all run under the floor
    /// lock. If the spot is not held by `ticket`, `settle` is never called. If
    /// `settle` fails, the spot stays occupied.
    pub fn release_with<T, F>(
        &self,
        spot_id: &SpotId,
        ticket: TicketId,
        settle: F,
    ) -> Result<T, ParkingError>
    where
        F: FnOnce() -> Result<T, ParkingError>,
    {
        let mut spots = self.lock()?;
        let index = find_spot(&spots, spot_id)?;

        match spots[index].occupant() {
            None => return Err(ParkingError::SpotAlreadyFree(spot_id.clone())),
            Some(holder) if holder != ticket => {
                return Err(ParkingError::SpotHeldByOtherTicket {
                    spot: spot_id.clone(),
                    holder,
                    ticket,
                })
            }
            Some(_) => {}
        }

        let settled = settle()?;
        spots[index].release(ticket)?;
        Ok(settled)
    }
}

fn find_spot(spots: &[Spot], spot_id: &SpotId) -> Result<usize, ParkingError> {
    spots
        .iter()
        .position(|s| &s.id == spot_id)
        .ok_or_else(|| ParkingError::UnknownSpot(spot_id.clone()))
}
