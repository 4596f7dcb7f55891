//! Parking spots and the nearest-spot search over one floor

use super::error::ParkingError;
use super::types::{matches_flags, FloorNumber, SpotId, SpotRequest, TicketId, VehicleCategory};

/// A single parking spot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spot {
    pub id: SpotId,
    pub handicap: bool,
    pub reserved: bool,
    /// Distance rank from the entrance; lower is closer
    pub proximity: u32,
    /// The ticket currently holding this spot (if any)
    occupant: Option<TicketId>,
}

impl Spot {
    pub fn new(id: SpotId, handicap: bool, reserved: bool, proximity: u32) -> Self {
        Self {
            id,
            handicap,
            reserved,
            proximity,
            occupant: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<TicketId> {
        self.occupant
    }

    /// Mark the spot as held by `ticket`
    pub fn occupy(&mut self, ticket: TicketId) -> Result<(), ParkingError> {
        if self.occupant.is_some() {
            return Err(ParkingError::SpotAlreadyOccupied(self.id.clone()));
        }
        self.occupant = Some(ticket);
        Ok(())
    }

    /// Free the spot. Only the ticket that occupied it may release it.
    pub fn release(&mut self, ticket: TicketId) -> Result<(), ParkingError> {
        match self.occupant {
            None => Err(ParkingError::SpotAlreadyFree(self.id.clone())),
            Some(holder) if holder != ticket => Err(ParkingError::SpotHeldByOtherTicket {
                spot: self.id.clone(),
                holder,
                ticket,
            }),
            Some(_) => {
                self.occupant = None;
                Ok(())
            }
        }
    }
}

/// Build the spot layout of one floor.
///
/// Spots are numbered from 1 and the number doubles as the proximity rank.
/// The first `handicap_spots` are handicap spots, the following
/// `reserved_spots` are reserved, the rest are regular.
pub fn layout_spots(
    category: VehicleCategory,
    floor: FloorNumber,
    capacity: u32,
    handicap_spots: u32,
    reserved_spots: u32,
) -> Vec<Spot> {
    let restricted = handicap_spots.saturating_add(reserved_spots);
    (1..=capacity)
        .map(|i| {
            let handicap = i <= handicap_spots;
            let reserved = !handicap && i <= restricted;
            let id = SpotId(format!("{}-F{}-{}", category, floor, i));
            Spot::new(id, handicap, reserved, i)
        })
        .collect()
}

/// Pick the closest free spot satisfying `request`.
///
/// Fails when a restricted spot is requested without the matching credential.
/// Returns the index of the chosen spot, or `None` when nothing matches.
/// Ties on proximity go to the spot listed first. Nothing is mutated.
pub fn allocate(spots: &[Spot], request: &SpotRequest) -> Result<Option<usize>, ParkingError> {
    request.check_credentials()?;

    let mut best: Option<(usize, u32)> = None;
    for (index, spot) in spots.iter().enumerate() {
        if !request.matches(spot) {
            continue;
        }
        match best {
            Some((_, proximity)) if spot.proximity >= proximity => {}
            _ => best = Some((index, spot.proximity)),
        }
    }
    Ok(best.map(|(index, _)| index))
}

/// Count free spots carrying the requested flags
pub fn count_available(spots: &[Spot], needs_handicap: bool, needs_reserved: bool) -> usize {
    spots
        .iter()
        .filter(|spot| matches_flags(spot, needs_handicap, needs_reserved))
        .count()
}
