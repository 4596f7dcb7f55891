//! Error types for lot operations

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{FloorNumber, SpotId, SpotRequest, TicketId, VehicleCategory};

/// Credential a restricted spot asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    HandicapPermit,
    Reservation,
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::HandicapPermit => f.write_str("handicap permit required for handicap spot"),
            Credential::Reservation => f.write_str("reservation required for reserved spot"),
        }
    }
}

/// Broad classification of a [`ParkingError`], for callers that decide
/// between surfacing, retrying with relaxed constraints, or aborting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    Permission,
    Capacity,
    NotFound,
    /// Internal invariant violation; never retried
    State,
    Payment,
    Layout,
}

#[derive(Debug, Error)]
pub enum ParkingError {
    #[error("{0}")]
    Permission(Credential),

    #[error("no available {request} spots for {category}")]
    NoCapacity {
        category: VehicleCategory,
        request: SpotRequest,
    },

    #[error("no parking floors for vehicle type {0}")]
    UnknownCategory(VehicleCategory),

    #[error("no floor {floor} registered for vehicle type {category}")]
    UnknownFloor {
        category: VehicleCategory,
        floor: FloorNumber,
    },

    #[error("spot {0} does not exist")]
    UnknownSpot(SpotId),

    #[error("spot {0} is already occupied")]
    SpotAlreadyOccupied(SpotId),

    #[error("spot {0} is already free")]
    SpotAlreadyFree(SpotId),

    #[error("spot {spot} is held by {holder}, not {ticket}")]
    SpotHeldByOtherTicket {
        spot: SpotId,
        holder: TicketId,
        ticket: TicketId,
    },

    #[error("floor {floor} of {category} is unusable after a panic while its lock was held")]
    FloorPoisoned {
        category: VehicleCategory,
        floor: FloorNumber,
    },

    #[error("payment of {amount} failed for {ticket}")]
    PaymentDeclined { ticket: TicketId, amount: Decimal },

    #[error("floor {floor} of {category} has {restricted} restricted spots but capacity {capacity}")]
    RestrictedExceedsCapacity {
        category: VehicleCategory,
        floor: FloorNumber,
        restricted: u32,
        capacity: u32,
    },

    #[error("floor {floor} is already registered for {category}")]
    DuplicateFloor {
        category: VehicleCategory,
        floor: FloorNumber,
    },
}

impl ParkingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParkingError::Permission(_) => ErrorKind::Permission,
            ParkingError::NoCapacity { .. } => ErrorKind::Capacity,
            ParkingError::UnknownCategory(_)
            | ParkingError::UnknownFloor { .. }
            | ParkingError::UnknownSpot(_) => ErrorKind::NotFound,
            ParkingError::SpotAlreadyOccupied(_)
            | ParkingError::SpotAlreadyFree(_)
            | ParkingError::SpotHeldByOtherTicket { .. }
            | ParkingError::FloorPoisoned { .. } => ErrorKind::State,
            ParkingError::PaymentDeclined { .. } => ErrorKind::Payment,
            ParkingError::RestrictedExceedsCapacity { .. }
            | ParkingError::DuplicateFloor { .. } => ErrorKind::Layout,
        }
    }
}
