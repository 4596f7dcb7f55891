//! Core types for the parking simulation
//!
//! Identifiers, vehicles and the constraint flags a driver brings to the gate.

use std::fmt;

use super::error::{Credential, ParkingError};
use super::spot::Spot;

/// Category of vehicle, which decides the floors it may park on and its rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VehicleCategory {
    Car,
    Bike,
    /// Trucks, buses and other oversized vehicles
    Heavy,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 3] = [
        VehicleCategory::Car,
        VehicleCategory::Bike,
        VehicleCategory::Heavy,
    ];
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleCategory::Car => "CAR",
            VehicleCategory::Bike => "BIKE",
            VehicleCategory::Heavy => "HEAVY",
        };
        f.write_str(name)
    }
}

/// A vehicle arriving at the lot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub plate: String,
    pub category: VehicleCategory,
}

impl Vehicle {
    pub fn new(plate: impl Into<String>, category: VehicleCategory) -> Self {
        Self {
            plate: plate.into(),
            category,
        }
    }

    pub fn car(plate: impl Into<String>) -> Self {
        Self::new(plate, VehicleCategory::Car)
    }

    pub fn bike(plate: impl Into<String>) -> Self {
        Self::new(plate, VehicleCategory::Bike)
    }

    pub fn heavy(plate: impl Into<String>) -> Self {
        Self::new(plate, VehicleCategory::Heavy)
    }
}

/// A wrapper type for spot identifiers (e.g. `CAR-F1-3`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpotId(pub String);

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wrapper type for ticket IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(pub u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TICKET-{:08}", self.0)
    }
}

/// A wrapper type for gate IDs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GateId(pub String);

impl GateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wrapper type for floor numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FloorNumber(pub u32);

impl fmt::Display for FloorNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of spot a driver wants and which credentials they hold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpotRequest {
    pub needs_handicap: bool,
    pub needs_reserved: bool,
    pub has_handicap_permit: bool,
    pub has_reservation: bool,
}

impl SpotRequest {
    /// Any free spot, no credentials
    pub fn standard() -> Self {
        Self::default()
    }

    /// A handicap spot, with or without the permit
    pub fn handicap(has_permit: bool) -> Self {
        Self {
            needs_handicap: true,
            has_handicap_permit: has_permit,
            ..Self::default()
        }
    }

    /// A reserved spot, with or without a reservation
    pub fn reserved(has_reservation: bool) -> Self {
        Self {
            needs_reserved: true,
            has_reservation,
            ..Self::default()
        }
    }

    /// Fails when a restricted spot is requested without the matching credential
    pub fn check_credentials(&self) -> Result<(), ParkingError> {
        if self.needs_handicap && !self.has_handicap_permit {
            return Err(ParkingError::Permission(Credential::HandicapPermit));
        }
        if self.needs_reserved && !self.has_reservation {
            return Err(ParkingError::Permission(Credential::Reservation));
        }
        Ok(())
    }

    /// Whether a spot is free and carries every flag this request needs
    pub fn matches(&self, spot: &Spot) -> bool {
        matches_flags(spot, self.needs_handicap, self.needs_reserved)
    }
}

impl fmt::Display for SpotRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.needs_handicap, self.needs_reserved) {
            (false, false) => f.write_str("regular"),
            (true, false) => f.write_str("handicap"),
            (false, true) => f.write_str("reserved"),
            (true, true) => f.write_str("handicap+reserved"),
        }
    }
}

/// Free and carrying the requested category flags. A request without flags
/// accepts any free spot, including handicap and reserved ones.
pub(crate) fn matches_flags(spot: &Spot, needs_handicap: bool, needs_reserved: bool) -> bool {
    !spot.is_occupied()
        && (!needs_handicap || spot.handicap)
        && (!needs_reserved || spot.reserved)
}
