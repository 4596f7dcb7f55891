//! Parking tickets

use chrono::{DateTime, Utc};

use super::types::{FloorNumber, GateId, SpotId, TicketId, Vehicle};

/// Issued at entry, read back at exit. The spot is referenced by id only;
/// the lot keeps ownership of the spot itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: TicketId,
    vehicle: Vehicle,
    spot: SpotId,
    floor: FloorNumber,
    entry_time: DateTime<Utc>,
    entry_gate: GateId,
}

impl Ticket {
    pub fn new(
        id: TicketId,
        vehicle: Vehicle,
        spot: SpotId,
        floor: FloorNumber,
        entry_time: DateTime<Utc>,
        entry_gate: GateId,
    ) -> Self {
        Self {
            id,
            vehicle,
            spot,
            floor,
            entry_time,
            entry_gate,
        }
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn spot(&self) -> &SpotId {
        &self.spot
    }

    pub fn floor(&self) -> FloorNumber {
        self.floor
    }

    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    pub fn entry_gate(&self) -> &GateId {
        &self.entry_gate
    }
}
