//! Entry and exit gates
//!
//! Gates are labels on tickets, not resources: any number of gates may work
//! on the same lot at once. All coordination happens in the floor locks.

use log::{error, info, warn};
use rust_decimal::Decimal;

use super::error::{ErrorKind, ParkingError};
use super::fees::{calculate_fee, BillingMode};
use super::lot::ParkingLot;
use super::payment::PaymentProcessor;
use super::ticket::Ticket;
use super::types::{GateId, SpotRequest, Vehicle};

/// State errors mean an invariant broke somewhere; make them loud
fn report(err: ParkingError) -> ParkingError {
    if err.kind() == ErrorKind::State {
        error!("Parking invariant violated: {}", err);
    }
    err
}

#[derive(Debug, Clone)]
pub struct EntryGate {
    pub id: GateId,
}

impl EntryGate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: GateId::new(id),
        }
    }

    /// Park `vehicle` on the least busy floor, in the closest matching spot.
    ///
    /// A category with no floors is rejected first. Credentials are checked
    /// next, so a missing permit is reported as such even when the lot is full.
    pub fn enter(
        &self,
        lot: &ParkingLot,
        vehicle: Vehicle,
        request: SpotRequest,
    ) -> Result<Ticket, ParkingError> {
        let category = vehicle.category;
        lot.floors(category)?;
        request.check_credentials()?;

        let no_capacity = || ParkingError::NoCapacity { category, request };

        let floor = lot
            .select_floor(category, request.needs_handicap, request.needs_reserved)
            .map_err(report)?
            .ok_or_else(no_capacity)?;

        // Another gate may have taken the last spot since the floor was picked
        let (spot, ticket_id) = floor
            .claim_spot(&request, || lot.next_ticket_id())
            .map_err(report)?
            .ok_or_else(no_capacity)?;

        let ticket = Ticket::new(
            ticket_id,
            vehicle,
            spot,
            floor.number,
            lot.now(),
            self.id.clone(),
        );
        info!(
            "Vehicle {} entered via Gate {}. Spot: {}, Floor: {}, Ticket: {}",
            ticket.vehicle().plate,
            self.id,
            ticket.spot(),
            ticket.floor(),
            ticket.id()
        );
        Ok(ticket)
    }
}

#[derive(Debug, Clone)]
pub struct ExitGate {
    pub id: GateId,
}

impl ExitGate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: GateId::new(id),
        }
    }

    /// Charge for the stay on `ticket` and free its spot.
    ///
    /// If the payment fails the spot stays occupied. A ticket that no longer
    /// holds its spot is rejected before any payment is attempted.
    pub fn exit(
        &self,
        lot: &ParkingLot,
        ticket: &Ticket,
        processor: &dyn PaymentProcessor,
        mode: BillingMode,
    ) -> Result<Decimal, ParkingError> {
        if ticket.entry_gate() != &self.id {
            warn!(
                "Vehicle {} exiting from different gate ({}) than entry gate ({})",
                ticket.vehicle().plate,
                self.id,
                ticket.entry_gate()
            );
        }

        let category = ticket.vehicle().category;
        let floor = lot.floor(category, ticket.floor())?;

        let fee = floor
            .release_with(ticket.spot(), ticket.id(), || {
                let fee = calculate_fee(
                    ticket.entry_time(),
                    lot.now(),
                    category,
                    mode,
                    lot.rates(),
                );
                if processor.process(fee) {
                    Ok(fee)
                } else {
                    Err(ParkingError::PaymentDeclined {
                        ticket: ticket.id(),
                        amount: fee,
                    })
                }
            })
            .map_err(report)?;

        info!(
            "Vehicle {} exited via Gate {} from spot {}, Floor: {}. Fee: ${:.2} ({}, {})",
            ticket.vehicle().plate,
            self.id,
            ticket.spot(),
            ticket.floor(),
            fee,
            mode,
            processor.name()
        );
        Ok(fee)
    }
}
