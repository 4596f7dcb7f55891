//! Parking lot simulation module
//!
//! This module contains the spot allocation, ticketing and billing logic of a
//! multi-floor parking lot, plus a headless driver that runs a simulated day
//! against it. Everything here is plain Rust and can be exercised from the
//! console or from tests.

mod clock;
mod config;
mod error;
mod fees;
mod floor;
mod gate;
mod lot;
mod payment;
mod spot;
mod stats;
mod ticket;
mod types;
mod world;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{FloorConfig, LotConfig};
pub use error::{Credential, ErrorKind, ParkingError};
pub use fees::{
    billable_units, calculate_fee, BillingMode, CategoryRates, RateCard, RATE_BIKE_HOURLY,
    RATE_BIKE_PER_MINUTE, RATE_CAR_HOURLY, RATE_CAR_PER_MINUTE, RATE_HEAVY_HOURLY,
    RATE_HEAVY_PER_MINUTE,
};
pub use floor::ParkingFloor;
pub use gate::{EntryGate, ExitGate};
pub use lot::{FloorAvailability, ParkingLot};
pub use payment::{CardPayment, CashPayment, PaymentProcessor, UpiPayment};
pub use spot::{allocate, count_available, layout_spots, Spot};
pub use stats::SimStats;
pub use ticket::Ticket;
pub use types::{FloorNumber, GateId, SpotId, SpotRequest, TicketId, Vehicle, VehicleCategory};
pub use world::{
    ParkedVehicle, SimSettings, SimWorld, ENTRY_GATE_IDS, EXIT_GATE_IDS, SIM_START_TIMESTAMP,
};
