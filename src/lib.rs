//! Parking Lot Simulation Library
//!
//! Multi-floor parking lot with nearest-spot allocation, ticketing and
//! time-based billing, plus a headless simulation driver.

pub mod simulation;
