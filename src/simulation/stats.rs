//! Running statistics for a simulated day at the lot

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::error::ErrorKind;

#[derive(Debug, Clone, Default)]
pub struct SimStats {
    /// Vehicles that showed up at an entry gate
    pub arrivals: usize,
    /// Vehicles that got a ticket
    pub parked: usize,
    /// Vehicles that paid and left
    pub departed: usize,
    /// Exit attempts refused by the payment method
    pub payment_declines: usize,
    /// Failed gate operations, by error kind
    pub rejections: BTreeMap<ErrorKind, usize>,
    /// Total fees collected
    pub revenue: Decimal,
}

impl SimStats {
    pub fn record_rejection(&mut self, kind: ErrorKind) {
        *self.rejections.entry(kind).or_insert(0) += 1;
    }

    pub fn rejections_of(&self, kind: ErrorKind) -> usize {
        self.rejections.get(&kind).copied().unwrap_or(0)
    }

    /// Share of arrivals that were given a spot, in percent
    pub fn success_rate(&self) -> f32 {
        if self.arrivals > 0 {
            (self.parked as f32 / self.arrivals as f32) * 100.0
        } else {
            0.0
        }
    }
}
