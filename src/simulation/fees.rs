//! Parking fee calculation
//!
//! Fees depend only on the entry and exit stamps, the vehicle category and the
//! billing mode. Amounts are exact decimals.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::VehicleCategory;

/// Default rates, per category
pub const RATE_CAR_HOURLY: Decimal = dec!(10.00);
pub const RATE_CAR_PER_MINUTE: Decimal = dec!(0.20);
pub const RATE_BIKE_HOURLY: Decimal = dec!(5.00);
pub const RATE_BIKE_PER_MINUTE: Decimal = dec!(0.10);
pub const RATE_HEAVY_HOURLY: Decimal = dec!(20.00);
pub const RATE_HEAVY_PER_MINUTE: Decimal = dec!(0.40);

/// How elapsed time turns into billable units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillingMode {
    /// Every started hour is billed in full
    Hourly,
    /// Only completed minutes are billed
    PerMinute,
}

impl std::fmt::Display for BillingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingMode::Hourly => f.write_str("HOURLY"),
            BillingMode::PerMinute => f.write_str("MINUTE"),
        }
    }
}

/// Rates for one vehicle category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRates {
    pub hourly: Decimal,
    pub per_minute: Decimal,
}

impl CategoryRates {
    pub fn new(hourly: Decimal, per_minute: Decimal) -> Self {
        Self { hourly, per_minute }
    }

    pub fn rate(&self, mode: BillingMode) -> Decimal {
        match mode {
            BillingMode::Hourly => self.hourly,
            BillingMode::PerMinute => self.per_minute,
        }
    }
}

/// Per-category rate table. Categories without an entry bill at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateCard {
    rates: HashMap<VehicleCategory, CategoryRates>,
}

impl Default for RateCard {
    fn default() -> Self {
        Self::empty()
            .with(
                VehicleCategory::Car,
                CategoryRates::new(RATE_CAR_HOURLY, RATE_CAR_PER_MINUTE),
            )
            .with(
                VehicleCategory::Bike,
                CategoryRates::new(RATE_BIKE_HOURLY, RATE_BIKE_PER_MINUTE),
            )
            .with(
                VehicleCategory::Heavy,
                CategoryRates::new(RATE_HEAVY_HOURLY, RATE_HEAVY_PER_MINUTE),
            )
    }
}

impl RateCard {
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    pub fn with(mut self, category: VehicleCategory, rates: CategoryRates) -> Self {
        self.rates.insert(category, rates);
        self
    }

    pub fn set(&mut self, category: VehicleCategory, rates: CategoryRates) {
        self.rates.insert(category, rates);
    }

    pub fn rate(&self, category: VehicleCategory, mode: BillingMode) -> Decimal {
        self.rates
            .get(&category)
            .map(|r| r.rate(mode))
            .unwrap_or(Decimal::ZERO)
    }
}

/// Billable units for a stay: started hours, or completed minutes.
///
/// Only whole minutes count in either mode, so a 30 second stay is free.
/// An exit stamped before the entry counts as zero elapsed time.
pub fn billable_units(entry: DateTime<Utc>, exit: DateTime<Utc>, mode: BillingMode) -> i64 {
    let elapsed = exit - entry;
    let minutes = if elapsed < chrono::Duration::zero() {
        warn!(
            "Exit time {} is before entry time {}; billing zero elapsed time",
            exit, entry
        );
        0
    } else {
        elapsed.num_minutes()
    };

    match mode {
        BillingMode::Hourly => {
            let hours = minutes / 60;
            if minutes % 60 > 0 {
                hours + 1
            } else {
                hours
            }
        }
        BillingMode::PerMinute => minutes,
    }
}

/// Fee for a stay from `entry` to `exit`
pub fn calculate_fee(
    entry: DateTime<Utc>,
    exit: DateTime<Utc>,
    category: VehicleCategory,
    mode: BillingMode,
    rates: &RateCard,
) -> Decimal {
    let units = billable_units(entry, exit, mode);
    Decimal::from(units) * rates.rate(category, mode)
}
