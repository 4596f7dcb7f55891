//! Simulated timeline that ties the lot, gates and payments together
//!
//! This is the entry point for running the parking simulation headless:
//! vehicles arrive at random, park, stay a while and pay on the way out.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rust_decimal::Decimal;

use super::clock::ManualClock;
use super::config::LotConfig;
use super::error::{ErrorKind, ParkingError};
use super::fees::BillingMode;
use super::gate::{EntryGate, ExitGate};
use super::lot::ParkingLot;
use super::payment::{CardPayment, CashPayment, PaymentProcessor, UpiPayment};
use super::stats::SimStats;
use super::ticket::Ticket;
use super::types::{SpotRequest, Vehicle, VehicleCategory};

/// 2024-01-01T08:00:00Z, the opening time of every simulated day
pub const SIM_START_TIMESTAMP: i64 = 1_704_096_000;

/// Gate labels used by the simulation
pub const ENTRY_GATE_IDS: [&str; 2] = ["GATE-1", "GATE-2"];
pub const EXIT_GATE_IDS: [&str; 2] = ["EXIT-1", "EXIT-2"];

/// Knobs for the arrival and departure process
#[derive(Debug, Clone)]
pub struct SimSettings {
    /// Chance per tick that any vehicles arrive
    pub arrival_chance: f64,
    /// Upper bound on arrivals in a single tick
    pub max_arrivals_per_tick: u32,
    /// Shortest stay, in minutes
    pub min_stay_minutes: i64,
    /// Longest stay, in minutes
    pub max_stay_minutes: i64,
    /// Fixed billing mode, or pick one per exit when `None`
    pub billing: Option<BillingMode>,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            arrival_chance: 0.6,
            max_arrivals_per_tick: 3,
            min_stay_minutes: 15,
            max_stay_minutes: 240,
            billing: None,
        }
    }
}

/// A vehicle currently inside the lot
#[derive(Debug, Clone)]
pub struct ParkedVehicle {
    pub ticket: Ticket,
    pub depart_at: DateTime<Utc>,
    /// Set after a declined card; the next attempt is paid in cash
    pub pay_in_cash: bool,
}

/// The main simulation world
pub struct SimWorld {
    /// The lot under simulation
    pub lot: ParkingLot,

    /// Simulated clock shared with the lot
    clock: Arc<ManualClock>,

    pub entry_gates: Vec<EntryGate>,
    pub exit_gates: Vec<ExitGate>,

    /// Vehicles inside the lot
    pub parked: Vec<ParkedVehicle>,

    pub settings: SimSettings,

    /// Simulated time since opening
    pub elapsed: Duration,

    /// Counter for generated plates
    next_plate: usize,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,

    pub stats: SimStats,
}

impl SimWorld {
    fn new_internal(
        config: &LotConfig,
        settings: SimSettings,
        rng: Option<StdRng>,
    ) -> Result<Self, ParkingError> {
        let start =
            DateTime::from_timestamp(SIM_START_TIMESTAMP, 0).unwrap_or(DateTime::UNIX_EPOCH);
        let clock = Arc::new(ManualClock::new(start));
        let lot = ParkingLot::from_config(config, clock.clone())?;

        Ok(Self {
            lot,
            clock,
            entry_gates: ENTRY_GATE_IDS.iter().map(|id| EntryGate::new(*id)).collect(),
            exit_gates: EXIT_GATE_IDS.iter().map(|id| ExitGate::new(*id)).collect(),
            parked: Vec::new(),
            settings,
            elapsed: Duration::zero(),
            next_plate: 0,
            rng,
            stats: SimStats::default(),
        })
    }

    pub fn new(config: &LotConfig, settings: SimSettings) -> Result<Self, ParkingError> {
        Self::new_internal(config, settings, None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(
        config: &LotConfig,
        settings: SimSettings,
        seed: u64,
    ) -> Result<Self, ParkingError> {
        Self::new_internal(config, settings, Some(StdRng::seed_from_u64(seed)))
    }

    pub fn create_default_world_with_seed(seed: u64) -> Result<Self, ParkingError> {
        Self::new_with_seed(&LotConfig::default(), SimSettings::default(), seed)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.lot.now()
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distr::uniform::SampleUniform,
        R: rand::distr::uniform::SampleRange<T>,
    {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    fn random_bool(&mut self, p: f64) -> bool {
        // NaN counts as "never"
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        match &mut self.rng {
            Some(rng) => rng.random_bool(p),
            None => rand::rng().random_bool(p),
        }
    }

    /// Choose a random index into a collection of `len` items
    fn random_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.random_range(0..len))
    }

    fn next_plate(&mut self, category: VehicleCategory) -> String {
        self.next_plate += 1;
        let prefix = match category {
            VehicleCategory::Car => "CAR",
            VehicleCategory::Bike => "BKE",
            VehicleCategory::Heavy => "HVY",
        };
        format!("{}{:04}", prefix, self.next_plate)
    }

    fn random_category(&mut self) -> VehicleCategory {
        let roll: f64 = self.random_range(0.0..1.0);
        if roll < 0.6 {
            VehicleCategory::Car
        } else if roll < 0.9 {
            VehicleCategory::Bike
        } else {
            VehicleCategory::Heavy
        }
    }

    /// Mostly regular requests; some drivers ask for restricted spots and a
    /// few of those turn up without the credential.
    fn random_request(&mut self) -> SpotRequest {
        let roll: f64 = self.random_range(0.0..1.0);
        if roll < 0.8 {
            SpotRequest::standard()
        } else if roll < 0.9 {
            let permit = self.random_bool(0.8);
            SpotRequest::handicap(permit)
        } else {
            let reservation = self.random_bool(0.8);
            SpotRequest::reserved(reservation)
        }
    }

    fn random_payment(&mut self) -> Box<dyn PaymentProcessor> {
        match self.random_range(0..3) {
            0 => Box::new(CashPayment),
            1 => {
                let limit: i64 = self.random_range(10..=100);
                Box::new(CardPayment::with_limit(Decimal::from(limit)))
            }
            _ => Box::new(UpiPayment),
        }
    }

    fn billing_mode(&mut self) -> BillingMode {
        if let Some(mode) = self.settings.billing {
            return mode;
        }
        if self.random_bool(0.5) {
            BillingMode::Hourly
        } else {
            BillingMode::PerMinute
        }
    }

    /// Bring one vehicle to a random entry gate
    pub fn arrive(&mut self, vehicle: Vehicle, request: SpotRequest) -> Option<Ticket> {
        self.stats.arrivals += 1;

        let gate = match self.random_index(self.entry_gates.len()) {
            Some(index) => self.entry_gates[index].clone(),
            None => {
                warn!("No entry gates configured");
                return None;
            }
        };

        let plate = vehicle.plate.clone();
        match gate.enter(&self.lot, vehicle, request) {
            Ok(ticket) => {
                self.stats.parked += 1;
                let shortest = self.settings.min_stay_minutes;
                let longest = self.settings.max_stay_minutes.max(shortest);
                let stay = self.random_range(shortest..=longest);
                self.parked.push(ParkedVehicle {
                    ticket: ticket.clone(),
                    depart_at: self.now() + Duration::minutes(stay),
                    pay_in_cash: false,
                });
                Some(ticket)
            }
            Err(err) => {
                debug!("Vehicle {} turned away at {}: {}", plate, gate.id, err);
                self.stats.record_rejection(err.kind());
                None
            }
        }
    }

    fn spawn_arrivals(&mut self) {
        let chance = self.settings.arrival_chance;
        if !self.random_bool(chance) {
            return;
        }

        let most = self.settings.max_arrivals_per_tick.max(1);
        let count = self.random_range(1..=most);
        for _ in 0..count {
            let category = self.random_category();
            let plate = self.next_plate(category);
            let request = self.random_request();
            self.arrive(Vehicle::new(plate, category), request);
        }
    }

    /// Let every vehicle whose stay is over leave through a random exit gate
    fn process_departures(&mut self) {
        let now = self.now();
        let parked = std::mem::take(&mut self.parked);

        for mut vehicle in parked {
            if vehicle.depart_at > now {
                self.parked.push(vehicle);
                continue;
            }

            let gate = match self.random_index(self.exit_gates.len()) {
                Some(index) => self.exit_gates[index].clone(),
                None => {
                    warn!("No exit gates configured");
                    self.parked.push(vehicle);
                    continue;
                }
            };
            let processor: Box<dyn PaymentProcessor> = if vehicle.pay_in_cash {
                Box::new(CashPayment)
            } else {
                self.random_payment()
            };
            let mode = self.billing_mode();

            match gate.exit(&self.lot, &vehicle.ticket, processor.as_ref(), mode) {
                Ok(fee) => {
                    self.stats.departed += 1;
                    self.stats.revenue += fee;
                }
                Err(err) if err.kind() == ErrorKind::Payment => {
                    info!("{}; {} will pay in cash", err, vehicle.ticket.vehicle().plate);
                    self.stats.payment_declines += 1;
                    vehicle.pay_in_cash = true;
                    self.parked.push(vehicle);
                }
                Err(err) => {
                    warn!(
                        "Dropping {} after failed exit: {}",
                        vehicle.ticket.vehicle().plate,
                        err
                    );
                    self.stats.record_rejection(err.kind());
                }
            }
        }
    }

    /// Advance the simulation by `delta` of simulated time
    pub fn tick(&mut self, delta: Duration) {
        self.clock.advance(delta);
        self.elapsed += delta;

        self.process_departures();
        self.spawn_arrivals();
    }

    /// Print the availability board and running statistics
    pub fn print_summary(&self) {
        println!("=== Parking Simulation Summary ===");
        println!(
            "Time: {} ({} min since opening)",
            self.now().format("%H:%M"),
            self.elapsed.num_minutes()
        );
        println!("Vehicles parked: {}", self.parked.len());
        println!();

        println!("----- Parking Availability -----");
        match self.lot.availability() {
            Ok(rows) => {
                let mut current = None;
                for row in rows {
                    if current != Some(row.category) {
                        println!("Vehicle Type: {}", row.category);
                        current = Some(row.category);
                    }
                    println!("  Floor {}:", row.floor);
                    println!("    Regular Spots: {}", row.regular);
                    println!("    Handicap Spots: {}", row.handicap);
                    println!("    Reserved Spots: {}", row.reserved);
                }
            }
            Err(err) => println!("  unavailable: {}", err),
        }
        println!("-------------------------------");

        println!("--- Gate Activity ---");
        println!("  Arrivals: {}", self.stats.arrivals);
        println!("  Parked: {}", self.stats.parked);
        println!("  Departed: {}", self.stats.departed);
        println!("  Payment declines: {}", self.stats.payment_declines);
        for (kind, count) in &self.stats.rejections {
            println!("  Rejected ({:?}): {}", kind, count);
        }
        println!("  Revenue: ${:.2}", self.stats.revenue);
    }

    /// Log the final statistics block
    pub fn log_completion(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Simulated minutes: {}", self.elapsed.num_minutes());
        info!("Total arrivals: {}", self.stats.arrivals);
        info!("Total parked: {}", self.stats.parked);
        info!("Total departed: {}", self.stats.departed);
        info!("Still parked: {}", self.parked.len());
        info!("Payment declines: {}", self.stats.payment_declines);
        info!(
            "Rejected for permission: {}",
            self.stats.rejections_of(ErrorKind::Permission)
        );
        info!(
            "Rejected for capacity: {}",
            self.stats.rejections_of(ErrorKind::Capacity)
        );
        info!("Revenue: ${:.2}", self.stats.revenue);
        info!("Success rate: {:.1}%", self.stats.success_rate());
    }
}
