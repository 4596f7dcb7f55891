use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Parser, ValueEnum};

use parking_sim::simulation::{BillingMode, LotConfig, SimSettings, SimWorld};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Billing {
    /// Bill every started hour
    Hourly,
    /// Bill every completed minute
    PerMinute,
}

impl From<Billing> for BillingMode {
    fn from(billing: Billing) -> Self {
        match billing {
            Billing::Hourly => BillingMode::Hourly,
            Billing::PerMinute => BillingMode::PerMinute,
        }
    }
}

const MAX_DELTA_MINUTES: i64 = 7 * 24 * 60;

fn parse_probability(value: &str) -> Result<f64, String> {
    let p: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("`{}` is not between 0 and 1", value))
    }
}

#[derive(Parser)]
#[command(name = "parking_sim")]
#[command(about = "Headless parking lot simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Simulated minutes per tick (at most one week)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(i64).range(1..=MAX_DELTA_MINUTES))]
    delta_minutes: i64,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Chance per tick that vehicles arrive, between 0 and 1
    #[arg(long, default_value = "0.6", value_parser = parse_probability)]
    arrival_chance: f64,

    /// Billing mode for every exit (random per exit when omitted)
    #[arg(long, value_enum)]
    billing: Option<Billing>,

    /// Print a summary every this many ticks
    #[arg(long, default_value = "60")]
    summary_every: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,parking_sim=info"),
    )
    .init();

    let cli = Cli::parse();
    run_headless(&cli)
}


/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    println!("Running parking simulation in headless mode...");
    println!("Ticks: {}, Delta: {} min", cli.ticks, cli.delta_minutes);
    println!();

    let settings = SimSettings {
        arrival_chance: cli.arrival_chance,
        billing: cli.billing.map(BillingMode::from),
        ..SimSettings::default()
    };
    let config = LotConfig::default();

    let mut world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(&config, settings, seed),
        None => SimWorld::new(&config, settings),
    }
    .context("Failed to build the parking lot")?;

    println!("Initial state:");
    world.print_summary();
    println!();

    let delta = Duration::minutes(cli.delta_minutes);
    let summary_every = cli.summary_every.max(1);
    for tick in 1..=cli.ticks {
        world.tick(delta);

        if tick % summary_every == 0 && tick < cli.ticks {
            println!("--- After tick {} ---", tick);
            world.print_summary();
            println!();
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    world.log_completion();
    Ok(())
}
