//! Hospital queue simulation CLI
//!
//! Runs one simulated day (or any number of hours) and prints a summary.

use clap::{Parser, ValueEnum};
use hospital_queue_sim::io::reporting::{self, SimulationReport};
use hospital_queue_sim::{HospitalSimulation, Result, ServiceTimeDistribution, SimulationConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ServiceKind {
    Exponential,
    Poisson,
    Fixed,
}

#[derive(Debug, Parser)]
#[command(name = "hospital-queue", about = "Single-server hospital queue simulation")]
struct Args {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    horizon_hours: Option<u32>,
    /// Arrival rate for one hour of the day, as HOUR=PATIENTS_PER_HOUR (repeatable)
    #[arg(long = "rate", value_parser = parse_rate)]
    rates: Vec<(u32, f64)>,
    #[arg(long, value_enum)]
    service: Option<ServiceKind>,
    /// Mean (or fixed) service time in minutes
    #[arg(long)]
    service_mean: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 20)]
    histogram_bins: usize,
    #[arg(long)]
    patients_csv: Option<PathBuf>,
    #[arg(long)]
    queue_csv: Option<PathBuf>,
    #[arg(long)]
    hourly_csv: Option<PathBuf>,
    #[arg(long)]
    summary_json: Option<PathBuf>,
    /// Only log warnings and errors
    #[arg(long)]
    quiet: bool,
}

fn parse_rate(s: &str) -> std::result::Result<(u32, f64), String> {
    let (hour, rate) = s
        .split_once('=')
        .ok_or_else(|| format!("expected HOUR=RATE, got `{s}`"))?;
    let hour = hour.trim().parse().map_err(|e| format!("bad hour `{hour}`: {e}"))?;
    let rate = rate.trim().parse().map_err(|e| format!("bad rate `{rate}`: {e}"))?;
    Ok((hour, rate))
}

/// Defaults, then the config file, then individual flags.
fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };
    if let Some(hours) = args.horizon_hours {
        config.horizon_hours = hours;
    }
    if !args.rates.is_empty() {
        config.hourly_rates = args.rates.iter().copied().collect();
    }
    if args.service.is_some() || args.service_mean.is_some() {
        let mean = args.service_mean.unwrap_or_else(|| config.service.mean());
        config.service = match args.service {
            Some(ServiceKind::Poisson) => ServiceTimeDistribution::Poisson { mean },
            Some(ServiceKind::Fixed) => ServiceTimeDistribution::Fixed { duration: mean },
            Some(ServiceKind::Exponential) => ServiceTimeDistribution::Exponential { mean },
            None => match config.service {
                ServiceTimeDistribution::Poisson { .. } => ServiceTimeDistribution::Poisson { mean },
                ServiceTimeDistribution::Fixed { .. } => {
                    ServiceTimeDistribution::Fixed { duration: mean }
                }
                ServiceTimeDistribution::Exponential { .. } => {
                    ServiceTimeDistribution::Exponential { mean }
                }
            },
        };
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;
    let sim = HospitalSimulation::new(config)?.with_histogram_bins(args.histogram_bins);
    let outcome = sim.run()?;
    let (run, summary) = (&outcome.run, &outcome.summary);

    let report = SimulationReport {
        seed: outcome.seed,
        config: sim.config(),
        summary,
    };

    print!("{}", reporting::render_text_report(&report));

    if let Some(path) = &args.patients_csv {
        reporting::write_patients_csv(path, &run.patients)?;
    }
    if let Some(path) = &args.queue_csv {
        reporting::write_queue_series_csv(path, &run.queue_length)?;
    }
    if let Some(path) = &args.hourly_csv {
        reporting::write_hourly_csv(path, &summary.hourly)?;
    }
    if let Some(path) = &args.summary_json {
        reporting::write_summary_json(path, &report)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
