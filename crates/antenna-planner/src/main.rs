//! Antenna Deployment Planner CLI
//!
//! Picks one antenna type per candidate site to cover a customer list.
//!
//! Usage:
//!   plan-antennas --customers data/potential_customers.csv \
//!                 --sites data/antenna_locations.csv \
//!                 --output solution.csv
//!
//!   plan-antennas --customers data/potential_customers.csv \
//!                 --sites data/antenna_locations.csv \
//!                 --verify-only solution.csv

use anyhow::{Context, Result};
use antenna_planner::{exporter, loader, plan, report, verify, AntennaCatalog};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "plan-antennas",
    about = "Select antenna sites and types covering every customer"
)]
struct Args {
    /// Customer locations CSV (id, _, latitude, longitude)
    #[arg(short = 'c', long)]
    customers: PathBuf,

    /// Candidate antenna sites CSV (id, _, latitude, longitude)
    #[arg(short = 's', long)]
    sites: PathBuf,

    /// Output solution CSV
    #[arg(short, long, default_value = "solution.csv")]
    output: PathBuf,

    /// JSON antenna catalog replacing the standard T-1..T-5 table
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Also write a JSON run report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Verify an existing solution file instead of planning
    #[arg(long, value_name = "SOLUTION")]
    verify_only: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "antenna_planner=debug,plan_antennas=debug"
    } else {
        "antenna_planner=info,plan_antennas=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    info!("{}", "=".repeat(60));
    info!("Antenna Deployment Planner");
    info!("{}", "=".repeat(60));

    let catalog = match &args.catalog {
        Some(path) => AntennaCatalog::from_json_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => AntennaCatalog::standard(),
    };

    let customers = loader::load_customers(&args.customers)
        .with_context(|| format!("loading customers {}", args.customers.display()))?;
    let sites = loader::load_sites(&args.sites)
        .with_context(|| format!("loading sites {}", args.sites.display()))?;

    if let Some(solution) = &args.verify_only {
        let deployments = exporter::read_deployments(solution)?;
        let result = verify(&customers, &sites, &deployments, &catalog)?;
        match result.first_uncovered {
            None => info!("Coverage: PASS ({} deployments)", deployments.len()),
            Some(customer_id) => warn!("Coverage: FAIL (first uncovered: {})", customer_id),
        }
        return Ok(());
    }

    let outcome = plan(&customers, &sites, &catalog)?;

    exporter::write_deployments(&args.output, &outcome.reduction.deployments)
        .with_context(|| format!("writing solution {}", args.output.display()))?;

    if let Some(path) = &args.report {
        report::PlanReport::new(&outcome, customers.len(), sites.len()).write_json(path)?;
    }

    report::log_summary(&outcome);

    Ok(())
}
