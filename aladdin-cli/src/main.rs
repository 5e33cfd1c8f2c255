//! Aladdin-table - command-line driver
//! Runs the estimator plug-in contract against request files, the way a host
//! framework would.

use aladdin_table::{AladdinTable, EnergyEstimator, Estimate, EstimatorConfig, Request};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aladdin")]
#[command(author, version)]
#[command(about = "Aladdin-table energy estimator for 40nm primitives", long_about = None)]
struct Cli {
    /// Estimator configuration (TOML)
    #[arg(short, long, global = true, value_name = "FILE", env = "ALADDIN_CONFIG")]
    config: Option<PathBuf>,

    /// Directory with reference CSV tables (overrides the configuration)
    #[arg(short, long, global = true, value_name = "DIR", env = "ALADDIN_TABLES")]
    tables: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported primitive classes
    Classes,

    /// Report the accuracy for a request (0 = unsupported)
    Query {
        /// Request file (JSON), or '-' for stdin
        #[arg(value_name = "REQUEST")]
        request: PathBuf,
    },

    /// Estimate the energy of a request in picojoules
    Estimate {
        /// Request file (JSON), or '-' for stdin
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Show per-table contributions
        #[arg(short, long)]
        breakdown: bool,

        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show estimator configuration
    Info,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "aladdin_table=debug" } else { "aladdin_table=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let estimator = build_estimator(cli.config.as_deref(), cli.tables)?;

    match cli.command {
        Commands::Classes => {
            for class in estimator.supported_classes() {
                println!("{class}");
            }
            Ok(())
        }
        Commands::Query { request } => query_command(&estimator, &request),
        Commands::Estimate {
            request,
            breakdown,
            json,
        } => estimate_command(&estimator, &request, breakdown, json),
        Commands::Info => {
            print_info(&estimator);
            Ok(())
        }
    }
}

fn build_estimator(config: Option<&Path>, tables: Option<PathBuf>) -> Result<AladdinTable> {
    let mut config = match config {
        Some(path) => EstimatorConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => EstimatorConfig::default(),
    };
    if let Some(dir) = tables {
        config = config.with_tables_dir(dir);
    }
    Ok(AladdinTable::with_config(config)?)
}

fn read_request(path: &Path) -> Result<Request> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading request from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };

    serde_json::from_str(&text).with_context(|| format!("parsing request {}", path.display()))
}

fn query_command(estimator: &AladdinTable, path: &Path) -> Result<()> {
    let request = read_request(path)?;
    let accuracy = estimator.primitive_action_supported(&request);

    if accuracy == 0 {
        println!("{} {} (accuracy 0)", "unsupported".yellow().bold(), request.class_name);
    } else {
        println!("{} {} (accuracy {})", "supported".green().bold(), request.class_name, accuracy);
    }
    Ok(())
}

fn estimate_command(estimator: &AladdinTable, path: &Path, breakdown: bool, json: bool) -> Result<()> {
    let request = read_request(path)?;

    if estimator.primitive_action_supported(&request) == 0 {
        bail!(
            "{} does not support '{}' with technology {}",
            estimator.name(),
            request.class_name,
            request
                .attributes
                .get("technology")
                .map(|t| t.to_string())
                .unwrap_or_else(|| "<missing>".into())
        );
    }

    let estimate = estimator.estimate(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        print_estimate(&estimate, breakdown);
    }
    Ok(())
}

fn print_estimate(estimate: &Estimate, breakdown: bool) {
    println!(
        "{} {} {:?}: {} pJ",
        "Estimated".green().bold(),
        estimate.class.to_string().cyan(),
        estimate.action,
        estimate.energy_pj
    );

    if breakdown {
        for term in &estimate.contributions {
            println!(
                "  {:<16} {:<22} @{:>2}ns  table {:>10.4} pJ  ->  {:.6} pJ",
                term.class.to_string(),
                term.table.file_name(),
                term.latency_bucket,
                term.table_energy_pj,
                term.energy_pj
            );
        }
    }
}

fn print_info(estimator: &AladdinTable) {
    let config = estimator.config();

    println!("{}", estimator.name().bold());
    println!();
    println!("{}", "Configuration:".bold());
    println!("  technology       {}nm", config.technology_nm);
    println!("  accuracy         {}", config.accuracy);
    println!("  reference width  {} bits", config.reference_width);
    println!("  default latency  {} ns", config.default_latency_ns);
    println!("  latency buckets  {:?} ns", config.latency_buckets.as_slice());
    println!(
        "  tables           {}",
        config
            .tables_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "embedded".into())
    );
    println!();
    println!("{}", "Commands:".bold());
    println!("  aladdin classes                  # List supported classes");
    println!("  aladdin query request.json       # Capability query");
    println!("  aladdin estimate request.json -b # Energy with breakdown");
}
