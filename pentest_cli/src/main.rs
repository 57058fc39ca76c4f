//! # Pentest Estimator CLI
//!
//! Terminal front end for `pentest_core`. Collects engagement parameters
//! from flags (or a JSON request file), runs the selected pricing model and
//! prints a text report or JSON.
//!
//! ```text
//! pentest estimate --scope web --approach greybox --level basic --units 100 --retests 1
//! pentest tiered --scope web,mobile --units 120 --urgency priority
//! pentest --json run request.json
//! pentest rates --toml > pricing.toml
//! ```

mod cli;
mod logging;
mod render;

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pentest_core::estimation::{quote, EstimateOutcome, EstimateRequest};
use pentest_core::{estimate, PentestError, PricingConfig, RawEngagement};
use serde::Serialize;

use crate::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    let json = cli.json;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if json {
                if let Some(err) = e.downcast_ref::<PentestError>() {
                    if let Ok(text) = serde_json::to_string_pretty(err) {
                        eprintln!();
                        eprintln!("Error JSON:");
                        eprintln!("{}", text);
                    }
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let pricing = match &cli.config {
        Some(path) => PricingConfig::load(path)?,
        None => PricingConfig::default(),
    };
    let symbol = pricing.currency_symbol.as_str();

    match cli.command {
        Command::Estimate(args) => {
            let config = RawEngagement::from(args).into_config()?;
            let result = estimate(&config, &pricing.rates)?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!("{}", render::render_estimate(&config, &result, symbol));
            }
        }
        Command::Tiered { engagement, urgency } => {
            let config = RawEngagement::from(engagement).into_config()?;
            let priced = quote(&config, urgency, &pricing.tiered)?;
            if cli.json {
                print_json(&priced)?;
            } else {
                println!("{}", render::render_tiered(&config, &priced, symbol));
            }
        }
        Command::Run { path } => {
            let request = read_request(&path)?;
            tracing::info!(model = request.model(), "running request");
            let outcome = request.run(&pricing)?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                let text = match &outcome {
                    EstimateOutcome::ManDay(result) => render::render_estimate(request.config(), result, symbol),
                    EstimateOutcome::Tiered(priced) => render::render_tiered(request.config(), priced, symbol),
                };
                println!("{}", text);
            }
        }
        Command::Rates { toml } => {
            if toml {
                print!("{}", pricing.to_toml_string()?);
            } else if cli.json {
                print_json(&pricing)?;
            } else {
                println!("{}", render::render_rates(&pricing));
            }
        }
    }
    Ok(())
}

fn read_request(path: &Path) -> Result<EstimateRequest> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("reading request from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("reading request '{}'", path.display()))?
    };
    let request: EstimateRequest = serde_json::from_str(&text).map_err(PentestError::from)?;
    Ok(request)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
