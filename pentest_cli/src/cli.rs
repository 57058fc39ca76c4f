//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pentest_core::estimation::tiered::DeliveryUrgency;
use pentest_core::RawEngagement;

#[derive(Parser, Debug)]
#[command(name = "pentest", version, about = "Estimate cost and duration of a penetration test")]
pub struct Cli {
    /// Pricing config file (TOML); built-in rates when omitted
    #[arg(short, long, global = true, env = "PENTEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of a text report
    #[arg(long, global = true)]
    pub json: bool,

    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Man-day estimate with a phase-by-phase breakdown
    Estimate(EngagementArgs),

    /// Per-unit price with multipliers and volume discount
    Tiered {
        #[command(flatten)]
        engagement: EngagementArgs,

        /// Delivery urgency (standard, priority, urgent)
        #[arg(long, default_value = "standard")]
        urgency: DeliveryUrgency,
    },

    /// Run a JSON request file ("-" reads stdin)
    Run {
        /// Path to the request
        path: PathBuf,
    },

    /// Show the active rates and tiered pricing parameters
    Rates {
        /// Print as a TOML config file that can be edited and passed to --config
        #[arg(long)]
        toml: bool,
    },
}

/// Engagement parameters as typed on the command line.
///
/// Counts are signed so that negative values reach validation and produce a
/// proper error instead of a parse failure.
#[derive(Args, Debug, Clone)]
pub struct EngagementArgs {
    /// Target scopes: web, mobile, network, server (repeat or comma-separate)
    #[arg(short, long = "scope", value_delimiter = ',', default_value = "web")]
    pub scopes: Vec<String>,

    /// Testing approach: blackbox, greybox, whitebox
    #[arg(short, long, default_value = "greybox")]
    pub approach: String,

    /// Tester level: basic, intermediate, expert (unknown levels price as intermediate)
    #[arg(short = 'l', long = "level", default_value = "basic")]
    pub tester_level: String,

    /// Endpoints (web/mobile) or devices (network)
    #[arg(short = 'u', long = "units", default_value_t = 100, allow_negative_numbers = true)]
    pub unit_count: i64,

    /// Pentesters working in parallel
    #[arg(short = 'p', long = "pentesters", default_value_t = 1, allow_negative_numbers = true)]
    pub pentester_count: i64,

    /// Retest rounds after the initial test
    #[arg(short = 'r', long = "retests", default_value_t = 1, allow_negative_numbers = true)]
    pub retest_count: i64,
}

impl From<EngagementArgs> for RawEngagement {
    fn from(args: EngagementArgs) -> Self {
        RawEngagement {
            scopes: args.scopes,
            approach: args.approach,
            tester_level: args.tester_level,
            unit_count: args.unit_count,
            pentester_count: args.pentester_count,
            retest_count: args.retest_count,
        }
    }
}
