//! # Estimation Engines
//!
//! Each engine follows the pattern:
//!
//! - an input ([`EngagementConfig`], plus model-specific parameters)
//! - a JSON-serializable result
//! - a pure function returning `PentestResult<...>`
//!
//! ## Available Engines
//!
//! - [`estimate`] - Man-day, multi-phase estimate (effort, duration and cost)
//! - [`tiered`] - Per-unit price with multipliers and volume discounts

pub mod estimate;
pub mod tiered;

use serde::{Deserialize, Serialize};

use crate::engagement::EngagementConfig;
use crate::errors::PentestResult;
use crate::settings::PricingConfig;

pub use estimate::{estimate, estimate_default, EstimateResult, Phase, PhaseKind};
pub use tiered::{quote, DeliveryUrgency, TieredPricing, TieredQuote};

/// A request for either pricing model, tagged by `model`.
///
/// ## JSON Example
///
/// ```json
/// {
///   "model": "tiered",
///   "urgency": "priority",
///   "scopes": ["web"],
///   "approach": "greybox",
///   "tester_level": "basic",
///   "unit_count": 100,
///   "pentester_count": 1,
///   "retest_count": 0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum EstimateRequest {
    /// Man-day based, multi-phase estimate
    ManDay(EngagementConfig),
    /// Per-unit price with multipliers and discounts
    Tiered {
        #[serde(default)]
        urgency: DeliveryUrgency,
        #[serde(flatten)]
        config: EngagementConfig,
    },
}

/// Result of an [`EstimateRequest`], tagged the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum EstimateOutcome {
    ManDay(EstimateResult),
    Tiered(TieredQuote),
}

impl EstimateRequest {
    /// The engagement being priced
    pub fn config(&self) -> &EngagementConfig {
        match self {
            EstimateRequest::ManDay(config) => config,
            EstimateRequest::Tiered { config, .. } => config,
        }
    }

    /// Get the model name
    pub fn model(&self) -> &'static str {
        match self {
            EstimateRequest::ManDay(_) => "man_day",
            EstimateRequest::Tiered { .. } => "tiered",
        }
    }

    /// Run the selected engine with the given pricing parameters.
    pub fn run(&self, pricing: &PricingConfig) -> PentestResult<EstimateOutcome> {
        match self {
            EstimateRequest::ManDay(config) => estimate(config, &pricing.rates).map(EstimateOutcome::ManDay),
            EstimateRequest::Tiered { urgency, config } => {
                quote(config, *urgency, &pricing.tiered).map(EstimateOutcome::Tiered)
            }
        }
    }
}

impl EstimateOutcome {
    /// Final price, whichever model produced it
    pub fn total_cost(&self) -> crate::units::Rupiah {
        match self {
            EstimateOutcome::ManDay(result) => result.total_cost,
            EstimateOutcome::Tiered(quote) => quote.total,
        }
    }
}
