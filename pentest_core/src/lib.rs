//! # pentest_core - Penetration Test Estimation Engine
//!
//! `pentest_core` estimates the effort, duration and cost of a penetration
//! testing engagement from a handful of parameters: target scope, testing
//! approach, tester level, endpoint/device count, team size and number of
//! retests. All inputs and outputs are JSON-serializable so any front end
//! (CLI, web form, chat assistant) can drive it.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Integer arithmetic**: Days and money are exact, never rounded floats
//! - **Rich Errors**: Structured error types, not just strings
//! - **Presentation agnostic**: Formatting and localization belong to callers
//!
//! ## Quick Start
//!
//! ```rust
//! use pentest_core::{estimate, Approach, EngagementConfig, RateTable, Scope, TesterLevel};
//!
//! let config = EngagementConfig::new(Scope::Web, Approach::GreyBox, TesterLevel::Basic)
//!     .with_units(100)
//!     .with_pentesters(1)
//!     .with_retests(1);
//!
//! let result = estimate(&config, &RateTable::default()).unwrap();
//! assert_eq!(result.total_man_days, 19);
//!
//! // Serialize to JSON for a front end
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`engagement`] - Engagement parameters and their validation
//! - [`estimation`] - Man-day and tiered pricing engines
//! - [`rates`] - Man-day rate table
//! - [`settings`] - Pricing configuration (TOML)
//! - [`units`] - Money and percentage wrappers
//! - [`errors`] - Structured error types

pub mod engagement;
pub mod errors;
pub mod estimation;
pub mod rates;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use engagement::{Approach, EngagementConfig, RawEngagement, Scope, TesterLevel};
pub use errors::{PentestError, PentestResult};
pub use estimation::{estimate, estimate_default, EstimateOutcome, EstimateRequest, EstimateResult};
pub use rates::RateTable;
pub use settings::PricingConfig;
pub use units::{Percent, Rupiah};
