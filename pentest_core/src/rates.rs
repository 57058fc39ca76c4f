//! # Man-Day Rates
//!
//! Per-man-day price by tester level. A table may be partial (e.g. loaded
//! from a config file that only overrides the expert rate); lookups for a
//! missing level use the Intermediate rate, and if that is missing too, the
//! built-in Intermediate rate.
//!
//! ## Example
//!
//! ```rust
//! use pentest_core::engagement::TesterLevel;
//! use pentest_core::rates::RateTable;
//! use pentest_core::units::Rupiah;
//!
//! let rates = RateTable::default();
//! assert_eq!(rates.rate(TesterLevel::Basic), Rupiah(1_250_000));
//! assert_eq!(rates.rate(TesterLevel::Expert), Rupiah(2_000_000));
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::engagement::TesterLevel;
use crate::errors::{PentestError, PentestResult};
use crate::units::Rupiah;

pub const BASIC_RATE: Rupiah = Rupiah(1_250_000);
pub const INTERMEDIATE_RATE: Rupiah = Rupiah(1_500_000);
pub const EXPERT_RATE: Rupiah = Rupiah(2_000_000);

static DEFAULT_RATES: Lazy<RateTable> = Lazy::new(|| {
    RateTable::from_rates([
        (TesterLevel::Basic, BASIC_RATE),
        (TesterLevel::Intermediate, INTERMEDIATE_RATE),
        (TesterLevel::Expert, EXPERT_RATE),
    ])
});

/// Mapping from tester level to man-day rate.
///
/// ## TOML Example
///
/// ```toml
/// [rates]
/// basic = 1250000
/// intermediate = 1500000
/// expert = 2000000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: BTreeMap<TesterLevel, Rupiah>,
}

impl RateTable {
    /// Shared reference to the built-in rate table
    pub fn standard() -> &'static RateTable {
        &DEFAULT_RATES
    }

    /// Table with no entries; every lookup uses the fallback rate
    pub fn empty() -> Self {
        RateTable { rates: BTreeMap::new() }
    }

    pub fn from_rates(rates: impl IntoIterator<Item = (TesterLevel, Rupiah)>) -> Self {
        RateTable {
            rates: rates.into_iter().collect(),
        }
    }

    /// Set or replace the rate for a level (builder pattern)
    pub fn with_rate(mut self, level: TesterLevel, rate: Rupiah) -> Self {
        self.rates.insert(level, rate);
        self
    }

    /// Rate for `level`, falling back to the Intermediate rate
    pub fn rate(&self, level: TesterLevel) -> Rupiah {
        if let Some(rate) = self.rates.get(&level) {
            return *rate;
        }
        let fallback = self.fallback_rate();
        tracing::warn!(level = level.code(), rate = fallback.0, "no rate configured, using intermediate rate");
        fallback
    }

    /// Rate charged for a level without its own entry
    pub fn fallback_rate(&self) -> Rupiah {
        self.rates
            .get(&TesterLevel::FALLBACK)
            .copied()
            .unwrap_or(INTERMEDIATE_RATE)
    }

    /// Configured entries in level order
    pub fn entries(&self) -> impl Iterator<Item = (TesterLevel, Rupiah)> + '_ {
        self.rates.iter().map(|(level, rate)| (*level, *rate))
    }

    /// Rates must be positive
    pub fn validate(&self) -> PentestResult<()> {
        for (level, rate) in self.entries() {
            if rate == Rupiah::ZERO {
                return Err(PentestError::invalid_input(
                    format!("rates.{}", level.code()),
                    rate.to_string(),
                    "Man-day rate must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Overlay `other` on top of this table
    pub fn merged(&self, other: &RateTable) -> RateTable {
        let mut rates = self.rates.clone();
        rates.extend(other.entries());
        RateTable { rates }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        DEFAULT_RATES.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        let rates = RateTable::default();
        assert_eq!(rates.rate(TesterLevel::Basic), Rupiah(1_250_000));
        assert_eq!(rates.rate(TesterLevel::Intermediate), Rupiah(1_500_000));
        assert_eq!(rates.rate(TesterLevel::Expert), Rupiah(2_000_000));
        assert_eq!(RateTable::standard(), &rates);
    }

    #[test]
    fn test_missing_level_uses_intermediate() {
        let rates = RateTable::empty().with_rate(TesterLevel::Intermediate, Rupiah(1_800_000));
        assert_eq!(rates.rate(TesterLevel::Expert), Rupiah(1_800_000));
    }

    #[test]
    fn test_empty_table_uses_builtin_intermediate() {
        assert_eq!(RateTable::empty().rate(TesterLevel::Basic), INTERMEDIATE_RATE);
    }

    #[test]
    fn test_merged_overrides() {
        let overrides = RateTable::empty().with_rate(TesterLevel::Expert, Rupiah(2_500_000));
        let merged = RateTable::default().merged(&overrides);
        assert_eq!(merged.rate(TesterLevel::Expert), Rupiah(2_500_000));
        assert_eq!(merged.rate(TesterLevel::Basic), BASIC_RATE);
    }

    #[test]
    fn test_zero_rate_rejected() {
        let rates = RateTable::default().with_rate(TesterLevel::Basic, Rupiah::ZERO);
        let err = rates.validate().unwrap_err();
        assert_eq!(err.field(), Some("rates.basic"));
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_string(&RateTable::default()).unwrap();
        assert_eq!(json, r#"{"basic":1250000,"intermediate":1500000,"expert":2000000}"#);
    }
}
