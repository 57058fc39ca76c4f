//! # Pricing Configuration
//!
//! Everything price-related that an operator may want to change without a
//! rebuild: the man-day rate table, the tiered model's parameters and the
//! currency symbol used by front ends.
//!
//! Config files are TOML. Every section is optional; omitted values keep
//! their built-in defaults, and a partial `[rates]` table is layered over the
//! default rates.
//!
//! ## Example
//!
//! ```rust
//! use pentest_core::engagement::TesterLevel;
//! use pentest_core::settings::PricingConfig;
//! use pentest_core::units::Rupiah;
//!
//! let config = PricingConfig::from_toml_str(
//!     r#"
//!     currency_symbol = "IDR"
//!
//!     [rates]
//!     expert = 2500000
//!     "#,
//!     "inline",
//! )
//! .unwrap();
//!
//! assert_eq!(config.currency_symbol, "IDR");
//! assert_eq!(config.rates.rate(TesterLevel::Expert), Rupiah(2_500_000));
//! assert_eq!(config.rates.rate(TesterLevel::Basic), Rupiah(1_250_000));
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PentestError, PentestResult};
use crate::estimation::tiered::TieredPricing;
use crate::rates::RateTable;

/// Symbol printed before amounts
pub const DEFAULT_CURRENCY_SYMBOL: &str = "Rp";

/// Pricing parameters for both engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub currency_symbol: String,
    pub rates: RateTable,
    pub tiered: TieredPricing,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            rates: RateTable::default(),
            tiered: TieredPricing::default(),
        }
    }
}

impl PricingConfig {
    /// Load a config file.
    ///
    /// # Returns
    ///
    /// * `Ok(PricingConfig)` - Parsed, merged over the defaults and validated
    /// * `Err(PentestError::ConfigError)` - Unreadable, malformed or invalid file
    pub fn load(path: &Path) -> PentestResult<Self> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| PentestError::config_error(&display, e.to_string()))?;
        let config = Self::from_toml_str(&text, &display)?;
        let origin = display.as_str();
        tracing::info!(path = %origin, "loaded pricing config");
        Ok(config)
    }

    /// Parse TOML text; `origin` names the source in error messages.
    pub fn from_toml_str(text: &str, origin: &str) -> PentestResult<Self> {
        let mut config: PricingConfig =
            toml::from_str(text).map_err(|e| PentestError::config_error(origin, e.message().to_string()))?;

        // A partial rate table overrides individual levels only
        config.rates = RateTable::default().merged(&config.rates);

        config
            .validate()
            .map_err(|e| PentestError::config_error(origin, e.to_string()))?;
        Ok(config)
    }

    /// Validate rates and tiered parameters.
    pub fn validate(&self) -> PentestResult<()> {
        if self.currency_symbol.trim().is_empty() {
            return Err(PentestError::invalid_input(
                "currency_symbol",
                format!("{:?}", self.currency_symbol),
                "Currency symbol cannot be blank",
            ));
        }
        self.rates.validate()?;
        self.tiered.validate()
    }

    /// Serialize to TOML, e.g. to write out a starting config
    pub fn to_toml_string(&self) -> PentestResult<String> {
        toml::to_string_pretty(self).map_err(|e| PentestError::SerializationError { reason: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::{Scope, TesterLevel};
    use crate::estimation::tiered::DeliveryUrgency;
    use crate::units::{Percent, Rupiah};

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = PricingConfig::from_toml_str("", "empty").unwrap();
        assert_eq!(config, PricingConfig::default());
    }

    #[test]
    fn test_tiered_overrides() {
        let text = r#"
            [tiered]
            price_per_unit = 750000

            [tiered.scope_multipliers]
            network = 90

            [tiered.urgency_multipliers]
            urgent = 175

            [[tiered.discount_tiers]]
            min_units = 200
            discount = 20
        "#;
        let config = PricingConfig::from_toml_str(text, "test.toml").unwrap();
        assert_eq!(config.tiered.price_per_unit, Rupiah(750_000));
        assert_eq!(config.tiered.scope_multiplier(Scope::Network), Percent(90));
        assert_eq!(config.tiered.scope_multiplier(Scope::Web), Percent(100));
        assert_eq!(config.tiered.urgency_multiplier(DeliveryUrgency::Urgent), Percent(175));
        assert_eq!(config.tiered.discount_for(150), Percent(0));
        assert_eq!(config.tiered.discount_for(200), Percent(20));
        assert_eq!(config.rates, RateTable::default());
    }

    #[test]
    fn test_malformed_file_names_origin() {
        let err = PricingConfig::from_toml_str("rates = [", "broken.toml").unwrap_err();
        match err {
            PentestError::ConfigError { path, .. } => assert_eq!(path, "broken.toml"),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_level_key_rejected() {
        let err = PricingConfig::from_toml_str("[rates]\nwizard = 1", "levels.toml").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_zero_rate_rejected() {
        let err = PricingConfig::from_toml_str("[rates]\nbasic = 0", "zero.toml").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("rates.basic"));
    }

    #[test]
    fn test_missing_file() {
        let err = PricingConfig::load(Path::new("/nonexistent/pricing.toml")).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PricingConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = PricingConfig::from_toml_str(&text, "roundtrip").unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.rates.rate(TesterLevel::Expert), Rupiah(2_000_000));
    }
}
