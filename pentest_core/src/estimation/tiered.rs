//! # Tiered Per-Unit Pricing
//!
//! Alternate pricing model: a flat price per endpoint/device, scaled by
//! scope, approach, tester level and delivery urgency multipliers, with a
//! volume discount for larger engagements. It does not compute effort or
//! duration; use [`super::estimate`] for that.
//!
//! ```text
//! subtotal = units x price_per_unit x scope x approach x level x urgency
//! total    = subtotal - subtotal x discount(units)
//! ```
//!
//! Multipliers are whole percentages. A multi-scope engagement adds the
//! multipliers of its scopes. All arithmetic is integer; division truncates.
//!
//! ## Example
//!
//! ```rust
//! use pentest_core::engagement::{Approach, EngagementConfig, Scope, TesterLevel};
//! use pentest_core::estimation::tiered::{quote, DeliveryUrgency, TieredPricing};
//! use pentest_core::units::Rupiah;
//!
//! let config = EngagementConfig::new(Scope::Web, Approach::GreyBox, TesterLevel::Basic)
//!     .with_units(100);
//!
//! let result = quote(&config, DeliveryUrgency::Standard, &TieredPricing::default()).unwrap();
//! assert_eq!(result.subtotal, Rupiah(60_000_000));
//! assert_eq!(result.total, Rupiah(51_000_000));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engagement::{Approach, EngagementConfig, Scope, TesterLevel};
use crate::errors::{PentestError, PentestResult};
use crate::units::{Percent, Rupiah};

/// How quickly the client needs the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryUrgency {
    #[default]
    Standard,
    Priority,
    Urgent,
}

impl DeliveryUrgency {
    pub const ALL: [DeliveryUrgency; 3] = [DeliveryUrgency::Standard, DeliveryUrgency::Priority, DeliveryUrgency::Urgent];

    pub fn code(&self) -> &'static str {
        match self {
            DeliveryUrgency::Standard => "standard",
            DeliveryUrgency::Priority => "priority",
            DeliveryUrgency::Urgent => "urgent",
        }
    }

    pub fn from_str_flexible(s: &str) -> PentestResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "normal" => Ok(DeliveryUrgency::Standard),
            "priority" | "fast" => Ok(DeliveryUrgency::Priority),
            "urgent" | "rush" => Ok(DeliveryUrgency::Urgent),
            _ => Err(PentestError::unknown_variant(
                "urgency",
                s,
                &DeliveryUrgency::ALL.map(|urgency| urgency.code()),
            )),
        }
    }
}

impl fmt::Display for DeliveryUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeliveryUrgency::Standard => "Standard",
            DeliveryUrgency::Priority => "Priority",
            DeliveryUrgency::Urgent => "Urgent",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DeliveryUrgency {
    type Err = PentestError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeliveryUrgency::from_str_flexible(s)
    }
}

/// Volume discount granted from `min_units` upwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub min_units: u32,
    pub discount: Percent,
}

/// Parameters of the tiered model.
///
/// Map entries that are absent use the built-in multiplier for that key, so
/// a config file only needs to list what it changes.
///
/// ## TOML Example
///
/// ```toml
/// [tiered]
/// price_per_unit = 500000
///
/// [tiered.urgency_multipliers]
/// urgent = 175
///
/// [[tiered.discount_tiers]]
/// min_units = 200
/// discount = 20
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TieredPricing {
    /// Price of a single endpoint/device at 1.0x
    pub price_per_unit: Rupiah,
    pub scope_multipliers: BTreeMap<Scope, Percent>,
    pub approach_multipliers: BTreeMap<Approach, Percent>,
    pub level_multipliers: BTreeMap<TesterLevel, Percent>,
    pub urgency_multipliers: BTreeMap<DeliveryUrgency, Percent>,
    pub discount_tiers: Vec<DiscountTier>,
}

pub const DEFAULT_PRICE_PER_UNIT: Rupiah = Rupiah(500_000);

fn default_scope_multiplier(scope: Scope) -> Percent {
    match scope {
        Scope::Web => Percent(100),
        Scope::Mobile => Percent(120),
        Scope::Network => Percent(80),
        Scope::ServerCloud => Percent(150),
    }
}

fn default_approach_multiplier(approach: Approach) -> Percent {
    match approach {
        Approach::BlackBox => Percent(100),
        Approach::GreyBox => Percent(120),
        Approach::WhiteBox => Percent(150),
    }
}

fn default_level_multiplier(level: TesterLevel) -> Percent {
    match level {
        TesterLevel::Basic => Percent(100),
        TesterLevel::Intermediate => Percent(130),
        TesterLevel::Expert => Percent(170),
    }
}

fn default_urgency_multiplier(urgency: DeliveryUrgency) -> Percent {
    match urgency {
        DeliveryUrgency::Standard => Percent(100),
        DeliveryUrgency::Priority => Percent(125),
        DeliveryUrgency::Urgent => Percent(150),
    }
}

impl Default for TieredPricing {
    fn default() -> Self {
        TieredPricing {
            price_per_unit: DEFAULT_PRICE_PER_UNIT,
            scope_multipliers: Scope::ALL.map(|s| (s, default_scope_multiplier(s))).into_iter().collect(),
            approach_multipliers: Approach::ALL.map(|a| (a, default_approach_multiplier(a))).into_iter().collect(),
            level_multipliers: TesterLevel::ALL.map(|l| (l, default_level_multiplier(l))).into_iter().collect(),
            urgency_multipliers: DeliveryUrgency::ALL
                .map(|u| (u, default_urgency_multiplier(u)))
                .into_iter()
                .collect(),
            discount_tiers: vec![
                DiscountTier {
                    min_units: 50,
                    discount: Percent(10),
                },
                DiscountTier {
                    min_units: 100,
                    discount: Percent(15),
                },
            ],
        }
    }
}

impl TieredPricing {
    pub fn scope_multiplier(&self, scope: Scope) -> Percent {
        self.scope_multipliers
            .get(&scope)
            .copied()
            .unwrap_or_else(|| default_scope_multiplier(scope))
    }

    pub fn approach_multiplier(&self, approach: Approach) -> Percent {
        self.approach_multipliers
            .get(&approach)
            .copied()
            .unwrap_or_else(|| default_approach_multiplier(approach))
    }

    pub fn level_multiplier(&self, level: TesterLevel) -> Percent {
        self.level_multipliers
            .get(&level)
            .copied()
            .unwrap_or_else(|| default_level_multiplier(level))
    }

    pub fn urgency_multiplier(&self, urgency: DeliveryUrgency) -> Percent {
        self.urgency_multipliers
            .get(&urgency)
            .copied()
            .unwrap_or_else(|| default_urgency_multiplier(urgency))
    }

    /// Discount of the highest tier reached by `units`, zero below every tier
    pub fn discount_for(&self, units: u64) -> Percent {
        self.discount_tiers
            .iter()
            .filter(|tier| u64::from(tier.min_units) <= units)
            .max_by_key(|tier| tier.min_units)
            .map(|tier| tier.discount)
            .unwrap_or(Percent(0))
    }

    /// Price and multipliers must be positive, discounts below 100%
    pub fn validate(&self) -> PentestResult<()> {
        if self.price_per_unit == Rupiah::ZERO {
            return Err(PentestError::invalid_input(
                "tiered.price_per_unit",
                "0",
                "Price per unit must be positive",
            ));
        }
        let multipliers = self
            .scope_multipliers
            .iter()
            .map(|(k, v)| (format!("tiered.scope_multipliers.{}", k.code()), *v))
            .chain(
                self.approach_multipliers
                    .iter()
                    .map(|(k, v)| (format!("tiered.approach_multipliers.{}", k.code()), *v)),
            )
            .chain(
                self.level_multipliers
                    .iter()
                    .map(|(k, v)| (format!("tiered.level_multipliers.{}", k.code()), *v)),
            )
            .chain(
                self.urgency_multipliers
                    .iter()
                    .map(|(k, v)| (format!("tiered.urgency_multipliers.{}", k.code()), *v)),
            );
        for (field, multiplier) in multipliers {
            if multiplier.value() == 0 {
                return Err(PentestError::invalid_input(field, "0", "Multiplier must be positive"));
            }
        }
        for tier in &self.discount_tiers {
            if tier.discount.value() >= 100 {
                return Err(PentestError::invalid_input(
                    "tiered.discount_tiers",
                    tier.discount.to_string(),
                    "Discount must be below 100%",
                ));
            }
        }
        Ok(())
    }
}

/// Itemized result of the tiered model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredQuote {
    /// Units priced (the raw unit count, no floor)
    pub units: u64,
    pub price_per_unit: Rupiah,

    /// Sum over the selected scopes
    pub scope_multiplier: Percent,
    pub approach_multiplier: Percent,
    pub level_multiplier: Percent,
    pub urgency: DeliveryUrgency,
    pub urgency_multiplier: Percent,

    pub subtotal: Rupiah,
    pub discount_rate: Percent,
    pub discount_amount: Rupiah,
    pub total: Rupiah,
}

/// Price an engagement with the tiered model.
///
/// # Returns
///
/// * `Ok(TieredQuote)` - Itemized price
/// * `Err(PentestError)` - Invalid config or pricing, or a price beyond `u64`
pub fn quote(config: &EngagementConfig, urgency: DeliveryUrgency, pricing: &TieredPricing) -> PentestResult<TieredQuote> {
    config.validate()?;
    pricing.validate()?;

    let units = u64::from(config.unit_count);
    let scope_multiplier = Percent(
        config
            .scopes
            .iter()
            .map(|scope| pricing.scope_multiplier(*scope).value())
            .sum(),
    );
    let approach_multiplier = pricing.approach_multiplier(config.approach);
    let level_multiplier = pricing.level_multiplier(config.tester_level);
    let urgency_multiplier = pricing.urgency_multiplier(urgency);

    let numerator = [
        u128::from(scope_multiplier.value()),
        u128::from(approach_multiplier.value()),
        u128::from(level_multiplier.value()),
        u128::from(urgency_multiplier.value()),
    ]
    .into_iter()
    .try_fold(u128::from(units) * u128::from(pricing.price_per_unit.value()), |acc, m| {
        acc.checked_mul(m)
    })
    .ok_or_else(|| PentestError::overflow("subtotal"))?;
    let subtotal = to_rupiah("subtotal", numerator / 100_u128.pow(4))?;

    let discount_rate = pricing.discount_for(units);
    let discount_amount = to_rupiah(
        "discount_amount",
        u128::from(subtotal.value()) * u128::from(discount_rate.value()) / 100,
    )?;
    let total = subtotal
        .checked_sub(discount_amount)
        .ok_or_else(|| PentestError::overflow("total"))?;

    tracing::debug!(
        units,
        subtotal = subtotal.0,
        discount = discount_rate.value(),
        total = total.0,
        "tiered quote"
    );

    Ok(TieredQuote {
        units,
        price_per_unit: pricing.price_per_unit,
        scope_multiplier,
        approach_multiplier,
        level_multiplier,
        urgency,
        urgency_multiplier,
        subtotal,
        discount_rate,
        discount_amount,
        total,
    })
}

fn to_rupiah(quantity: &str, value: u128) -> PentestResult<Rupiah> {
    u64::try_from(value)
        .map(Rupiah)
        .map_err(|_| PentestError::overflow(quantity))
}
