//! # Engagement Configuration
//!
//! The immutable input to every estimate: what is being tested, how, by whom,
//! and how many rounds of retesting the client buys.
//!
//! Two shapes are provided:
//!
//! - [`EngagementConfig`] - typed, validated input for the engines
//! - [`RawEngagement`] - loosely typed form values (strings and signed
//!   integers) as a front end collects them; [`RawEngagement::into_config`]
//!   applies the documented fallbacks and rejects everything else
//!
//! ## Example
//!
//! ```rust
//! use pentest_core::engagement::{Approach, EngagementConfig, Scope, TesterLevel};
//!
//! let config = EngagementConfig::new(Scope::Web, Approach::GreyBox, TesterLevel::Basic)
//!     .with_units(100)
//!     .with_pentesters(2)
//!     .with_retests(1);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.target_count(), 1);
//! ```
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "scopes": ["web", "mobile"],
//!   "approach": "greybox",
//!   "tester_level": "intermediate",
//!   "unit_count": 120,
//!   "pentester_count": 2,
//!   "retest_count": 1
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{PentestError, PentestResult};

/// Category of target under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Web application
    Web,
    /// Mobile application
    Mobile,
    /// Network infrastructure
    Network,
    /// Server or cloud configuration review
    #[serde(rename = "server", alias = "servercloud")]
    ServerCloud,
}

impl Scope {
    /// All scopes in display order
    pub const ALL: [Scope; 4] = [Scope::Web, Scope::Mobile, Scope::Network, Scope::ServerCloud];

    /// Identifier used in JSON and on the command line
    pub fn code(&self) -> &'static str {
        match self {
            Scope::Web => "web",
            Scope::Mobile => "mobile",
            Scope::Network => "network",
            Scope::ServerCloud => "server",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> PentestResult<Self> {
        match normalize(s).as_str() {
            "WEB" | "WEBAPP" | "WEBAPPLICATION" => Ok(Scope::Web),
            "MOBILE" | "MOBILEAPP" | "MOBILEAPPLICATION" => Ok(Scope::Mobile),
            "NETWORK" | "NETWORKINFRASTRUCTURE" | "INFRA" => Ok(Scope::Network),
            "SERVER" | "CLOUD" | "SERVERCLOUD" | "SERVERCLOUDCONFIGURATION" => Ok(Scope::ServerCloud),
            _ => Err(PentestError::unknown_variant(
                "scope",
                s,
                &Scope::ALL.map(|scope| scope.code()),
            )),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Scope::Web => "Web",
            Scope::Mobile => "Mobile",
            Scope::Network => "Network",
            Scope::ServerCloud => "Server/Cloud",
        }
    }

    /// What `unit_count` counts for this scope, `None` when it is ignored
    pub fn unit_label(&self) -> Option<&'static str> {
        match self {
            Scope::Web | Scope::Mobile => Some("endpoints"),
            Scope::Network => Some("devices"),
            Scope::ServerCloud => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Scope {
    type Err = PentestError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::from_str_flexible(s)
    }
}

/// Testing methodology, determining how much the testers are told up front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Approach {
    /// No prior knowledge of the target
    BlackBox,
    /// Partial knowledge (credentials, documentation)
    GreyBox,
    /// Full code and system access
    WhiteBox,
}

impl Approach {
    pub const ALL: [Approach; 3] = [Approach::BlackBox, Approach::GreyBox, Approach::WhiteBox];

    pub fn code(&self) -> &'static str {
        match self {
            Approach::BlackBox => "blackbox",
            Approach::GreyBox => "greybox",
            Approach::WhiteBox => "whitebox",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> PentestResult<Self> {
        match normalize(s).as_str() {
            "BLACKBOX" | "BLACK" => Ok(Approach::BlackBox),
            "GREYBOX" | "GRAYBOX" | "GREY" | "GRAY" => Ok(Approach::GreyBox),
            "WHITEBOX" | "WHITE" => Ok(Approach::WhiteBox),
            _ => Err(PentestError::unknown_variant(
                "approach",
                s,
                &Approach::ALL.map(|approach| approach.code()),
            )),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Approach::BlackBox => "Black box",
            Approach::GreyBox => "Grey box",
            Approach::WhiteBox => "White box",
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Approach {
    type Err = PentestError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Approach::from_str_flexible(s)
    }
}

/// Seniority of the testers, which sets the man-day rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TesterLevel {
    Basic,
    Intermediate,
    Expert,
}

impl TesterLevel {
    pub const ALL: [TesterLevel; 3] = [TesterLevel::Basic, TesterLevel::Intermediate, TesterLevel::Expert];

    /// Level used whenever the requested one is not recognized
    pub const FALLBACK: TesterLevel = TesterLevel::Intermediate;

    pub fn code(&self) -> &'static str {
        match self {
            TesterLevel::Basic => "basic",
            TesterLevel::Intermediate => "intermediate",
            TesterLevel::Expert => "expert",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> PentestResult<Self> {
        match normalize(s).as_str() {
            "BASIC" | "JUNIOR" => Ok(TesterLevel::Basic),
            "INTERMEDIATE" | "MID" | "MEDIOR" => Ok(TesterLevel::Intermediate),
            "EXPERT" | "SENIOR" => Ok(TesterLevel::Expert),
            _ => Err(PentestError::unknown_variant(
                "tester_level",
                s,
                &TesterLevel::ALL.map(|level| level.code()),
            )),
        }
    }

    /// Parse, resolving unrecognized text to [`TesterLevel::FALLBACK`].
    ///
    /// ```rust
    /// use pentest_core::engagement::TesterLevel;
    ///
    /// assert_eq!(TesterLevel::resolve("expert"), TesterLevel::Expert);
    /// assert_eq!(TesterLevel::resolve("wizard"), TesterLevel::Intermediate);
    /// ```
    pub fn resolve(s: &str) -> Self {
        TesterLevel::from_str_flexible(s).unwrap_or_else(|_| {
            tracing::warn!(level = s, fallback = TesterLevel::FALLBACK.code(), "unknown tester level");
            TesterLevel::FALLBACK
        })
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TesterLevel::Basic => "Basic",
            TesterLevel::Intermediate => "Intermediate",
            TesterLevel::Expert => "Expert",
        }
    }
}

impl fmt::Display for TesterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_uppercase().replace([' ', '-', '_', '/'], "")
}

fn resolve_tester_level<'de, D>(deserializer: D) -> Result<TesterLevel, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    Ok(TesterLevel::resolve(&text))
}

/// Upper bound on `retest_count`; each round is listed as its own phases
pub const MAX_RETEST_ROUNDS: u32 = 100;

/// Validated engagement parameters.
///
/// `unit_count` means endpoints for Web/Mobile and devices for Network; it is
/// ignored for a Server/Cloud-only engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementConfig {
    /// Selected target scopes (at least one)
    pub scopes: BTreeSet<Scope>,

    /// Testing methodology
    pub approach: Approach,

    /// Tester seniority; unknown text resolves to [`TesterLevel::FALLBACK`]
    #[serde(deserialize_with = "resolve_tester_level")]
    pub tester_level: TesterLevel,

    /// Endpoint or device count
    pub unit_count: u32,

    /// Pentesters working in parallel
    pub pentester_count: u32,

    /// Number of retest rounds after the initial test
    pub retest_count: u32,
}

impl EngagementConfig {
    /// Create a single-scope engagement with 100 units, one pentester and one retest.
    pub fn new(scope: Scope, approach: Approach, tester_level: TesterLevel) -> Self {
        EngagementConfig {
            scopes: BTreeSet::from([scope]),
            approach,
            tester_level,
            unit_count: 100,
            pentester_count: 1,
            retest_count: 1,
        }
    }

    /// Add another scope (builder pattern)
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scopes.insert(scope);
        self
    }

    pub fn with_units(mut self, unit_count: u32) -> Self {
        self.unit_count = unit_count;
        self
    }

    pub fn with_pentesters(mut self, pentester_count: u32) -> Self {
        self.pentester_count = pentester_count;
        self
    }

    pub fn with_retests(mut self, retest_count: u32) -> Self {
        self.retest_count = retest_count;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> PentestResult<()> {
        if self.scopes.is_empty() {
            return Err(PentestError::missing_field("scopes"));
        }
        if self.unit_count == 0 {
            return Err(PentestError::invalid_input(
                "unit_count",
                self.unit_count.to_string(),
                "Unit count must be at least 1",
            ));
        }
        if self.pentester_count == 0 {
            return Err(PentestError::invalid_input(
                "pentester_count",
                self.pentester_count.to_string(),
                "At least one pentester is required",
            ));
        }
        if self.retest_count > MAX_RETEST_ROUNDS {
            return Err(PentestError::invalid_input(
                "retest_count",
                self.retest_count.to_string(),
                format!("At most {} retest rounds can be estimated", MAX_RETEST_ROUNDS),
            ));
        }
        Ok(())
    }

    /// Number of selected targets
    pub fn target_count(&self) -> u64 {
        self.scopes.len() as u64
    }

    /// The scope whose formula row applies.
    ///
    /// A single-scope engagement uses its own row. Multi-scope engagements
    /// return `None` and are costed with the generic web/mobile row.
    pub fn formula_scope(&self) -> Option<Scope> {
        match self.scopes.len() {
            1 => self.scopes.iter().next().copied(),
            _ => None,
        }
    }

    /// Comma-separated scope names for display, `-` when nothing is selected
    pub fn scope_summary(&self) -> String {
        if self.scopes.is_empty() {
            return "-".to_string();
        }
        self.scopes
            .iter()
            .map(|scope| scope.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        EngagementConfig::new(Scope::Web, Approach::GreyBox, TesterLevel::Basic)
    }
}

/// Form values as collected by a front end, before validation.
///
/// Counts are signed so that negative input is reported instead of being
/// unrepresentable at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawEngagement {
    pub scopes: Vec<String>,
    pub approach: String,
    pub tester_level: String,
    pub unit_count: i64,
    pub pentester_count: i64,
    pub retest_count: i64,
}

impl RawEngagement {
    /// Convert to a validated [`EngagementConfig`].
    ///
    /// Unknown scopes and approaches are errors; an unknown tester level
    /// resolves to Intermediate.
    pub fn into_config(self) -> PentestResult<EngagementConfig> {
        if self.scopes.is_empty() {
            return Err(PentestError::missing_field("scopes"));
        }
        let scopes = self
            .scopes
            .iter()
            .map(|s| Scope::from_str_flexible(s))
            .collect::<PentestResult<BTreeSet<_>>>()?;

        if self.approach.trim().is_empty() {
            return Err(PentestError::missing_field("approach"));
        }
        let approach = Approach::from_str_flexible(&self.approach)?;
        let tester_level = TesterLevel::resolve(&self.tester_level);

        let config = EngagementConfig {
            scopes,
            approach,
            tester_level,
            unit_count: count_field("unit_count", self.unit_count)?,
            pentester_count: count_field("pentester_count", self.pentester_count)?,
            retest_count: count_field("retest_count", self.retest_count)?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn count_field(field: &str, value: i64) -> PentestResult<u32> {
    if value < 0 {
        return Err(PentestError::invalid_input(field, value.to_string(), "Count cannot be negative"));
    }
    u32::try_from(value).map_err(|_| PentestError::invalid_input(field, value.to_string(), "Count is too large"))
}
