//! # Man-Day Estimate
//!
//! Turns an [`EngagementConfig`] into a phase-by-phase breakdown of effort
//! (man-days), wall-clock duration (calendar days) and cost.
//!
//! ## Phases
//!
//! ```text
//! Kickoff -> Initial Test (scan, then manual) -> Initial Report -> Present
//!         -> [Patching -> Retest -> Retest Report] x retest_count
//! ```
//!
//! Scanning scales with headcount: every pentester scans for the same number
//! of days, so total scanning effort grows with the team. Manual testing is
//! a fixed amount of effort shared by the team, so only its calendar time
//! shrinks. Kickoff, reporting and presentation do not depend on headcount.
//!
//! ## Example
//!
//! ```rust
//! use pentest_core::engagement::{Approach, EngagementConfig, Scope, TesterLevel};
//! use pentest_core::estimation::estimate::estimate_default;
//! use pentest_core::units::Rupiah;
//!
//! let config = EngagementConfig::new(Scope::Web, Approach::GreyBox, TesterLevel::Basic)
//!     .with_units(100)
//!     .with_pentesters(1)
//!     .with_retests(1);
//!
//! let result = estimate_default(&config).unwrap();
//! assert_eq!(result.total_man_days, 19);
//! assert_eq!(result.total_cost, Rupiah(23_750_000));
//! ```

use serde::{Deserialize, Serialize};

use crate::engagement::{Approach, EngagementConfig, Scope};
use crate::errors::{PentestError, PentestResult};
use crate::rates::RateTable;
use crate::units::Rupiah;

/// Kickoff meeting length (days)
pub const KICKOFF_DAYS: u64 = 1;

/// Time the client is given to remediate before each retest (days)
pub const PATCHING_DAYS: u64 = 5;

/// A retest never takes longer than this many calendar days
pub const RETEST_CALENDAR_CAP_DAYS: u64 = 5;

/// Web/mobile engagements are billed for at least this many endpoints
pub const MINIMUM_BILLED_UNITS: u64 = 50;

/// Above this many effective units a report takes two days per target
pub const LARGE_ENGAGEMENT_UNITS: u64 = 300;

/// One presentation day covers up to this many targets
pub const TARGETS_PER_PRESENTATION: u64 = 5;

/// Scanning throughput for web/mobile (endpoints per day)
const WEB_SCAN_UNITS_PER_DAY: u64 = 100;
/// Manual testing throughput for web/mobile (endpoints per man-day)
const WEB_MANUAL_UNITS_PER_DAY: u64 = 25;
/// Scanning throughput for networks (devices per day)
const NETWORK_SCAN_UNITS_PER_DAY: u64 = 255;
/// Manual testing throughput for networks (devices per man-day)
const NETWORK_MANUAL_UNITS_PER_DAY: u64 = 20;

/// Engagement phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Kickoff,
    InitialTest,
    InitialReport,
    Present,
    Patching,
    Retest,
    RetestReport,
}

impl PhaseKind {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseKind::Kickoff => "Kickoff",
            PhaseKind::InitialTest => "Initial Test (Scanning + Manual)",
            PhaseKind::InitialReport => "Generate Initial Report",
            PhaseKind::Present => "Present",
            PhaseKind::Patching => "Patching",
            PhaseKind::Retest => "Retest",
            PhaseKind::RetestReport => "Generate Retest Report",
        }
    }

    /// Whether this phase belongs to a retest round
    pub fn is_retest(&self) -> bool {
        matches!(self, PhaseKind::Patching | PhaseKind::Retest | PhaseKind::RetestReport)
    }
}

/// One entry of the ordered phase list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,

    /// 1-based retest round, `None` for the initial phases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,

    /// Wall-clock duration
    pub calendar_days: u64,

    /// Billable effort
    pub man_days: u64,
}

impl Phase {
    fn initial(kind: PhaseKind, calendar_days: u64, man_days: u64) -> Self {
        Phase {
            kind,
            round: None,
            calendar_days,
            man_days,
        }
    }

    fn retest(kind: PhaseKind, round: u32, calendar_days: u64, man_days: u64) -> Self {
        Phase {
            kind,
            round: Some(round),
            calendar_days,
            man_days,
        }
    }
}

/// Per-pentester scanning days and total manual-test man-days for a formula row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEffort {
    pub scanning_days_per_pentester: u64,
    pub manual_base_man_days: u64,
}

/// Scanning and manual-testing breakdown of the initial test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialTestBreakdown {
    /// Days each pentester spends scanning
    pub scanning_days_per_pentester: u64,

    /// scanning_days_per_pentester x pentester_count
    pub scanning_man_days: u64,

    /// Manual-testing effort, independent of headcount
    pub manual_base_man_days: u64,

    /// ceil(manual_base_man_days / pentester_count)
    pub manual_calendar_days: u64,

    /// Scanning then manual testing, back to back
    pub calendar_days: u64,

    pub man_days: u64,
}

/// One retest round. Every round is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetestBreakdown {
    pub patching_days: u64,

    /// Initial test calendar days, capped at [`RETEST_CALENDAR_CAP_DAYS`]
    pub retest_calendar_days: u64,

    /// Initial test man-days, capped at 5 days per pentester
    pub retest_man_days: u64,

    pub report_days: u64,

    pub calendar_days: u64,

    pub man_days: u64,
}

/// Full estimate for one engagement.
///
/// ## JSON Example (abridged)
///
/// ```json
/// {
///   "effective_units": 100,
///   "target_count": 1,
///   "rate": 1250000,
///   "initial_phase_man_days": 8,
///   "total_man_days": 19,
///   "total_calendar_days": 19,
///   "total_cost": 23750000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateResult {
    /// Unit count after scope floors and multipliers
    pub effective_units: u64,

    pub target_count: u64,

    pub pentester_count: u32,

    pub retest_count: u32,

    /// Man-day rate applied
    pub rate: Rupiah,

    pub kickoff_days: u64,

    pub initial_test: InitialTestBreakdown,

    /// Initial report length
    pub report_days: u64,

    pub present_days: u64,

    /// Kickoff + initial test + report + present
    pub initial_phase_man_days: u64,

    pub initial_phase_calendar_days: u64,

    /// Single retest round, `None` when no retest was bought
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retest: Option<RetestBreakdown>,

    /// All retest rounds together
    pub retest_total_man_days: u64,

    pub phases: Vec<Phase>,

    pub total_man_days: u64,

    pub total_calendar_days: u64,

    pub total_cost: Rupiah,
}

impl EstimateResult {
    /// Phases of the initial test cycle
    pub fn initial_phases(&self) -> impl Iterator<Item = &Phase> {
        self.phases.iter().filter(|phase| !phase.kind.is_retest())
    }

    /// Phases belonging to one retest round
    pub fn round_phases(&self, round: u32) -> impl Iterator<Item = &Phase> {
        self.phases.iter().filter(move |phase| phase.round == Some(round))
    }

    /// Whether the retest was shortened by the calendar cap
    pub fn retest_capped(&self) -> bool {
        self.retest
            .map(|round| round.retest_calendar_days < self.initial_test.calendar_days)
            .unwrap_or(false)
    }
}

/// Unit count used in the formulas.
///
/// Network counts devices as given, Server/Cloud is always a single unit,
/// and web/mobile (or a multi-scope engagement) bills at least
/// [`MINIMUM_BILLED_UNITS`], doubled for white-box access.
pub fn effective_units(config: &EngagementConfig) -> u64 {
    let units = u64::from(config.unit_count);
    match config.formula_scope() {
        Some(Scope::Network) => units,
        Some(Scope::ServerCloud) => 1,
        Some(Scope::Web) | Some(Scope::Mobile) | None => {
            let base = units.max(MINIMUM_BILLED_UNITS);
            match config.approach {
                Approach::WhiteBox => base * 2,
                Approach::BlackBox | Approach::GreyBox => base,
            }
        }
    }
}

/// Scanning and manual-test effort for a formula row.
///
/// `scope` is the engagement's [`EngagementConfig::formula_scope`]; `None`
/// selects the generic web/mobile row.
pub fn test_effort(scope: Option<Scope>, approach: Approach, effective_units: u64) -> TestEffort {
    let (scanning_days_per_pentester, manual_base_man_days) = match (scope, approach) {
        (Some(Scope::Network), _) => (
            effective_units.div_ceil(NETWORK_SCAN_UNITS_PER_DAY),
            effective_units.div_ceil(NETWORK_MANUAL_UNITS_PER_DAY),
        ),
        (Some(Scope::ServerCloud), Approach::WhiteBox) => (1, 4),
        (Some(Scope::ServerCloud), Approach::GreyBox) => (2, 6),
        (Some(Scope::ServerCloud), Approach::BlackBox) => (2, 8),
        (_, Approach::BlackBox) => (3, 7),
        (_, Approach::GreyBox | Approach::WhiteBox) => (
            effective_units.div_ceil(WEB_SCAN_UNITS_PER_DAY),
            effective_units.div_ceil(WEB_MANUAL_UNITS_PER_DAY),
        ),
    };
    TestEffort {
        scanning_days_per_pentester,
        manual_base_man_days,
    }
}

/// Report length: one day per target, two for large engagements.
pub fn report_days(target_count: u64, effective_units: u64) -> u64 {
    let per_target = if effective_units > LARGE_ENGAGEMENT_UNITS { 2 } else { 1 };
    target_count * per_target
}

/// Presentation length: one day per started group of five targets.
pub fn present_days(target_count: u64) -> u64 {
    target_count.div_ceil(TARGETS_PER_PRESENTATION)
}

/// Estimate effort, duration and cost of an engagement.
///
/// This is a pure function: identical inputs always give identical results.
///
/// # Arguments
///
/// * `config` - Engagement parameters
/// * `rates` - Man-day rates by tester level
///
/// # Returns
///
/// * `Ok(EstimateResult)` - Full breakdown and totals
/// * `Err(PentestError)` - Invalid config, or a total that does not fit in `u64`
///
/// # Example
///
/// ```rust
/// use pentest_core::engagement::{Approach, EngagementConfig, Scope, TesterLevel};
/// use pentest_core::estimation::estimate::estimate;
/// use pentest_core::rates::RateTable;
///
/// let config = EngagementConfig::new(Scope::ServerCloud, Approach::WhiteBox, TesterLevel::Expert)
///     .with_retests(0);
///
/// let result = estimate(&config, &RateTable::default()).unwrap();
/// assert_eq!(result.total_man_days, 8);
/// assert!(result.retest.is_none());
/// ```
pub fn estimate(config: &EngagementConfig, rates: &RateTable) -> PentestResult<EstimateResult> {
    config.validate()?;

    let pentesters = u64::from(config.pentester_count);
    let rounds = u64::from(config.retest_count);
    let target_count = config.target_count();

    let effective_units = effective_units(config);
    let effort = test_effort(config.formula_scope(), config.approach, effective_units);
    tracing::debug!(
        scopes = %config.scope_summary(),
        approach = config.approach.code(),
        effective_units,
        scanning_days = effort.scanning_days_per_pentester,
        manual_base = effort.manual_base_man_days,
        "resolved test effort"
    );

    // Initial test: scan first, then test manually
    let scanning_man_days = checked(
        "scanning_man_days",
        effort.scanning_days_per_pentester.checked_mul(pentesters),
    )?;
    let manual_calendar_days = effort.manual_base_man_days.div_ceil(pentesters);
    let initial_test = InitialTestBreakdown {
        scanning_days_per_pentester: effort.scanning_days_per_pentester,
        scanning_man_days,
        manual_base_man_days: effort.manual_base_man_days,
        manual_calendar_days,
        calendar_days: effort.scanning_days_per_pentester + manual_calendar_days,
        man_days: checked(
            "initial_test_man_days",
            scanning_man_days.checked_add(effort.manual_base_man_days),
        )?,
    };

    let report_days = report_days(target_count, effective_units);
    let present_days = present_days(target_count);
    let initial_phase_man_days = KICKOFF_DAYS + initial_test.man_days + report_days + present_days;
    let initial_phase_calendar_days = KICKOFF_DAYS + initial_test.calendar_days + report_days + present_days;

    let mut phases = vec![
        Phase::initial(PhaseKind::Kickoff, KICKOFF_DAYS, KICKOFF_DAYS),
        Phase::initial(PhaseKind::InitialTest, initial_test.calendar_days, initial_test.man_days),
        Phase::initial(PhaseKind::InitialReport, report_days, report_days),
        Phase::initial(PhaseKind::Present, present_days, present_days),
    ];

    // Retest rounds never carry state between them
    let round = retest_round(&initial_test, pentesters, report_days);
    for index in 1..=config.retest_count {
        phases.push(Phase::retest(PhaseKind::Patching, index, round.patching_days, round.patching_days));
        phases.push(Phase::retest(PhaseKind::Retest, index, round.retest_calendar_days, round.retest_man_days));
        phases.push(Phase::retest(PhaseKind::RetestReport, index, round.report_days, round.report_days));
    }

    let retest_total_man_days = checked("retest_man_days", round.man_days.checked_mul(rounds))?;
    let retest_total_calendar_days = checked("retest_calendar_days", round.calendar_days.checked_mul(rounds))?;
    let total_man_days = checked(
        "total_man_days",
        initial_phase_man_days.checked_add(retest_total_man_days),
    )?;
    let total_calendar_days = checked(
        "total_calendar_days",
        initial_phase_calendar_days.checked_add(retest_total_calendar_days),
    )?;

    let rate = rates.rate(config.tester_level);
    let total_cost = rate
        .checked_mul(total_man_days)
        .ok_or_else(|| PentestError::overflow("total_cost"))?;

    tracing::debug!(total_man_days, total_calendar_days, total_cost = total_cost.0, "estimate complete");

    Ok(EstimateResult {
        effective_units,
        target_count,
        pentester_count: config.pentester_count,
        retest_count: config.retest_count,
        rate,
        kickoff_days: KICKOFF_DAYS,
        initial_test,
        report_days,
        present_days,
        initial_phase_man_days,
        initial_phase_calendar_days,
        retest: (config.retest_count > 0).then_some(round),
        retest_total_man_days,
        phases,
        total_man_days,
        total_calendar_days,
        total_cost,
    })
}

/// [`estimate`] with the built-in rate table.
pub fn estimate_default(config: &EngagementConfig) -> PentestResult<EstimateResult> {
    estimate(config, RateTable::standard())
}

fn retest_round(initial_test: &InitialTestBreakdown, pentesters: u64, report_days: u64) -> RetestBreakdown {
    let retest_calendar_days = initial_test.calendar_days.min(RETEST_CALENDAR_CAP_DAYS);
    let retest_man_days = initial_test
        .man_days
        .min(RETEST_CALENDAR_CAP_DAYS.saturating_mul(pentesters));
    RetestBreakdown {
        patching_days: PATCHING_DAYS,
        retest_calendar_days,
        retest_man_days,
        report_days,
        calendar_days: PATCHING_DAYS + retest_calendar_days + report_days,
        man_days: PATCHING_DAYS + retest_man_days + report_days,
    }
}

fn checked(quantity: &str, value: Option<u64>) -> PentestResult<u64> {
    value.ok_or_else(|| PentestError::overflow(quantity))
}
