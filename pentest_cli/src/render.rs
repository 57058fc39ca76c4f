//! Text rendering of estimates for the terminal.

use pentest_core::estimation::estimate::{EstimateResult, PhaseKind};
use pentest_core::estimation::tiered::TieredQuote;
use pentest_core::{EngagementConfig, PricingConfig, Rupiah};

const RULE: &str = "═══════════════════════════════════════";
const LABEL_WIDTH: usize = 36;

/// Format an amount as `"<symbol> "` followed by the integer grouped in
/// thousands with `.` separators, e.g. `Rp 23.750.000`.
pub fn format_currency(amount: Rupiah, symbol: &str) -> String {
    let digits = amount.value().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{} {}", symbol, grouped)
}

fn days(n: u64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}

fn row(label: &str, value: impl AsRef<str>) -> String {
    format!("  {:width$}{}", format!("{}:", label), value.as_ref(), width = LABEL_WIDTH)
}

fn unit_description(config: &EngagementConfig, effective_units: Option<u64>) -> String {
    let counted = match config.formula_scope() {
        Some(scope) => scope.unit_label(),
        None => Some("units"),
    };
    match (counted, effective_units) {
        (None, _) => "fixed (not counted)".to_string(),
        (Some(label), Some(effective)) => format!("{} {} (effective {})", config.unit_count, label, effective),
        (Some(label), None) => format!("{} {}", config.unit_count, label),
    }
}

fn engagement_lines(config: &EngagementConfig, effective_units: Option<u64>) -> Vec<String> {
    vec![
        "Engagement:".to_string(),
        row("Scope", config.scope_summary()),
        row("Approach", config.approach.display_name()),
        row("Tester level", config.tester_level.display_name()),
        row("Units", unit_description(config, effective_units)),
        row("Pentesters", config.pentester_count.to_string()),
        row("Retests", config.retest_count.to_string()),
    ]
}

/// Render a man-day estimate as a text report.
pub fn render_estimate(config: &EngagementConfig, result: &EstimateResult, symbol: &str) -> String {
    let test = &result.initial_test;
    let mut lines = vec![
        RULE.to_string(),
        "  PENTEST ESTIMATE".to_string(),
        RULE.to_string(),
        String::new(),
    ];
    lines.extend(engagement_lines(config, Some(result.effective_units)));
    lines.push(String::new());

    lines.push("INITIAL TEST PHASE".to_string());
    lines.push(row(PhaseKind::Kickoff.label(), days(result.kickoff_days)));
    lines.push(row(
        PhaseKind::InitialTest.label(),
        format!("{} working days = {} man-days", test.calendar_days, test.man_days),
    ));
    lines.push(row(
        "  - Scanning",
        format!(
            "{} x {} = {} man-days",
            days(test.scanning_days_per_pentester),
            result.pentester_count,
            test.scanning_man_days
        ),
    ));
    lines.push(row(
        "  - Manual Testing",
        format!(
            "{} / {} = {} working days",
            days(test.manual_base_man_days),
            result.pentester_count,
            test.manual_calendar_days
        ),
    ));
    let targets = if result.target_count == 1 { "target" } else { "targets" };
    lines.push(row(
        PhaseKind::InitialReport.label(),
        format!("{} ({} {})", days(result.report_days), result.target_count, targets),
    ));
    lines.push(row(PhaseKind::Present.label(), days(result.present_days)));
    lines.push(row("Initial phase man-days", result.initial_phase_man_days.to_string()));

    if let Some(round) = result.retest {
        lines.push(String::new());
        lines.push(format!("RETEST PHASE ({}x)", result.retest_count));
        lines.push(row(PhaseKind::Patching.label(), days(round.patching_days)));
        let capped = if result.retest_capped() { " (capped)" } else { "" };
        lines.push(row(
            PhaseKind::Retest.label(),
            format!(
                "{} working days = {} man-days{}",
                round.retest_calendar_days, round.retest_man_days, capped
            ),
        ));
        lines.push(row(PhaseKind::RetestReport.label(), days(round.report_days)));
        lines.push(row("Man-days per retest", round.man_days.to_string()));
        lines.push(row("Total retest man-days", result.retest_total_man_days.to_string()));
    }

    lines.push(String::new());
    lines.push(row("Duration", format!("{} working days", result.total_calendar_days)));
    lines.push(row("Total man-days", result.total_man_days.to_string()));
    lines.push(row("Man-day rate", format_currency(result.rate, symbol)));
    lines.push(RULE.to_string());
    lines.push(format!("  TOTAL ESTIMATE: {}", format_currency(result.total_cost, symbol)));
    lines.push(RULE.to_string());
    lines.join("\n")
}

/// Render a tiered quote as a text report.
pub fn render_tiered(config: &EngagementConfig, quote: &TieredQuote, symbol: &str) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "  PENTEST QUOTE (TIERED)".to_string(),
        RULE.to_string(),
        String::new(),
    ];
    lines.extend(engagement_lines(config, None));
    lines.push(row("Urgency", quote.urgency.to_string()));
    lines.push(String::new());

    lines.push("PRICING".to_string());
    lines.push(row("Price per unit", format_currency(quote.price_per_unit, symbol)));
    lines.push(row("Scope multiplier", quote.scope_multiplier.to_string()));
    lines.push(row("Approach multiplier", quote.approach_multiplier.to_string()));
    lines.push(row("Level multiplier", quote.level_multiplier.to_string()));
    lines.push(row("Urgency multiplier", quote.urgency_multiplier.to_string()));
    lines.push(row("Subtotal", format_currency(quote.subtotal, symbol)));
    lines.push(row(
        &format!("Volume discount ({})", quote.discount_rate),
        format!("- {}", format_currency(quote.discount_amount, symbol)),
    ));
    lines.push(RULE.to_string());
    lines.push(format!("  TOTAL: {}", format_currency(quote.total, symbol)));
    lines.push(RULE.to_string());
    lines.join("\n")
}

/// Render the active pricing parameters.
pub fn render_rates(pricing: &PricingConfig) -> String {
    let symbol = pricing.currency_symbol.as_str();
    let mut lines = vec!["Man-day rates:".to_string()];
    for (level, rate) in pricing.rates.entries() {
        lines.push(row(level.display_name(), format_currency(rate, symbol)));
    }

    let tiered = &pricing.tiered;
    lines.push(String::new());
    lines.push("Tiered pricing:".to_string());
    lines.push(row("Price per unit", format_currency(tiered.price_per_unit, symbol)));
    for (scope, pct) in &tiered.scope_multipliers {
        lines.push(row(&format!("Scope {}", scope.code()), pct.to_string()));
    }
    for (approach, pct) in &tiered.approach_multipliers {
        lines.push(row(&format!("Approach {}", approach.code()), pct.to_string()));
    }
    for (level, pct) in &tiered.level_multipliers {
        lines.push(row(&format!("Level {}", level.code()), pct.to_string()));
    }
    for (urgency, pct) in &tiered.urgency_multipliers {
        lines.push(row(&format!("Urgency {}", urgency.code()), pct.to_string()));
    }
    let mut tiers = tiered.discount_tiers.clone();
    tiers.sort_by_key(|tier| tier.min_units);
    for tier in tiers {
        lines.push(row(&format!("Discount from {} units", tier.min_units), tier.discount.to_string()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pentest_core::estimation::tiered::{quote, DeliveryUrgency};
    use pentest_core::{estimate_default, Approach, Scope, TesterLevel};

    fn reference_config() -> EngagementConfig {
        EngagementConfig::new(Scope::Web, Approach::GreyBox, TesterLevel::Basic)
            .with_units(100)
            .with_pentesters(1)
            .with_retests(1)
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Rupiah(0), "Rp"), "Rp 0");
        assert_eq!(format_currency(Rupiah(999), "Rp"), "Rp 999");
        assert_eq!(format_currency(Rupiah(1_000), "Rp"), "Rp 1.000");
        assert_eq!(format_currency(Rupiah(1_250_000), "Rp"), "Rp 1.250.000");
        assert_eq!(format_currency(Rupiah(23_750_000), "IDR"), "IDR 23.750.000");
    }

    #[test]
    fn test_render_estimate() {
        let config = reference_config();
        let result = estimate_default(&config).unwrap();
        let text = render_estimate(&config, &result, "Rp");

        assert!(text.contains("INITIAL TEST PHASE"));
        assert!(text.contains("RETEST PHASE (1x)"));
        assert!(text.contains("5 working days = 5 man-days"));
        assert!(text.contains("100 endpoints (effective 100)"));
        assert!(text.contains("TOTAL ESTIMATE: Rp 23.750.000"));
        assert!(!text.contains("(capped)"));
    }

    #[test]
    fn test_render_estimate_lists_every_phase() {
        let config = reference_config().with_retests(2);
        let result = estimate_default(&config).unwrap();
        let text = render_estimate(&config, &result, "Rp");
        for phase in &result.phases {
            assert!(
                text.contains(&format!("{}:", phase.kind.label())),
                "missing {:?}",
                phase.kind
            );
        }
    }

    #[test]
    fn test_render_estimate_without_retest() {
        let config = EngagementConfig::new(Scope::ServerCloud, Approach::WhiteBox, TesterLevel::Basic).with_retests(0);
        let result = estimate_default(&config).unwrap();
        let text = render_estimate(&config, &result, "Rp");
        assert!(!text.contains("RETEST PHASE"));
        assert!(text.contains("fixed (not counted)"));
        assert!(text.contains("TOTAL ESTIMATE: Rp 10.000.000"));
    }

    #[test]
    fn test_render_capped_retest() {
        let config = reference_config().with_units(500);
        let result = estimate_default(&config).unwrap();
        assert!(render_estimate(&config, &result, "Rp").contains("(capped)"));
    }

    #[test]
    fn test_render_tiered() {
        let config = reference_config();
        let priced = quote(&config, DeliveryUrgency::Standard, &PricingConfig::default().tiered).unwrap();
        let text = render_tiered(&config, &priced, "Rp");
        assert!(text.contains("Volume discount (15%)"));
        assert!(text.contains("TOTAL: Rp 51.000.000"));
    }

    #[test]
    fn test_render_rates() {
        let text = render_rates(&PricingConfig::default());
        assert!(text.contains("Rp 1.250.000"));
        assert!(text.contains("Rp 2.000.000"));
        assert!(text.contains("Discount from 50 units"));
    }
}
