use std::collections::BTreeSet;

use pentest_core::estimation::estimate::{estimate, estimate_default, RETEST_CALENDAR_CAP_DAYS};
use pentest_core::{Approach, EngagementConfig, RateTable, Scope, TesterLevel};
use proptest::prelude::*;

fn scope() -> impl Strategy<Value = Scope> {
    prop::sample::select(Scope::ALL.to_vec())
}

fn approach() -> impl Strategy<Value = Approach> {
    prop::sample::select(Approach::ALL.to_vec())
}

fn level() -> impl Strategy<Value = TesterLevel> {
    prop::sample::select(TesterLevel::ALL.to_vec())
}

fn config() -> impl Strategy<Value = EngagementConfig> {
    (
        prop::collection::btree_set(scope(), 1..=4),
        approach(),
        level(),
        1u32..=1000,
        1u32..=10,
        0u32..=5,
    )
        .prop_map(|(scopes, approach, tester_level, unit_count, pentester_count, retest_count)| {
            EngagementConfig {
                scopes,
                approach,
                tester_level,
                unit_count,
                pentester_count,
                retest_count,
            }
        })
}

proptest! {
    #[test]
    fn cost_is_man_days_times_rate(config in config()) {
        let rates = RateTable::default();
        let result = estimate(&config, &rates).unwrap();
        prop_assert_eq!(
            result.total_cost.value(),
            result.total_man_days * rates.rate(config.tester_level).value()
        );
    }

    #[test]
    fn estimate_is_idempotent(config in config()) {
        let first = estimate_default(&config).unwrap();
        let second = estimate_default(&config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn phases_sum_to_totals(config in config()) {
        let result = estimate_default(&config).unwrap();
        let man_days: u64 = result.phases.iter().map(|p| p.man_days).sum();
        let calendar_days: u64 = result.phases.iter().map(|p| p.calendar_days).sum();
        prop_assert_eq!(man_days, result.total_man_days);
        prop_assert_eq!(calendar_days, result.total_calendar_days);
        prop_assert_eq!(result.phases.len(), 4 + 3 * config.retest_count as usize);
    }

    #[test]
    fn more_units_never_cost_less(
        scope in scope(),
        approach in prop::sample::select(vec![Approach::GreyBox, Approach::WhiteBox]),
        units in 1u32..=1000,
        extra in 0u32..=500,
        pentesters in 1u32..=10,
        retests in 0u32..=5,
    ) {
        let base = EngagementConfig::new(scope, approach, TesterLevel::Basic)
            .with_pentesters(pentesters)
            .with_retests(retests);
        let smaller = estimate_default(&base.clone().with_units(units)).unwrap();
        let larger = estimate_default(&base.with_units(units + extra)).unwrap();
        prop_assert!(larger.total_man_days >= smaller.total_man_days);
    }

    #[test]
    fn retest_never_exceeds_cap(config in config()) {
        let result = estimate_default(&config).unwrap();
        if let Some(round) = result.retest {
            prop_assert!(round.retest_calendar_days <= RETEST_CALENDAR_CAP_DAYS);
            prop_assert!(round.retest_man_days <= RETEST_CALENDAR_CAP_DAYS * u64::from(config.pentester_count));
            if result.initial_test.calendar_days > RETEST_CALENDAR_CAP_DAYS {
                prop_assert_eq!(round.retest_calendar_days, RETEST_CALENDAR_CAP_DAYS);
            }
        } else {
            prop_assert_eq!(config.retest_count, 0);
        }
    }

    #[test]
    fn blackbox_web_ignores_unit_count(
        scope in prop::sample::select(vec![Scope::Web, Scope::Mobile]),
        units in 1u32..=500,
        pentesters in 1u32..=10,
    ) {
        let config = EngagementConfig::new(scope, Approach::BlackBox, TesterLevel::Basic)
            .with_units(units)
            .with_pentesters(pentesters);
        let result = estimate_default(&config).unwrap();
        prop_assert_eq!(result.initial_test.scanning_days_per_pentester, 3);
        prop_assert_eq!(result.initial_test.manual_base_man_days, 7);
    }

    #[test]
    fn web_units_below_floor_are_billed_as_fifty(units in 1u32..=50, approach in approach()) {
        let floor = EngagementConfig::new(Scope::Web, approach, TesterLevel::Basic).with_units(50);
        let small = floor.clone().with_units(units);
        prop_assert_eq!(estimate_default(&small).unwrap(), estimate_default(&floor).unwrap());
    }

    #[test]
    fn server_cloud_ignores_unit_count(units in 1u32..=500, approach in approach()) {
        let one = EngagementConfig::new(Scope::ServerCloud, approach, TesterLevel::Basic).with_units(1);
        let many = one.clone().with_units(units);
        prop_assert_eq!(estimate_default(&one).unwrap(), estimate_default(&many).unwrap());
    }

    #[test]
    fn scope_order_does_not_matter(scopes in prop::collection::vec(scope(), 1..=4)) {
        let forward: BTreeSet<Scope> = scopes.iter().copied().collect();
        let reverse: BTreeSet<Scope> = scopes.iter().rev().copied().collect();
        let mut a = EngagementConfig::default();
        a.scopes = forward;
        let mut b = EngagementConfig::default();
        b.scopes = reverse;
        prop_assert_eq!(estimate_default(&a).unwrap(), estimate_default(&b).unwrap());
    }
}
