use pentest_core::estimation::tiered::{quote, DeliveryUrgency, TieredPricing};
use pentest_core::{Approach, EngagementConfig, Scope, TesterLevel};
use proptest::prelude::*;

fn engagement() -> impl Strategy<Value = EngagementConfig> {
    (
        prop::collection::btree_set(prop::sample::select(Scope::ALL.to_vec()), 1..=4),
        prop::sample::select(Approach::ALL.to_vec()),
        prop::sample::select(TesterLevel::ALL.to_vec()),
        1u32..=1000,
    )
        .prop_map(|(scopes, approach, tester_level, unit_count)| EngagementConfig {
            scopes,
            approach,
            tester_level,
            unit_count,
            pentester_count: 1,
            retest_count: 0,
        })
}

fn urgency() -> impl Strategy<Value = DeliveryUrgency> {
    prop::sample::select(DeliveryUrgency::ALL.to_vec())
}

proptest! {
    #[test]
    fn total_is_subtotal_minus_discount(config in engagement(), urgency in urgency()) {
        let result = quote(&config, urgency, &TieredPricing::default()).unwrap();
        prop_assert_eq!(result.total.value() + result.discount_amount.value(), result.subtotal.value());
        prop_assert!(result.discount_amount <= result.subtotal);
    }

    #[test]
    fn discount_matches_volume_tier(config in engagement(), urgency in urgency()) {
        let result = quote(&config, urgency, &TieredPricing::default()).unwrap();
        let expected = match config.unit_count {
            0..=49 => 0,
            50..=99 => 10,
            _ => 15,
        };
        prop_assert_eq!(result.discount_rate.value(), expected);
    }

    #[test]
    fn quote_ignores_team_size_and_retests(
        config in engagement(),
        urgency in urgency(),
        pentesters in 1u32..=10,
        retests in 0u32..=5,
    ) {
        let pricing = TieredPricing::default();
        let base = quote(&config, urgency, &pricing).unwrap();
        let other = quote(&config.clone().with_pentesters(pentesters).with_retests(retests), urgency, &pricing).unwrap();
        prop_assert_eq!(base, other);
    }
}
