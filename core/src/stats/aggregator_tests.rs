//! Tests for stat aggregation
//!
//! Pins the zero-floor add semantics, the single-rate-pass contract, and
//! the reset-and-replay behavior of refresh.

use hashbrown::HashMap;

use aura_types::BasicAttribute;

use super::{Stat, StatAggregator, StatContribution};

fn baseline(pairs: &[(BasicAttribute, i64)]) -> HashMap<BasicAttribute, i64> {
    pairs.iter().copied().collect()
}

fn contribution(
    values: &[(BasicAttribute, i64)],
    rates: &[(BasicAttribute, f32)],
) -> StatContribution {
    StatContribution {
        values: values.to_vec(),
        rates: rates.to_vec(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Stat Tuple
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn add_total_floors_at_zero() {
    let mut stat = Stat::new(100);
    stat.add_total(-250);
    assert_eq!(stat.total, 0, "total floors at zero, not negative");
    assert_eq!(stat.current, 0);
    assert_eq!(stat.base, 100, "base untouched by add_total");
}

#[test]
fn add_base_floors_at_zero() {
    let mut stat = Stat::new(50);
    stat.add_base(-80);
    assert_eq!(stat.total, 0);
    assert_eq!(stat.base, 0);
    assert_eq!(stat.current, 0);
}

#[test]
fn floor_is_not_subtraction() {
    // Driving a stat to the floor and then adding back does not restore
    // the pre-floor value: the clamped loss is gone.
    let mut stat = Stat::new(100);
    stat.add_total(-250);
    stat.add_total(250);
    assert_eq!(stat.total, 250, "the 150 lost to the floor is not recovered");
}

#[test]
fn adjust_current_clamps_to_total() {
    let mut stat = Stat::new(100);
    stat.adjust_current(50);
    assert_eq!(stat.current, 100, "current cannot exceed total");
    stat.adjust_current(-130);
    assert_eq!(stat.current, 0, "current cannot go negative");
}

// ═══════════════════════════════════════════════════════════════════════════
// Aggregator
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn new_seeds_from_baseline() {
    let aggregator = StatAggregator::new(baseline(&[
        (BasicAttribute::Health, 1000),
        (BasicAttribute::Defense, 40),
    ]));

    assert_eq!(aggregator.get(BasicAttribute::Health).total, 1000);
    assert_eq!(aggregator.get(BasicAttribute::Health).base, 1000);
    assert_eq!(aggregator.get(BasicAttribute::Defense).total, 40);
    assert_eq!(aggregator.get(BasicAttribute::Accuracy).total, 0);
}

#[test]
fn refresh_replays_gear_then_effects() {
    let mut aggregator = StatAggregator::new(baseline(&[(BasicAttribute::Health, 1000)]));
    aggregator.set_gear(vec![contribution(&[(BasicAttribute::Health, 500)], &[])]);

    aggregator.refresh(&[contribution(&[(BasicAttribute::Health, 200)], &[])]);
    assert_eq!(aggregator.get(BasicAttribute::Health).total, 1700);
    assert_eq!(aggregator.get(BasicAttribute::Health).base, 1000);

    // Dropping the effect contribution and refreshing recomputes cleanly
    aggregator.refresh(&[]);
    assert_eq!(aggregator.get(BasicAttribute::Health).total, 1500);
}

#[test]
fn rate_pass_applies_to_base_plus_bonus() {
    let mut aggregator = StatAggregator::new(baseline(&[(BasicAttribute::PhysicalAtk, 100)]));
    aggregator.refresh(&[contribution(
        &[(BasicAttribute::PhysicalAtk, 50)],
        &[(BasicAttribute::PhysicalAtk, 0.1)],
    )]);

    // 10% of (base 100 + bonus 50) = 15 on top of 150
    assert_eq!(aggregator.get(BasicAttribute::PhysicalAtk).total, 165);
}

#[test]
#[should_panic(expected = "rate pass already applied")]
fn second_rate_pass_in_one_refresh_is_a_contract_violation() {
    let mut aggregator = StatAggregator::new(baseline(&[(BasicAttribute::PhysicalAtk, 100)]));
    aggregator.refresh(&[contribution(&[], &[(BasicAttribute::PhysicalAtk, 0.1)])]);
    // refresh already ran the rate pass for this recompute
    aggregator.apply_rates();
}

#[test]
fn refresh_resets_current_to_total() {
    let mut aggregator = StatAggregator::new(baseline(&[(BasicAttribute::Health, 1000)]));
    aggregator.adjust_current(BasicAttribute::Health, -400);
    assert_eq!(aggregator.get(BasicAttribute::Health).current, 600);

    aggregator.refresh(&[]);
    assert_eq!(aggregator.get(BasicAttribute::Health).current, 1000);
}

#[test]
fn negative_effect_contribution_floors_at_zero_per_replay() {
    let mut aggregator = StatAggregator::new(baseline(&[(BasicAttribute::MovementSpeed, 100)]));
    aggregator.refresh(&[contribution(&[(BasicAttribute::MovementSpeed, -500)], &[])]);
    assert_eq!(aggregator.get(BasicAttribute::MovementSpeed).total, 0);

    // Removing the debuff and refreshing restores the baseline because the
    // whole attribute is rebuilt, not un-subtracted
    aggregator.refresh(&[]);
    assert_eq!(aggregator.get(BasicAttribute::MovementSpeed).total, 100);
}
