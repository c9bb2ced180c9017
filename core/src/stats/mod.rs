//! Derived combat stats
//!
//! Each actor owns one [`StatAggregator`] holding a [`Stat`] tuple per
//! attribute. Contributions never subtract: additions clamp at a zero
//! floor, and the only way to take a contribution back out is a full
//! [`StatAggregator::refresh`], which rebuilds every attribute from the
//! metadata baseline and replays what is currently active.

#[cfg(test)]
mod aggregator_tests;

use hashbrown::HashMap;

use aura_types::BasicAttribute;

/// One attribute's (total, base, current, rate) tuple.
///
/// `base` is the metadata-derived floor, `total` includes gear and effect
/// bonuses, `current` is the spendable value (health, spirit, ...), and
/// `rate` accumulates multiplicative bonuses applied in the rate pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stat {
    pub total: i64,
    pub base: i64,
    pub current: i64,
    pub rate: f32,
}

impl Stat {
    pub fn new(value: i64) -> Self {
        Self {
            total: value,
            base: value,
            current: value,
            rate: 0.0,
        }
    }

    /// Add to the baseline. Total, base, and current all move together and
    /// floor at zero.
    pub fn add_base(&mut self, amount: i64) {
        self.total = (self.total + amount).max(0);
        self.base = (self.base + amount).max(0);
        self.current = (self.current + amount).max(0);
    }

    /// Add a bonus on top of the baseline. Floors at zero: a large negative
    /// contribution drives the stat to zero, never below.
    pub fn add_total(&mut self, amount: i64) {
        self.total = (self.total + amount).max(0);
        self.current = (self.current + amount).max(0);
    }

    pub fn add_rate(&mut self, rate: f32) {
        self.rate += rate;
    }

    /// Spend or restore the current value, clamped to `0..=total`.
    pub fn adjust_current(&mut self, amount: i64) {
        self.current = (self.current + amount).clamp(0, self.total);
    }

    /// Per-mille multiplier form used by speed-like attributes.
    pub fn multiplier(&self) -> f64 {
        self.total as f64 / 1000.0
    }
}

/// One contributor's flat values and rate bonuses, replayed on refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatContribution {
    pub values: Vec<(BasicAttribute, i64)>,
    pub rates: Vec<(BasicAttribute, f32)>,
}

impl StatContribution {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.rates.is_empty()
    }
}

/// Recomputes an actor's derived stats.
///
/// The baseline (level/job/species metadata) is fixed at construction and
/// replayed on every refresh, followed by the gear layer and then the
/// effect contributions supplied by the caller. The rate pass runs exactly
/// once at the end of each refresh.
#[derive(Debug, Clone, Default)]
pub struct StatAggregator {
    values: HashMap<BasicAttribute, Stat>,
    baseline: HashMap<BasicAttribute, i64>,
    gear: Vec<StatContribution>,
    rates_applied: bool,
}

impl StatAggregator {
    /// Build an aggregator over a metadata-derived baseline and compute the
    /// initial totals.
    pub fn new(baseline: HashMap<BasicAttribute, i64>) -> Self {
        let mut aggregator = Self {
            values: HashMap::new(),
            baseline,
            gear: Vec::new(),
            rates_applied: false,
        };
        aggregator.refresh(&[]);
        aggregator
    }

    /// Current tuple for an attribute; zeroes when never contributed to.
    pub fn get(&self, attribute: BasicAttribute) -> Stat {
        self.values.get(&attribute).copied().unwrap_or_default()
    }

    /// Replace the metadata baseline (level-up, job change). The caller is
    /// responsible for triggering a refresh afterwards.
    pub fn set_baseline(&mut self, baseline: HashMap<BasicAttribute, i64>) {
        self.baseline = baseline;
    }

    /// Replace the gear contribution layer. The caller is responsible for
    /// triggering a refresh afterwards.
    pub fn set_gear(&mut self, gear: Vec<StatContribution>) {
        self.gear = gear;
    }

    /// Spend or restore a resource attribute's current value.
    pub fn adjust_current(&mut self, attribute: BasicAttribute, amount: i64) {
        self.entry(attribute).adjust_current(amount);
    }

    /// Recompute every attribute: reset, replay baseline, gear, then the
    /// supplied effect contributions, then run the rate pass once.
    pub fn refresh(&mut self, effects: &[StatContribution]) {
        self.clear();

        let baseline: Vec<(BasicAttribute, i64)> =
            self.baseline.iter().map(|(&a, &v)| (a, v)).collect();
        for (attribute, value) in baseline {
            self.entry(attribute).add_base(value);
        }

        let gear = std::mem::take(&mut self.gear);
        for contribution in &gear {
            self.apply_contribution(contribution);
        }
        self.gear = gear;

        for contribution in effects {
            self.apply_contribution(contribution);
        }

        self.apply_rates();
    }

    /// Apply the accumulated rate bonuses to each attribute's total.
    ///
    /// Runs exactly once per refresh; a second call within the same pass
    /// would compound the bonus.
    pub fn apply_rates(&mut self) {
        debug_assert!(!self.rates_applied, "rate pass already applied");
        for stat in self.values.values_mut() {
            let bonus = (stat.rate as f64 * (stat.base + (stat.total - stat.base)) as f64) as i64;
            stat.add_total(bonus);
        }
        self.rates_applied = true;
    }

    fn apply_contribution(&mut self, contribution: &StatContribution) {
        for &(attribute, value) in &contribution.values {
            self.entry(attribute).add_total(value);
        }
        for &(attribute, rate) in &contribution.rates {
            self.entry(attribute).add_rate(rate);
        }
    }

    fn entry(&mut self, attribute: BasicAttribute) -> &mut Stat {
        self.values.entry(attribute).or_default()
    }

    fn clear(&mut self) {
        for stat in self.values.values_mut() {
            *stat = Stat::default();
        }
        self.rates_applied = false;
    }
}
