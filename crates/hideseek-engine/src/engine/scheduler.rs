//! Deterministic realization of mixed strategies.
//!
//! Instead of sampling a position from the target distribution every round,
//! the scheduler plays the position that is furthest behind its expected
//! count. For round `t` (1-based) and probabilities `p`:
//!
//! ```text
//! deficit_i = p_i * t - counters_i
//! choice    = argmax_i deficit_i   (ties -> smallest i)
//! ```
//!
//! The empirical frequencies track the target closely from the first rounds
//! on, and every move can be reproduced from the strategy and the counters
//! alone. A position with probability 0 is never chosen, since some other
//! position always has a positive deficit.

use serde::{Deserialize, Serialize};

use crate::Strategy;

/// Number of times each position has been played in the current match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MoveCounters(Vec<usize>);

impl MoveCounters {
    /// Creates zeroed counters for `len` positions.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self(vec![0; len])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> usize {
        self.0[index]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Total number of recorded moves.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Records one move at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn record(&mut self, index: usize) {
        self.0[index] += 1;
    }
}

/// Selects the position to play in `round` and returns it with the updated counters.
///
/// `counters` holds the moves made before `round`; they are not modified.
///
/// # Panics
///
/// Panics if `round` is 0 or if `strategy` and `counters` cover a different
/// number of positions.
///
/// # Example
///
/// ```
/// use hideseek_engine::{MoveCounters, Strategy, next_move};
///
/// let strategy = Strategy::new(vec![4.0 / 7.0, 3.0 / 7.0]).unwrap();
/// let mut counters = MoveCounters::new(2);
/// let mut sequence = vec![];
/// for round in 1..=7 {
///     let (position, updated) = next_move(&strategy, round, &counters);
///     sequence.push(position);
///     counters = updated;
/// }
/// assert_eq!(sequence, [0, 1, 0, 1, 0, 1, 0]);
/// assert_eq!(counters.as_slice(), &[4, 3]);
/// ```
#[must_use]
pub fn next_move(strategy: &Strategy, round: usize, counters: &MoveCounters) -> (usize, MoveCounters) {
    let position = select_position(strategy, round, counters);
    let mut updated = counters.clone();
    updated.record(position);
    (position, updated)
}

#[expect(clippy::cast_precision_loss)]
fn select_position(strategy: &Strategy, round: usize, counters: &MoveCounters) -> usize {
    assert!(round > 0, "rounds are 1-based");
    assert_eq!(
        strategy.len(),
        counters.len(),
        "strategy and counters must cover the same positions"
    );
    let t = round as f64;
    let mut best = 0;
    let mut best_deficit = f64::NEG_INFINITY;
    for (i, (p, count)) in strategy
        .probabilities()
        .iter()
        .zip(counters.as_slice())
        .enumerate()
    {
        let deficit = p * t - *count as f64;
        if deficit > best_deficit {
            best = i;
            best_deficit = deficit;
        }
    }
    best
}

/// Per-role stateful scheduler: a strategy plus the counters of the current match.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveScheduler {
    strategy: Strategy,
    counters: MoveCounters,
}

impl MoveScheduler {
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        let counters = MoveCounters::new(strategy.len());
        Self { strategy, counters }
    }

    /// Chooses the position for `round` and records it.
    ///
    /// # Panics
    ///
    /// Panics if `round` is 0.
    pub fn schedule(&mut self, round: usize) -> usize {
        let position = select_position(&self.strategy, round, &self.counters);
        self.counters.record(position);
        log::debug!("round {round}: scheduled position {position}");
        position
    }

    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    #[must_use]
    pub fn counters(&self) -> &MoveCounters {
        &self.counters
    }

    /// Clears the counters for a new match.
    pub fn reset(&mut self) {
        self.counters = MoveCounters::new(self.strategy.len());
    }
}

#[cfg(test)]
mod tests {
    use proptest::{prelude::*, strategy::Strategy as _};

    use super::*;
    use crate::Strategy;

    fn arb_strategy(max_len: usize) -> impl proptest::strategy::Strategy<Value = Strategy> {
        proptest::collection::vec(prop_oneof![Just(0.0), 0.001f64..1.0], 1..=max_len)
            .prop_filter("needs positive mass", |w| w.iter().sum::<f64>() > 0.0)
            .prop_map(|weights| {
                let total = weights.iter().sum::<f64>();
                Strategy::new(weights.into_iter().map(|w| w / total).collect()).unwrap()
            })
    }

    #[test]
    fn test_two_position_sequence() {
        let strategy = Strategy::new(vec![4.0 / 7.0, 3.0 / 7.0]).unwrap();
        let mut scheduler = MoveScheduler::new(strategy);
        let sequence: Vec<_> = (1..=7).map(|round| scheduler.schedule(round)).collect();
        assert_eq!(sequence, vec![0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(scheduler.counters().as_slice(), &[4, 3]);
    }

    #[test]
    fn test_ties_break_to_smallest_index() {
        let strategy = Strategy::uniform(3);
        let counters = MoveCounters::new(3);
        let (position, updated) = next_move(&strategy, 1, &counters);
        assert_eq!(position, 0);
        assert_eq!(updated.as_slice(), &[1, 0, 0]);
        // Input counters are untouched.
        assert_eq!(counters.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn test_uniform_cycles_through_positions() {
        let mut scheduler = MoveScheduler::new(Strategy::uniform(4));
        let sequence: Vec<_> = (1..=8).map(|round| scheduler.schedule(round)).collect();
        assert_eq!(sequence, vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn test_zero_probability_never_chosen() {
        let strategy = Strategy::new(vec![0.0, 0.5, 0.0, 0.5]).unwrap();
        let mut scheduler = MoveScheduler::new(strategy);
        for round in 1..=100 {
            let position = scheduler.schedule(round);
            assert!(
                position == 1 || position == 3,
                "round {round}: chose zero-probability position {position}"
            );
        }
        assert_eq!(scheduler.counters().as_slice(), &[0, 50, 0, 50]);
    }

    #[test]
    fn test_pure_strategy() {
        let mut scheduler = MoveScheduler::new(Strategy::pure(5, 3));
        for round in 1..=10 {
            assert_eq!(scheduler.schedule(round), 3);
        }
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut scheduler = MoveScheduler::new(Strategy::uniform(2));
        scheduler.schedule(1);
        scheduler.schedule(2);
        assert_eq!(scheduler.counters().total(), 2);
        scheduler.reset();
        assert_eq!(scheduler.counters().total(), 0);
        assert_eq!(scheduler.schedule(1), 0);
    }

    #[test]
    #[should_panic(expected = "rounds are 1-based")]
    fn test_round_zero_panics() {
        let _ = next_move(&Strategy::uniform(2), 0, &MoveCounters::new(2));
    }

    proptest! {
        #[test]
        fn prop_counters_never_run_a_full_unit_ahead(
            strategy in arb_strategy(12),
            rounds in 1usize..200,
        ) {
            let mut counters = MoveCounters::new(strategy.len());
            for t in 1..=rounds {
                let (position, updated) = next_move(&strategy, t, &counters);
                prop_assert_eq!(updated.get(position), counters.get(position) + 1);
                prop_assert_eq!(updated.total(), t);
                counters = updated;
                for (i, p) in strategy.probabilities().iter().enumerate() {
                    #[expect(clippy::cast_precision_loss)]
                    let drift = counters.get(i) as f64 - p * t as f64;
                    prop_assert!(drift < 1.0, "position {i} ahead by {drift} at round {t}");
                }
            }
        }

        #[test]
        fn prop_small_strategies_stay_within_one_unit(
            strategy in arb_strategy(3),
            rounds in 1usize..300,
        ) {
            let mut scheduler = MoveScheduler::new(strategy.clone());
            for t in 1..=rounds {
                scheduler.schedule(t);
                for (i, p) in strategy.probabilities().iter().enumerate() {
                    #[expect(clippy::cast_precision_loss)]
                    let drift = scheduler.counters().get(i) as f64 - p * t as f64;
                    prop_assert!(drift.abs() < 1.0, "position {i} off by {drift} at round {t}");
                }
            }
        }

        #[test]
        fn prop_zero_probability_positions_unplayed(
            strategy in arb_strategy(8),
            rounds in 1usize..100,
        ) {
            let mut scheduler = MoveScheduler::new(strategy.clone());
            for t in 1..=rounds {
                let position = scheduler.schedule(t);
                prop_assert!(strategy.probability(position) > 0.0);
            }
        }
    }
}
