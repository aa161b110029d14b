use serde::{Deserialize, Serialize};

use super::round_record::{Outcome, RoundRecord};

/// Running tallies over the settled rounds of a match.
///
/// Tracks:
///
/// - **Rounds**: number of settled rounds
/// - **Caught / escaped**: how each round ended
/// - **Hider total**: sum of the hider's raw payoffs (the seeker's total is its negation)
///
/// # Example
///
/// ```
/// use hideseek_engine::{MatchStats, Position, RoundRecord};
///
/// let mut stats = MatchStats::new();
/// stats.record(&RoundRecord::new(1, Position::new(0, 0), Position::new(0, 0), -1.0));
/// stats.record(&RoundRecord::new(2, Position::new(0, 0), Position::new(0, 1), 2.0));
///
/// assert_eq!(stats.rounds(), 2);
/// assert_eq!(stats.caught(), 1);
/// assert_eq!(stats.hider_total(), 1.0);
/// assert_eq!(stats.catch_rate(), Some(0.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MatchStats {
    rounds: usize,
    caught: usize,
    escaped: usize,
    hider_total: f64,
}

impl MatchStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rounds: 0,
            caught: 0,
            escaped: 0,
            hider_total: 0.0,
        }
    }

    /// Builds the tallies of a whole history.
    pub fn from_history<'a, I>(history: I) -> Self
    where
        I: IntoIterator<Item = &'a RoundRecord>,
    {
        let mut stats = Self::new();
        for record in history {
            stats.record(record);
        }
        stats
    }

    pub fn record(&mut self, record: &RoundRecord) {
        self.rounds += 1;
        match record.outcome() {
            Outcome::Caught => self.caught += 1,
            Outcome::Escaped => self.escaped += 1,
        }
        self.hider_total += record.score();
    }

    #[must_use]
    pub const fn rounds(&self) -> usize {
        self.rounds
    }

    #[must_use]
    pub const fn caught(&self) -> usize {
        self.caught
    }

    #[must_use]
    pub const fn escaped(&self) -> usize {
        self.escaped
    }

    #[must_use]
    pub const fn hider_total(&self) -> f64 {
        self.hider_total
    }

    /// Average hider payoff per round, comparable to the game value.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn hider_mean(&self) -> Option<f64> {
        (self.rounds > 0).then(|| self.hider_total / self.rounds as f64)
    }

    /// Fraction of rounds in which the seeker found the hider.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn catch_rate(&self) -> Option<f64> {
        (self.rounds > 0).then(|| self.caught as f64 / self.rounds as f64)
    }
}
