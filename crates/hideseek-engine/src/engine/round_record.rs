use serde::{Deserialize, Serialize};

use crate::Position;

/// Result of a round from the seeker's point of view.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The seeker guessed the hider's cell.
    #[display("caught")]
    Caught,
    /// The seeker guessed another cell.
    #[display("escaped")]
    Escaped,
}

impl Outcome {
    #[must_use]
    pub fn from_positions(hider: Position, seeker: Position) -> Self {
        if hider == seeker {
            Outcome::Caught
        } else {
            Outcome::Escaped
        }
    }
}

/// Immutable record of one settled round.
///
/// `score` is the raw payoff to the hider; the seeker received `-score`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoundRecord {
    round: usize,
    hider_position: Position,
    seeker_position: Position,
    score: f64,
    outcome: Outcome,
}

impl RoundRecord {
    #[must_use]
    pub fn new(round: usize, hider_position: Position, seeker_position: Position, score: f64) -> Self {
        Self {
            round,
            hider_position,
            seeker_position,
            score,
            outcome: Outcome::from_positions(hider_position, seeker_position),
        }
    }

    /// 1-based round number.
    #[must_use]
    pub const fn round(&self) -> usize {
        self.round
    }

    #[must_use]
    pub const fn hider_position(&self) -> Position {
        self.hider_position
    }

    #[must_use]
    pub const fn seeker_position(&self) -> Position {
        self.seeker_position
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }
}
