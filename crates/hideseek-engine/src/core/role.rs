use serde::{Deserialize, Serialize};

/// One of the two adversarial roles of the game.
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
pub enum Role {
    /// Chooses a cell to hide in. Rows of the payoff matrix.
    #[display("hider")]
    Hider,
    /// Guesses a cell. Columns of the payoff matrix.
    #[display("seeker")]
    Seeker,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Hider, Role::Seeker];

    /// Returns the other role.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Role::Hider => Role::Seeker,
            Role::Seeker => Role::Hider,
        }
    }

    /// Stable index for per-role arrays (`Hider = 0`, `Seeker = 1`).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Role::Hider => 0,
            Role::Seeker => 1,
        }
    }
}
