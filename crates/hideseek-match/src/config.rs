use hideseek_engine::{Grid, PayoffRule, Role, WorldGenerator, WorldSeed};
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// Largest supported number of grid cells.
///
/// The solver works on dense `(N + 1)`-square tableaus, so the matrix size is
/// the practical limit.
pub const MAX_CELLS: usize = 144;

/// Where the grid of a match comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum WorldSource {
    /// The fixed 4×4 layout of [`Grid::classic`].
    #[default]
    Classic,
    /// A uniformly random grid, reproducible when `seed` is given.
    Random {
        rows: usize,
        cols: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<WorldSeed>,
    },
    /// An explicit grid in text form, one `S`/`M`/`H` string per row.
    Custom { grid: Vec<String> },
}

/// Grid built from a [`WorldSource`], with the seed actually used for random worlds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    pub grid: Grid,
    pub seed: Option<WorldSeed>,
}

impl WorldSource {
    /// Builds the grid.
    ///
    /// Random worlds without a seed draw a fresh one, which is returned so the
    /// grid can be regenerated.
    pub fn build(&self) -> Result<World, ConfigurationError> {
        match self {
            WorldSource::Classic => Ok(World {
                grid: Grid::classic(),
                seed: None,
            }),
            WorldSource::Random { rows, cols, seed } => {
                check_dimensions(*rows, *cols)?;
                let seed = seed.unwrap_or_else(|| rand::rng().random());
                let grid = WorldGenerator::with_seed(seed)
                    .generate(*rows, *cols)
                    .map_err(|source| ConfigurationError::InvalidGrid { source })?;
                Ok(World {
                    grid,
                    seed: Some(seed),
                })
            }
            WorldSource::Custom { grid } => {
                let grid = Grid::parse_rows(grid.as_slice())
                    .map_err(|source| ConfigurationError::InvalidGrid { source })?;
                check_dimensions(grid.rows(), grid.cols())?;
                Ok(World { grid, seed: None })
            }
        }
    }
}

fn check_dimensions(rows: usize, cols: usize) -> Result<(), ConfigurationError> {
    let cells = rows.checked_mul(cols).unwrap_or(usize::MAX);
    if cells == 0 || cells > MAX_CELLS {
        return Err(ConfigurationError::InvalidDimensions {
            rows,
            cols,
            max_cells: MAX_CELLS,
        });
    }
    Ok(())
}

/// Who chooses a participant's positions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// Positions are supplied by the host, round by round.
    #[display("external")]
    External,
    /// Positions come from the solved strategy through the move scheduler.
    #[default]
    #[display("automated")]
    Automated,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParticipantConfig {
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub controller: Controller,
}

impl ParticipantConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, role: Role, controller: Controller) -> Self {
        Self {
            name: name.into(),
            role: Some(role),
            controller,
        }
    }
}

/// Configuration of a match.
///
/// Every field has a default, so `{}` is a valid JSON configuration: the
/// classic world, the canonical payoff rule, an external hider against an
/// automated seeker, and the duality cross-check enabled.
///
/// # Example
///
/// ```
/// use hideseek_engine::Role;
/// use hideseek_match::{Controller, MatchConfig, WorldSource};
///
/// let json = r#"{
///     "world": { "kind": "random", "rows": 3, "cols": 3 },
///     "participants": [
///         { "name": "alice", "role": "seeker", "controller": "external" },
///         { "name": "bot", "role": "hider" }
///     ]
/// }"#;
/// let config: MatchConfig = serde_json::from_str(json).unwrap();
///
/// assert!(matches!(config.world, WorldSource::Random { rows: 3, cols: 3, seed: None }));
/// assert_eq!(config.participants[1].controller, Controller::Automated);
/// assert_eq!(config.role_assignment().unwrap(), [1, 0]);
/// assert!(config.cross_check);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchConfig {
    pub world: WorldSource,
    pub payoff_rule: PayoffRule,
    pub participants: [ParticipantConfig; 2],
    /// Solve both roles and compare their values when the match starts.
    pub cross_check: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::human_vs_computer(Role::Hider)
    }
}

impl MatchConfig {
    /// An external "player" in `human_role` against an automated "computer".
    #[must_use]
    pub fn human_vs_computer(human_role: Role) -> Self {
        Self {
            world: WorldSource::Classic,
            payoff_rule: PayoffRule::Canonical,
            participants: [
                ParticipantConfig::new("player", human_role, Controller::External),
                ParticipantConfig::new("computer", human_role.opponent(), Controller::Automated),
            ],
            cross_check: true,
        }
    }

    /// Two automated participants.
    #[must_use]
    pub fn computer_vs_computer() -> Self {
        Self {
            participants: [
                ParticipantConfig::new("computer 1", Role::Hider, Controller::Automated),
                ParticipantConfig::new("computer 2", Role::Seeker, Controller::Automated),
            ],
            ..Self::human_vs_computer(Role::Hider)
        }
    }

    #[must_use]
    pub fn with_world(mut self, world: WorldSource) -> Self {
        self.world = world;
        self
    }

    #[must_use]
    pub fn with_payoff_rule(mut self, payoff_rule: PayoffRule) -> Self {
        self.payoff_rule = payoff_rule;
        self
    }

    /// Returns the participant index playing each role, indexed by [`Role::index`].
    pub fn role_assignment(&self) -> Result<[usize; 2], ConfigurationError> {
        let [first, second] = &self.participants;
        let first_role = role_of(first)?;
        let second_role = role_of(second)?;
        if first_role == second_role {
            return Err(ConfigurationError::DuplicateRole { role: first_role });
        }
        Ok(match first_role {
            Role::Hider => [0, 1],
            Role::Seeker => [1, 0],
        })
    }
}

fn role_of(participant: &ParticipantConfig) -> Result<Role, ConfigurationError> {
    participant.role.ok_or_else(|| ConfigurationError::MissingRole {
        name: participant.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use hideseek_engine::CellType;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = MatchConfig::default();
        assert_eq!(config.world, WorldSource::Classic);
        assert_eq!(config.payoff_rule, PayoffRule::Canonical);
        assert_eq!(config.participants[0].controller, Controller::External);
        assert_eq!(config.participants[0].role, Some(Role::Hider));
        assert_eq!(config.participants[1].controller, Controller::Automated);
        assert!(config.cross_check);

        let parsed: MatchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_role_assignment() {
        let config = MatchConfig::human_vs_computer(Role::Seeker);
        assert_eq!(config.role_assignment().unwrap(), [1, 0]);
        assert_eq!(MatchConfig::computer_vs_computer().role_assignment().unwrap(), [0, 1]);
    }

    #[test]
    fn test_missing_role() {
        let mut config = MatchConfig::default();
        config.participants[1].role = None;
        assert_eq!(
            config.role_assignment(),
            Err(ConfigurationError::MissingRole {
                name: "computer".to_owned()
            })
        );
    }

    #[test]
    fn test_duplicate_role() {
        let mut config = MatchConfig::default();
        config.participants[1].role = Some(Role::Hider);
        assert_eq!(
            config.role_assignment(),
            Err(ConfigurationError::DuplicateRole { role: Role::Hider })
        );
    }

    #[test]
    fn test_random_world_dimensions() {
        for (rows, cols) in [(0, 4), (4, 0), (13, 12), (usize::MAX, 2)] {
            let source = WorldSource::Random {
                rows,
                cols,
                seed: None,
            };
            assert_eq!(
                source.build(),
                Err(ConfigurationError::InvalidDimensions {
                    rows,
                    cols,
                    max_cells: MAX_CELLS
                }),
                "{rows}x{cols} should be rejected"
            );
        }
        let world = WorldSource::Random {
            rows: 12,
            cols: 12,
            seed: None,
        }
        .build()
        .unwrap();
        assert_eq!(world.grid.len(), MAX_CELLS);
        assert!(world.seed.is_some(), "a fresh seed should be reported");
    }

    #[test]
    fn test_random_world_is_reproducible() {
        let seed = WorldSeed::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        let source = WorldSource::Random {
            rows: 3,
            cols: 4,
            seed: Some(seed),
        };
        let a = source.build().unwrap();
        let b = source.build().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, Some(seed));
    }

    #[test]
    fn test_custom_world() {
        let world = WorldSource::Custom {
            grid: vec!["MH".to_owned()],
        }
        .build()
        .unwrap();
        assert_eq!(world.grid.cells(), &[CellType::Medium, CellType::Hard]);
        assert_eq!(world.seed, None);

        let err = WorldSource::Custom {
            grid: vec!["MH".to_owned(), "S".to_owned()],
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidGrid { .. }), "unexpected error: {err}");

        let wide = WorldSource::Custom {
            grid: vec!["S".repeat(MAX_CELLS + 1)],
        };
        assert!(matches!(
            wide.build(),
            Err(ConfigurationError::InvalidDimensions { rows: 1, .. })
        ));
    }

    #[test]
    fn test_world_source_serde() {
        let source: WorldSource =
            serde_json::from_str(r#"{"kind":"custom","grid":["SM","HS"]}"#).unwrap();
        assert_eq!(
            source,
            WorldSource::Custom {
                grid: vec!["SM".to_owned(), "HS".to_owned()]
            }
        );
        assert_eq!(
            serde_json::to_string(&WorldSource::Classic).unwrap(),
            r#"{"kind":"classic"}"#
        );
    }
}
