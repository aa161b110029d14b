use std::path::PathBuf;

use hideseek_engine::{PayoffRule, Role, WorldSeed};
use hideseek_match::{MatchConfig, WorldSource};

use crate::util;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum RuleArg {
    #[default]
    Canonical,
    Proximity,
}

impl From<RuleArg> for PayoffRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::Canonical => PayoffRule::Canonical,
            RuleArg::Proximity => PayoffRule::ProximityDiscount,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum RoleArg {
    #[default]
    Hider,
    Seeker,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Hider => Role::Hider,
            RoleArg::Seeker => Role::Seeker,
        }
    }
}

/// World selection flags, overriding the world of a configuration file.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct WorldArg {
    /// Use the classic 4x4 world
    #[arg(long, conflicts_with_all = ["rows", "cols", "seed", "grid"])]
    classic: bool,
    /// Number of rows of a random world
    #[arg(long, requires = "cols")]
    rows: Option<usize>,
    /// Number of columns of a random world
    #[arg(long, requires = "rows")]
    cols: Option<usize>,
    /// Seed of a random world (32 hex characters)
    #[arg(long, requires = "rows", value_parser = WorldSeed::from_hex)]
    seed: Option<WorldSeed>,
    /// Explicit world row made of S, M and H cells (repeat for each row)
    #[arg(long, conflicts_with_all = ["rows", "cols", "seed"])]
    grid: Vec<String>,
}

impl WorldArg {
    pub(crate) fn source(&self) -> Option<WorldSource> {
        if self.classic {
            return Some(WorldSource::Classic);
        }
        if !self.grid.is_empty() {
            return Some(WorldSource::Custom {
                grid: self.grid.clone(),
            });
        }
        match (self.rows, self.cols) {
            (Some(rows), Some(cols)) => Some(WorldSource::Random {
                rows,
                cols,
                seed: self.seed,
            }),
            _ => None,
        }
    }
}

/// Match configuration: an optional JSON file plus command-line overrides.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct MatchArg {
    /// Match configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Payoff rule (canonical or proximity)
    #[arg(long)]
    rule: Option<RuleArg>,
    /// Skip the duality cross-check between the hider and seeker solutions
    #[arg(long)]
    no_cross_check: bool,
    #[clap(flatten)]
    world: WorldArg,
}

impl MatchArg {
    /// Loads the configuration file, or `default` without one, and applies the overrides.
    pub(crate) fn load(&self, default: MatchConfig) -> anyhow::Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => default,
        };
        if let Some(world) = self.world.source() {
            config.world = world;
        }
        if let Some(rule) = self.rule {
            config.payoff_rule = rule.into();
        }
        if self.no_cross_check {
            config.cross_check = false;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[clap(flatten)]
        game: MatchArg,
    }

    fn load(args: &[&str]) -> MatchConfig {
        let args = TestArgs::try_parse_from(std::iter::once("test").chain(args.iter().copied())).unwrap();
        args.game.load(MatchConfig::default()).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        assert_eq!(load(&[]), MatchConfig::default());
    }

    #[test]
    fn test_world_overrides() {
        assert_eq!(load(&["--classic"]).world, WorldSource::Classic);
        assert_eq!(
            load(&["--grid", "MH", "--grid", "SS"]).world,
            WorldSource::Custom {
                grid: vec!["MH".to_owned(), "SS".to_owned()]
            }
        );
        let seed = "000102030405060708090a0b0c0d0e0f";
        assert_eq!(
            load(&["--rows", "2", "--cols", "3", "--seed", seed]).world,
            WorldSource::Random {
                rows: 2,
                cols: 3,
                seed: Some(WorldSeed::from_hex(seed).unwrap())
            }
        );
    }

    #[test]
    fn test_rule_and_cross_check_overrides() {
        let config = load(&["--rule", "proximity", "--no-cross-check"]);
        assert_eq!(config.payoff_rule, PayoffRule::ProximityDiscount);
        assert!(!config.cross_check);
    }

    #[test]
    fn test_invalid_flags() {
        for args in [
            &["test", "--rows", "2"][..],
            &["test", "--classic", "--grid", "MH"],
            &["test", "--seed", "00"],
            &["test", "--rule", "fancy"],
        ] {
            assert!(TestArgs::try_parse_from(args).is_err(), "{args:?} should be rejected");
        }
    }
}
