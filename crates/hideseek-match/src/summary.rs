use hideseek_engine::Role;
use serde::Serialize;

use crate::{Controller, MatchState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantSummary {
    pub name: String,
    pub role: Role,
    pub controller: Controller,
    pub score: f64,
    /// Score the equilibrium predicts over the rounds played so far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_score: Option<f64>,
}

/// Serializable overview of a match for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub participants: Vec<ParticipantSummary>,
    pub rounds: usize,
    pub caught: usize,
    pub escaped: usize,
    /// Equilibrium value in hider payoff, when solved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_value: Option<f64>,
}

impl MatchSummary {
    #[expect(clippy::cast_precision_loss)]
    pub(crate) fn new(state: &MatchState) -> Self {
        let stats = state.stats();
        let game_value = Role::ALL
            .iter()
            .find_map(|role| state.equilibrium(*role))
            .map(hideseek_solver::Equilibrium::value);
        let scores = state.scores();
        let participants = state
            .participants()
            .iter()
            .zip(scores)
            .filter_map(|(participant, score)| {
                let role = participant.role?;
                let expected_score = game_value.map(|value| {
                    let hider_expected = value * stats.rounds() as f64;
                    match role {
                        Role::Hider => hider_expected,
                        Role::Seeker => -hider_expected,
                    }
                });
                Some(ParticipantSummary {
                    name: participant.name.clone(),
                    role,
                    controller: participant.controller,
                    score,
                    expected_score,
                })
            })
            .collect();
        Self {
            participants,
            rounds: stats.rounds(),
            caught: stats.caught(),
            escaped: stats.escaped(),
            game_value,
        }
    }

    /// Returns the summary of the participant playing `role`.
    #[must_use]
    pub fn participant(&self, role: Role) -> Option<&ParticipantSummary> {
        self.participants.iter().find(|p| p.role == role)
    }
}

#[cfg(test)]
mod tests {
    use hideseek_engine::Position;

    use crate::{MatchConfig, RoundEngine, WorldSource};

    use super::*;

    #[test]
    fn test_summary_tallies() {
        let config = MatchConfig::human_vs_computer(Role::Hider).with_world(WorldSource::Custom {
            grid: vec!["MH".to_owned()],
        });
        let mut engine = RoundEngine::start(config).unwrap();
        // Seeker schedule over [5/7, 2/7] starts with 0, 1.
        engine.open_round(Some(Position::new(0, 0))).unwrap();
        engine.settle_round(None).unwrap();
        engine.open_round(Some(Position::new(0, 0))).unwrap();
        engine.settle_round(None).unwrap();

        let summary = engine.summary();
        assert_eq!(summary.rounds, 2);
        assert_eq!(summary.caught, 1);
        assert_eq!(summary.escaped, 1);

        let player = summary.participant(Role::Hider).unwrap();
        assert_eq!(player.name, "player");
        assert_eq!(player.controller, Controller::External);
        assert_eq!(player.score, 1.0);
        let computer = summary.participant(Role::Seeker).unwrap();
        assert_eq!(computer.score, -1.0);

        let value = summary.game_value.unwrap();
        assert!((value + 1.0 / 7.0).abs() < 1e-9);
        let expected = player.expected_score.unwrap();
        assert!((expected - 2.0 * value).abs() < 1e-9);
    }

    #[test]
    fn test_summary_json() {
        let engine = RoundEngine::start(MatchConfig::computer_vs_computer()).unwrap();
        let json = serde_json::to_value(engine.summary()).unwrap();
        assert_eq!(json["rounds"], 0);
        assert_eq!(json["participants"][0]["name"], "computer 1");
        assert_eq!(json["participants"][0]["role"], "hider");
        assert_eq!(json["participants"][1]["controller"], "automated");
    }
}
