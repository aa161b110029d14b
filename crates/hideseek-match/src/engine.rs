use hideseek_engine::{
    Grid, MatchStats, MoveCounters, PayoffMatrix, Position, Role, RoundRecord, Strategy, WorldSeed,
    next_move,
};
use hideseek_solver::{Equilibrium, SolverError};
use serde::Serialize;

use crate::{
    Controller, InvalidMoveError, MatchConfig, MatchError, MatchSummary, ParticipantConfig,
    SequenceError,
};

/// Where the current round stands.
///
/// The committed hider position is available to the host but left out of the
/// serialized form, so a snapshot can be shown to the seeker before it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RoundStatus {
    Idle,
    AwaitingSettlement {
        round: usize,
        #[serde(skip)]
        hider_position: Position,
        /// Already chosen when the seeker is automated.
        seeker_position: Option<Position>,
    },
}

#[derive(Debug, Clone, Copy)]
struct Move {
    position: Position,
    index: usize,
}

#[derive(Debug, Clone, Copy)]
struct PendingRound {
    round: usize,
    hider: Move,
    seeker: Option<Move>,
}

impl PendingRound {
    fn status(&self) -> RoundStatus {
        RoundStatus::AwaitingSettlement {
            round: self.round,
            hider_position: self.hider.position,
            seeker_position: self.seeker.map(|m| m.position),
        }
    }
}

/// Complete state of one match.
///
/// Per-role arrays are indexed by [`Role::index`], per-participant arrays by
/// the participant's position in [`MatchConfig::participants`].
#[derive(Debug, Clone)]
pub struct MatchState {
    participants: [ParticipantConfig; 2],
    roles: [usize; 2],
    grid: Grid,
    world_seed: Option<WorldSeed>,
    matrix: PayoffMatrix,
    equilibria: [Option<Equilibrium>; 2],
    counters: [MoveCounters; 2],
    scores: [f64; 2],
    round: usize,
    history: Vec<RoundRecord>,
    stats: MatchStats,
    pending: Option<PendingRound>,
}

impl MatchState {
    fn new(config: MatchConfig) -> Result<Self, MatchError> {
        let roles = config.role_assignment()?;
        let world = config.world.build()?;
        let matrix = PayoffMatrix::build_with_rule(&world.grid, config.payoff_rule);
        let equilibria = solve_equilibria(&config, roles, &matrix)?;
        let n = world.grid.len();

        log::info!(
            "match started on a {}x{} grid: {} hides, {} seeks",
            world.grid.rows(),
            world.grid.cols(),
            config.participants[roles[Role::Hider.index()]].name,
            config.participants[roles[Role::Seeker.index()]].name,
        );

        Ok(Self {
            participants: config.participants,
            roles,
            grid: world.grid,
            world_seed: world.seed,
            matrix,
            equilibria,
            counters: [MoveCounters::new(n), MoveCounters::new(n)],
            scores: [0.0; 2],
            round: 0,
            history: vec![],
            stats: MatchStats::new(),
            pending: None,
        })
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Seed of a randomly generated world.
    #[must_use]
    pub fn world_seed(&self) -> Option<WorldSeed> {
        self.world_seed
    }

    #[must_use]
    pub fn payoff_matrix(&self) -> &PayoffMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn participants(&self) -> &[ParticipantConfig; 2] {
        &self.participants
    }

    /// Returns the participant playing `role`.
    #[must_use]
    pub fn participant(&self, role: Role) -> &ParticipantConfig {
        &self.participants[self.roles[role.index()]]
    }

    /// Solved equilibrium of `role`.
    ///
    /// Present for automated roles, and for both roles when the match was
    /// started with the duality cross-check.
    #[must_use]
    pub fn equilibrium(&self, role: Role) -> Option<&Equilibrium> {
        self.equilibria[role.index()].as_ref()
    }

    #[must_use]
    pub fn strategy(&self, role: Role) -> Option<&Strategy> {
        self.equilibrium(role).map(Equilibrium::strategy)
    }

    /// Moves made so far by `role`, per position.
    #[must_use]
    pub fn counters(&self, role: Role) -> &MoveCounters {
        &self.counters[role.index()]
    }

    /// Cumulative score per participant.
    #[must_use]
    pub fn scores(&self) -> [f64; 2] {
        self.scores
    }

    /// Number of the most recently opened round, 0 before the first one.
    #[must_use]
    pub fn round(&self) -> usize {
        self.round
    }

    #[must_use]
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    #[must_use]
    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.pending
            .as_ref()
            .map_or(RoundStatus::Idle, PendingRound::status)
    }

    fn controller(&self, role: Role) -> Controller {
        self.participant(role).controller
    }

    fn validate(&self, position: Position) -> Result<Move, InvalidMoveError> {
        let index = self.grid.index_of(position).ok_or(InvalidMoveError {
            position,
            rows: self.grid.rows(),
            cols: self.grid.cols(),
        })?;
        Ok(Move { position, index })
    }

    fn schedule(&self, role: Role, round: usize) -> (Move, MoveCounters) {
        let strategy = self
            .strategy(role)
            .expect("automated roles are solved at match start");
        let (index, counters) = next_move(strategy, round, &self.counters[role.index()]);
        let position = self
            .grid
            .position_of(index)
            .expect("scheduled index should be inside the grid");
        log::debug!("round {round}: automated {role} plays {position}");
        (Move { position, index }, counters)
    }
}

fn solve_equilibria(
    config: &MatchConfig,
    roles: [usize; 2],
    matrix: &PayoffMatrix,
) -> Result<[Option<Equilibrium>; 2], SolverError> {
    if config.cross_check {
        let pair = hideseek_solver::solve_both(matrix)?;
        return Ok([Some(pair.hider), Some(pair.seeker)]);
    }
    let mut equilibria = [None, None];
    for role in Role::ALL {
        if config.participants[roles[role.index()]].controller.is_automated() {
            let equilibrium = hideseek_solver::solve(matrix, role)?;
            log::info!("{role} value {:.6}", equilibrium.value());
            equilibria[role.index()] = Some(equilibrium);
        }
    }
    Ok(equilibria)
}

/// Orchestrator of one match at a time.
///
/// Every operation validates its input completely before changing anything,
/// so an error leaves the match exactly as it was.
#[derive(Debug, Clone)]
pub struct RoundEngine {
    state: MatchState,
}

impl RoundEngine {
    /// Starts a match: builds the grid and payoff matrix and solves the strategies.
    pub fn start(config: MatchConfig) -> Result<Self, MatchError> {
        Ok(Self {
            state: MatchState::new(config)?,
        })
    }

    /// Replaces the current match with a new one.
    ///
    /// On error the current match is kept.
    pub fn restart(&mut self, config: MatchConfig) -> Result<(), MatchError> {
        self.state = MatchState::new(config)?;
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.state.grid()
    }

    #[must_use]
    pub fn payoff_matrix(&self) -> &PayoffMatrix {
        self.state.payoff_matrix()
    }

    #[must_use]
    pub fn equilibrium(&self, role: Role) -> Option<&Equilibrium> {
        self.state.equilibrium(role)
    }

    #[must_use]
    pub fn strategy(&self, role: Role) -> Option<&Strategy> {
        self.state.strategy(role)
    }

    #[must_use]
    pub fn participant(&self, role: Role) -> &ParticipantConfig {
        self.state.participant(role)
    }

    #[must_use]
    pub fn scores(&self) -> [f64; 2] {
        self.state.scores()
    }

    #[must_use]
    pub fn round(&self) -> usize {
        self.state.round()
    }

    #[must_use]
    pub fn history(&self) -> &[RoundRecord] {
        self.state.history()
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.state.status()
    }

    #[must_use]
    pub fn summary(&self) -> MatchSummary {
        MatchSummary::new(&self.state)
    }

    /// Opens the next round and returns its number.
    ///
    /// The hider commits first: `hider_position` is required when the hider is
    /// external and rejected otherwise. Automated participants are scheduled
    /// immediately.
    pub fn open_round(&mut self, hider_position: Option<Position>) -> Result<usize, MatchError> {
        if let Some(pending) = &self.state.pending {
            return Err(SequenceError::RoundAlreadyOpen {
                round: pending.round,
            }
            .into());
        }
        let external = match (self.state.controller(Role::Hider), hider_position) {
            (Controller::External, Some(position)) => Some(self.state.validate(position)?),
            (Controller::External, None) => {
                return Err(SequenceError::MissingPosition { role: Role::Hider }.into());
            }
            (Controller::Automated, Some(_)) => {
                return Err(SequenceError::UnexpectedPosition { role: Role::Hider }.into());
            }
            (Controller::Automated, None) => None,
        };

        let round = self.state.round + 1;
        let hider = match external {
            Some(hider) => {
                self.state.counters[Role::Hider.index()].record(hider.index);
                hider
            }
            None => {
                let (hider, counters) = self.state.schedule(Role::Hider, round);
                self.state.counters[Role::Hider.index()] = counters;
                hider
            }
        };
        let seeker = self.state.controller(Role::Seeker).is_automated().then(|| {
            let (seeker, counters) = self.state.schedule(Role::Seeker, round);
            self.state.counters[Role::Seeker.index()] = counters;
            seeker
        });

        self.state.round = round;
        self.state.pending = Some(PendingRound {
            round,
            hider,
            seeker,
        });
        log::debug!("round {round} opened");
        Ok(round)
    }

    /// Settles the open round and returns its record.
    ///
    /// `seeker_position` is required when the seeker is external and rejected
    /// when its position is already known.
    pub fn settle_round(&mut self, seeker_position: Option<Position>) -> Result<RoundRecord, MatchError> {
        let Some(pending) = self.state.pending else {
            return Err(SequenceError::NoOpenRound.into());
        };
        let (seeker, external) = match (pending.seeker, seeker_position) {
            (None, Some(position)) => (self.state.validate(position)?, true),
            (None, None) => {
                return Err(SequenceError::MissingPosition { role: Role::Seeker }.into());
            }
            (Some(_), Some(_)) => {
                return Err(SequenceError::PositionAlreadySupplied { role: Role::Seeker }.into());
            }
            (Some(seeker), None) => (seeker, false),
        };

        let state = &mut self.state;
        if external {
            state.counters[Role::Seeker.index()].record(seeker.index);
        }
        let score = state.matrix.hider_payoff(pending.hider.index, seeker.index);
        let record = RoundRecord::new(pending.round, pending.hider.position, seeker.position, score);
        state.scores[state.roles[Role::Hider.index()]] += score;
        state.scores[state.roles[Role::Seeker.index()]] -= score;
        state.stats.record(&record);
        state.history.push(record.clone());
        state.pending = None;

        log::debug!(
            "round {} settled: hider {} seeker {} -> {} ({score:+})",
            record.round(),
            record.hider_position(),
            record.seeker_position(),
            record.outcome(),
        );
        Ok(record)
    }
}
