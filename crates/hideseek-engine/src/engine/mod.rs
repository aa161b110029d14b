//! Match-level machinery built on top of [`core`](crate::core).
//!
//! - [`WorldGenerator`] - Seeded random grids ([`WorldSeed`])
//! - [`MoveScheduler`] - Deterministic realization of a mixed strategy ([`next_move`])
//! - [`RoundRecord`] - Immutable record of a settled round
//! - [`MatchStats`] - Running tallies over the settled rounds
//!
//! # Example
//!
//! ```
//! use hideseek_engine::{Grid, MoveScheduler, PayoffMatrix, RoundRecord, Strategy};
//!
//! let grid = Grid::parse_rows(&["MH"]).unwrap();
//! let matrix = PayoffMatrix::build(&grid);
//! let mut hider = MoveScheduler::new(Strategy::new(vec![4.0 / 7.0, 3.0 / 7.0]).unwrap());
//!
//! let hider_index = hider.schedule(1);
//! let seeker_index = 1;
//! let record = RoundRecord::new(
//!     1,
//!     grid.position_of(hider_index).unwrap(),
//!     grid.position_of(seeker_index).unwrap(),
//!     matrix.hider_payoff(hider_index, seeker_index),
//! );
//! assert!(record.outcome().is_escaped());
//! assert_eq!(record.score(), 2.0);
//! ```

pub use self::{match_stats::*, round_record::*, scheduler::*, world_generator::*};

mod match_stats;
mod round_record;
mod scheduler;
mod world_generator;
