pub use self::{cell::*, grid::*, payoff::*, role::*, strategy::*};

pub(crate) mod cell;
pub(crate) mod grid;
pub(crate) mod payoff;
pub(crate) mod role;
pub(crate) mod strategy;
