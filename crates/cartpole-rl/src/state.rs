//! Discrete state keys and action identifiers

use serde::{Deserialize, Serialize};

use cartpole_core::STATE_DIMENSIONS;

/// Index into the learner's ordered force list
pub type ActionIndex = usize;

/// Key of one Q-table row.
///
/// `Grid` holds the index of the nearest grid point in every dimension.
/// `Terminal` absorbs every unsafe state regardless of its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKey {
    Grid([usize; STATE_DIMENSIONS]),
    Terminal,
}

impl StateKey {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StateKey::Terminal)
    }

    /// Per-dimension grid indexes, `None` for the terminal key
    pub fn indices(&self) -> Option<[usize; STATE_DIMENSIONS]> {
        match self {
            StateKey::Grid(indices) => Some(*indices),
            StateKey::Terminal => None,
        }
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateKey::Grid([a, b, c, d]) => write!(f, "({a}, {b}, {c}, {d})"),
            StateKey::Terminal => write!(f, "terminal"),
        }
    }
}
