//! Common types used throughout cartpole

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reward value returned by an environment
pub type Reward = f64;

/// Training run identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Continuous cart-pole state.
///
/// `theta` is the pole angle in radians measured from vertical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CartPoleState {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}

impl CartPoleState {
    pub const fn new(x: f64, x_dot: f64, theta: f64, theta_dot: f64) -> Self {
        Self {
            x,
            x_dot,
            theta,
            theta_dot,
        }
    }

    /// Components in `(x, x_dot, theta, theta_dot)` order
    pub const fn to_array(self) -> [f64; 4] {
        [self.x, self.x_dot, self.theta, self.theta_dot]
    }

    pub const fn from_array(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

impl From<[f64; 4]> for CartPoleState {
    fn from(values: [f64; 4]) -> Self {
        Self::from_array(values)
    }
}

impl std::fmt::Display for CartPoleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:+.4} {:+.4} {:+.8} {:+.4}",
            self.x, self.x_dot, self.theta, self.theta_dot
        )
    }
}
