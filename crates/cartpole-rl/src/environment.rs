//! The interface the learner uses to drive a plant

use cartpole_core::{CartPoleState, Reward};

/// A simulated system the learner can reset, step and query.
///
/// Implemented by [`crate::CartPole`]; tests substitute simpler dynamics.
pub trait Environment {
    /// Replace the current state
    fn reset(&mut self, state: CartPoleState);

    /// Current continuous state
    fn get_state(&self) -> CartPoleState;

    /// Advance the state by `dt` seconds under `force`.
    ///
    /// Must not be called once the current state is unsafe.
    fn simulate(&mut self, force: f64, dt: f64);

    /// Safety predicate evaluated on an arbitrary state
    fn is_state_safe(&self, state: &CartPoleState) -> bool;

    /// Safety predicate evaluated on the current state
    fn is_system_safe(&self) -> bool {
        self.is_state_safe(&self.get_state())
    }

    /// Reward for the current state
    fn reward(&self) -> Reward;
}
