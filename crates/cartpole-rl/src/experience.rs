//! Transition records collected during one episode

use serde::{Deserialize, Serialize};

use cartpole_core::Reward;

use crate::state::{ActionIndex, StateKey};

/// A single transition `(s, a, s', r)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: StateKey,
    pub action: ActionIndex,
    pub next_state: StateKey,
    pub reward: Reward,
}

impl Transition {
    pub fn new(state: StateKey, action: ActionIndex, next_state: StateKey, reward: Reward) -> Self {
        Self {
            state,
            action,
            next_state,
            reward,
        }
    }
}

/// Ordered transitions of one episode, replayed once the episode ends
#[derive(Debug, Clone, Default)]
pub struct EpisodeTrace {
    transitions: Vec<Transition>,
}

impl EpisodeTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transitions: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn last(&self) -> Option<&Transition> {
        self.transitions.last()
    }

    /// Transitions newest first
    pub fn iter_reversed(&self) -> std::iter::Rev<std::slice::Iter<'_, Transition>> {
        self.transitions.iter().rev()
    }

    /// Sum of rewards over the episode
    pub fn total_reward(&self) -> Reward {
        self.transitions.iter().map(|t| t.reward).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_trace(len: usize) -> EpisodeTrace {
        let mut trace = EpisodeTrace::with_capacity(len);
        for i in 0..len {
            trace.push(Transition::new(
                StateKey::Grid([i, 0, 0, 0]),
                i % 2,
                StateKey::Grid([i + 1, 0, 0, 0]),
                1.0,
            ));
        }
        trace
    }

    #[test]
    fn test_trace_push_and_len() {
        let mut trace = EpisodeTrace::new();
        assert!(trace.is_empty());

        trace.push(Transition::new(
            StateKey::Grid([0; 4]),
            1,
            StateKey::Terminal,
            0.0,
        ));
        assert_eq!(trace.len(), 1);
        assert!(trace.last().unwrap().next_state.is_terminal());
    }

    #[test]
    fn test_trace_reverse_order() {
        let trace = create_test_trace(4);
        let firsts: Vec<_> = trace
            .iter_reversed()
            .map(|t| t.state.indices().unwrap()[0])
            .collect();
        assert_eq!(firsts, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_trace_total_reward() {
        let trace = create_test_trace(5);
        assert_eq!(trace.total_reward(), 5.0);
    }
}
