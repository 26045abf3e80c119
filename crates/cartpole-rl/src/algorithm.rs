//! Q-table storage, Boltzmann action selection and the one-step backup

use ndarray::{Array2, ArrayView1};

use cartpole_core::{CartPoleError, Result};

use crate::discretize::Discretizer;
use crate::experience::{EpisodeTrace, Transition};
use crate::state::{ActionIndex, StateKey};

/// Dense action-value table, one row per state key and one column per action
#[derive(Debug, Clone)]
pub struct QTable {
    discretizer: Discretizer,
    values: Array2<f64>,
}

impl QTable {
    /// Zero-initialized table covering every key of `discretizer`
    pub fn new(discretizer: Discretizer, action_count: usize) -> Self {
        let values = Array2::zeros((discretizer.key_count(), action_count));
        Self {
            discretizer,
            values,
        }
    }

    pub fn discretizer(&self) -> &Discretizer {
        &self.discretizer
    }

    /// Number of state keys
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    pub fn action_count(&self) -> usize {
        self.values.ncols()
    }

    /// Action values of `key`
    pub fn values(&self, key: &StateKey) -> Result<ArrayView1<'_, f64>> {
        let row = self.discretizer.row_index(key)?;
        Ok(self.values.row(row))
    }

    pub fn value(&self, key: &StateKey, action: ActionIndex) -> Result<f64> {
        let row = self.discretizer.row_index(key)?;
        self.check_action(action)?;
        Ok(self.values[[row, action]])
    }

    /// Largest action value of `key`
    pub fn max_value(&self, key: &StateKey) -> Result<f64> {
        Ok(max_of(self.values(key)?))
    }

    /// First action holding the largest value of `key`
    pub fn best_action(&self, key: &StateKey) -> Result<ActionIndex> {
        Ok(first_max_index(self.values(key)?))
    }

    /// Every key with its action values, in row order
    pub fn iter(&self) -> impl Iterator<Item = (StateKey, ArrayView1<'_, f64>)> + '_ {
        self.discretizer.keys().zip(self.values.rows())
    }

    /// Apply `Q[s][a] += lr * (r + gamma * max Q[s'] - Q[s][a])`, returning the TD error
    pub fn backup(
        &mut self,
        transition: &Transition,
        learning_rate: f64,
        discount_factor: f64,
    ) -> Result<f64> {
        let row = self.discretizer.row_index(&transition.state)?;
        let next_row = self.discretizer.row_index(&transition.next_state)?;
        self.check_action(transition.action)?;

        let max_next = max_of(self.values.row(next_row));
        let current = self.values[[row, transition.action]];
        let td_error = transition.reward + discount_factor * max_next - current;

        self.values[[row, transition.action]] = current + learning_rate * td_error;

        Ok(td_error)
    }

    /// Back up every transition of `trace`, newest first.
    ///
    /// Values refreshed near the end of the episode reach earlier transitions
    /// within the same replay. Returns the mean squared TD error.
    pub fn replay(
        &mut self,
        trace: &EpisodeTrace,
        learning_rate: f64,
        discount_factor: f64,
    ) -> Result<f64> {
        if trace.is_empty() {
            return Ok(0.0);
        }

        let mut total_loss = 0.0;
        for transition in trace.iter_reversed() {
            let td_error = self.backup(transition, learning_rate, discount_factor)?;
            total_loss += td_error * td_error;
        }

        Ok(total_loss / trace.len() as f64)
    }

    fn check_action(&self, action: ActionIndex) -> Result<()> {
        if action >= self.action_count() {
            return Err(CartPoleError::InvalidAction {
                index: action,
                count: self.action_count(),
            });
        }
        Ok(())
    }
}

fn max_of(values: ArrayView1<'_, f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
}

/// Index of the first maximal entry; 0 for an empty row
fn first_max_index(values: ArrayView1<'_, f64>) -> ActionIndex {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

/// Softmax distribution over `values` at `temperature`.
///
/// The maximum is subtracted before exponentiating, so the largest weight is
/// exactly 1 and large magnitudes cannot overflow.
pub fn boltzmann_probabilities(values: ArrayView1<'_, f64>, temperature: f64) -> Vec<f64> {
    let max_w = max_of(values);
    let weights: Vec<f64> = values
        .iter()
        .map(|&w| ((w - max_w) / temperature).exp())
        .collect();
    let total: f64 = weights.iter().sum();

    weights.into_iter().map(|w| w / total).collect()
}

/// Walk `probabilities` in order and return the first action whose
/// cumulative probability reaches `r`, falling back to the last action.
pub fn sample_index(probabilities: &[f64], r: f64) -> ActionIndex {
    let mut upto = 0.0;
    for (i, p) in probabilities.iter().enumerate() {
        upto += p;
        if upto >= r {
            return i;
        }
    }
    probabilities.len().saturating_sub(1)
}
