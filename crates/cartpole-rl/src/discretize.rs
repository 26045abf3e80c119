//! Mapping continuous states onto the nearest point of a fixed grid

use cartpole_core::{CartPoleError, CartPoleState, DimensionSpec, Result, STATE_DIMENSIONS};

use crate::state::StateKey;

const DIMENSION_NAMES: [&str; STATE_DIMENSIONS] = ["x", "x_dot", "theta", "theta_dot"];

/// Uniform grid over the four state dimensions.
///
/// Rows are numbered in row-major order over the grid indexes, with the
/// terminal key occupying the final row.
#[derive(Debug, Clone, PartialEq)]
pub struct Discretizer {
    dimensions: [DimensionSpec; STATE_DIMENSIONS],
    grid_rows: usize,
}

impl Discretizer {
    pub fn new(dimensions: [DimensionSpec; STATE_DIMENSIONS]) -> Result<Self> {
        for (name, spec) in DIMENSION_NAMES.iter().zip(&dimensions) {
            spec.validate(name)?;
        }

        let grid_rows = dimensions.iter().map(DimensionSpec::point_count).product();

        Ok(Self {
            dimensions,
            grid_rows,
        })
    }

    pub fn dimensions(&self) -> &[DimensionSpec; STATE_DIMENSIONS] {
        &self.dimensions
    }

    /// Number of keys: every grid combination plus the terminal key
    pub fn key_count(&self) -> usize {
        self.grid_rows + 1
    }

    /// Index of the grid point nearest to `value`, clamped into the grid.
    ///
    /// Ties round away from zero, the same way on every call.
    pub fn bucket_index(spec: &DimensionSpec, value: f64) -> usize {
        let n = ((value - spec.min) / spec.delta()).round();
        // NaN saturates to 0 on the cast
        n.clamp(0.0, spec.bucket_count as f64) as usize
    }

    /// Grid key of `state`, ignoring safety
    pub fn grid_key(&self, state: &CartPoleState) -> StateKey {
        let values = state.to_array();
        let mut indices = [0; STATE_DIMENSIONS];
        for (i, spec) in self.dimensions.iter().enumerate() {
            indices[i] = Self::bucket_index(spec, values[i]);
        }
        StateKey::Grid(indices)
    }

    /// Grid point a key stands for, `None` for the terminal key
    pub fn to_continuous(&self, key: &StateKey) -> Option<CartPoleState> {
        let indices = key.indices()?;
        let mut values = [0.0; STATE_DIMENSIONS];
        for (i, spec) in self.dimensions.iter().enumerate() {
            values[i] = spec.grid_value(indices[i]);
        }
        Some(CartPoleState::from_array(values))
    }

    /// Table row of `key`; keys outside the grid are an error
    pub fn row_index(&self, key: &StateKey) -> Result<usize> {
        let indices = match key {
            StateKey::Terminal => return Ok(self.grid_rows),
            StateKey::Grid(indices) => indices,
        };

        let mut row = 0;
        for (spec, &index) in self.dimensions.iter().zip(indices) {
            if index >= spec.point_count() {
                return Err(CartPoleError::UnknownStateKey(key.to_string()));
            }
            row = row * spec.point_count() + index;
        }
        Ok(row)
    }

    /// Key stored in table row `row`
    pub fn key_at(&self, row: usize) -> Option<StateKey> {
        if row == self.grid_rows {
            return Some(StateKey::Terminal);
        }
        if row > self.grid_rows {
            return None;
        }

        let mut indices = [0; STATE_DIMENSIONS];
        let mut rest = row;
        for (i, spec) in self.dimensions.iter().enumerate().rev() {
            indices[i] = rest % spec.point_count();
            rest /= spec.point_count();
        }
        Some(StateKey::Grid(indices))
    }

    /// All keys in row order
    pub fn keys(&self) -> impl Iterator<Item = StateKey> + '_ {
        (0..self.key_count()).filter_map(|row| self.key_at(row))
    }
}
