//! Configuration values for the plant, the discretization grid and the learner
//!
//! Every section deserializes with defaults so a partial TOML file (or none at
//! all) yields a usable configuration. Call `validate()` before handing a
//! section to a constructor.

use serde::{Deserialize, Serialize};

use crate::error::{CartPoleError, Result};
use crate::types::CartPoleState;

/// Number of continuous state dimensions `(x, x_dot, theta, theta_dot)`
pub const STATE_DIMENSIONS: usize = 4;

/// Reward shaping applied by the plant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardShaping {
    /// 1 while safe, 0 otherwise
    #[default]
    TimeAlive,
    /// 0 while safe, -1 otherwise
    SafetyPenalty,
    /// `1 - |theta| / safe_angle` while safe, 0 otherwise
    AnglePenalty,
}

/// Physical constants and safety bounds of the cart-pole plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub gravity: f64,
    pub cart_mass: f64,
    pub pole_mass: f64,
    /// Half of the pole's length
    pub pole_half_length: f64,
    /// Cart must stay strictly inside `(-area_size, area_size)`
    pub area_size: f64,
    /// Pole must stay strictly inside `(-safe_angle_rad, safe_angle_rad)`
    pub safe_angle_rad: f64,
    pub reward: RewardShaping,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            cart_mass: 1.0,
            pole_mass: 0.1,
            pole_half_length: 0.5,
            area_size: 2.4,
            safe_angle_rad: 0.209_439_51,
            reward: RewardShaping::TimeAlive,
        }
    }
}

impl PlantConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(CartPoleError::Config("plant.gravity must be finite".into()));
        }
        for (name, value) in [
            ("cart_mass", self.cart_mass),
            ("pole_mass", self.pole_mass),
            ("pole_half_length", self.pole_half_length),
            ("area_size", self.area_size),
            ("safe_angle_rad", self.safe_angle_rad),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CartPoleError::Config(format!(
                    "plant.{name} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Uniform grid over `[min, max]` with `bucket_count` intervals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub min: f64,
    pub max: f64,
    pub bucket_count: usize,
}

impl DimensionSpec {
    pub const fn new(min: f64, max: f64, bucket_count: usize) -> Self {
        Self {
            min,
            max,
            bucket_count,
        }
    }

    /// Width of one interval
    pub fn delta(&self) -> f64 {
        (self.max - self.min) / self.bucket_count as f64
    }

    /// Number of grid points, one more than the number of intervals
    pub const fn point_count(&self) -> usize {
        self.bucket_count + 1
    }

    /// Value of grid point `n`
    pub fn grid_value(&self, n: usize) -> f64 {
        if n >= self.bucket_count {
            return self.max;
        }
        self.min + n as f64 * self.delta()
    }

    /// All grid point values in ascending order, usable as axis ticks
    pub fn grid_points(&self) -> Vec<f64> {
        (0..self.point_count()).map(|n| self.grid_value(n)).collect()
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if self.bucket_count == 0 {
            return Err(CartPoleError::Config(format!(
                "grid.{name}.bucket_count must be at least 1"
            )));
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(CartPoleError::Config(format!(
                "grid.{name} bounds must be finite"
            )));
        }
        if self.min >= self.max {
            return Err(CartPoleError::Config(format!(
                "grid.{name}.min ({}) must be below max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Discretization grid and the discrete force set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub x: DimensionSpec,
    pub x_dot: DimensionSpec,
    pub theta: DimensionSpec,
    pub theta_dot: DimensionSpec,
    /// Force applied by each action, in action index order
    pub forces: Vec<f64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x: DimensionSpec::new(-2.4, 2.4, 6),
            x_dot: DimensionSpec::new(-3.0, 3.0, 6),
            theta: DimensionSpec::new(-0.21, 0.21, 6),
            theta_dot: DimensionSpec::new(-3.0, 3.0, 6),
            forces: vec![-10.0, 10.0],
        }
    }
}

impl GridConfig {
    /// Dimension specs in state component order
    pub fn dimensions(&self) -> [DimensionSpec; STATE_DIMENSIONS] {
        [self.x, self.x_dot, self.theta, self.theta_dot]
    }

    pub fn validate(&self) -> Result<()> {
        for (name, spec) in ["x", "x_dot", "theta", "theta_dot"]
            .iter()
            .zip(self.dimensions())
        {
            spec.validate(name)?;
        }
        validate_forces(&self.forces)
    }
}

/// Reject an empty or non-finite force set
pub fn validate_forces(forces: &[f64]) -> Result<()> {
    if forces.is_empty() {
        return Err(CartPoleError::Config(
            "action set must contain at least one force".into(),
        ));
    }
    if let Some(bad) = forces.iter().find(|f| !f.is_finite()) {
        return Err(CartPoleError::Config(format!(
            "force {bad} is not a finite number"
        )));
    }
    Ok(())
}

/// Learning hyperparameters and episode limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Boltzmann exploration temperature
    pub temperature: f64,
    pub learning_rate: f64,
    pub discount_factor: f64,
    /// Maximum number of episodes
    pub iterations: usize,
    /// Steps an episode must survive to count as a success
    pub max_transitions: usize,
    /// Simulation timestep in seconds
    pub dt: f64,
    /// RNG seed; entropy-seeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// State every episode starts from
    pub initial_state: CartPoleState,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            temperature: 4.0,
            learning_rate: 0.1,
            discount_factor: 1.0,
            iterations: 10_000,
            max_transitions: 500,
            dt: 0.02,
            seed: None,
            initial_state: CartPoleState::default(),
        }
    }
}

impl LearnerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(CartPoleError::Config(format!(
                "learner.temperature must be positive, got {}",
                self.temperature
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(CartPoleError::Config(format!(
                "learner.learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(CartPoleError::Config(format!(
                "learner.discount_factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(CartPoleError::Config(format!(
                "learner.dt must be positive, got {}",
                self.dt
            )));
        }
        if self.max_transitions == 0 {
            return Err(CartPoleError::Config(
                "learner.max_transitions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
