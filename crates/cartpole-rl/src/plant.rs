//! Cart-pole plant: nonlinear dynamics advanced by explicit Euler steps

use std::f64::consts::PI;

use cartpole_core::{CartPoleState, PlantConfig, Result, Reward, RewardShaping};
use tracing::trace;

use crate::environment::Environment;

/// Inverted pendulum on a cart
#[derive(Debug, Clone)]
pub struct CartPole {
    config: PlantConfig,
    total_mass: f64,
    pole_mass_length: f64,
    state: CartPoleState,
}

impl CartPole {
    /// Create a plant at rest from validated constants
    pub fn new(config: PlantConfig) -> Result<Self> {
        config.validate()?;

        let total_mass = config.cart_mass + config.pole_mass;
        let pole_mass_length = config.pole_mass * config.pole_half_length;

        Ok(Self {
            config,
            total_mass,
            pole_mass_length,
            state: CartPoleState::default(),
        })
    }

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    pub fn pole_mass_length(&self) -> f64 {
        self.pole_mass_length
    }

    /// Linear and angular acceleration `(x_acc, theta_acc)` of `state` under `force`
    pub fn accelerations(&self, state: &CartPoleState, force: f64) -> (f64, f64) {
        let (sin_theta, cos_theta) = state.theta.sin_cos();

        let temp = (force + self.pole_mass_length * state.theta_dot * state.theta_dot * sin_theta)
            / self.total_mass;

        let theta_acc = (self.config.gravity * sin_theta - cos_theta * temp)
            / (self.config.pole_half_length
                * (4.0 / 3.0 - self.config.pole_mass * cos_theta * cos_theta / self.total_mass));

        let x_acc = temp - self.pole_mass_length * theta_acc * cos_theta / self.total_mass;

        (x_acc, theta_acc)
    }

    /// Reward under the configured shaping
    fn shaped_reward(&self) -> Reward {
        let safe = self.is_system_safe();
        match self.config.reward {
            RewardShaping::TimeAlive => {
                if safe {
                    1.0
                } else {
                    0.0
                }
            }
            RewardShaping::SafetyPenalty => {
                if safe {
                    0.0
                } else {
                    -1.0
                }
            }
            RewardShaping::AnglePenalty => {
                if safe {
                    1.0 - normalize_angle(self.state.theta).abs() / self.config.safe_angle_rad
                } else {
                    0.0
                }
            }
        }
    }
}

/// Reduce an angle into `[-pi, pi)`
pub fn normalize_angle(theta: f64) -> f64 {
    theta - (2.0 * PI) * ((theta + PI) / (2.0 * PI)).floor()
}

impl Environment for CartPole {
    fn reset(&mut self, state: CartPoleState) {
        self.state = state;
    }

    fn get_state(&self) -> CartPoleState {
        self.state
    }

    fn simulate(&mut self, force: f64, dt: f64) {
        let (x_acc, theta_acc) = self.accelerations(&self.state, force);
        let s = self.state;

        // Positions advance with the pre-step velocities
        self.state = CartPoleState {
            x: s.x + dt * s.x_dot,
            x_dot: s.x_dot + dt * x_acc,
            theta: s.theta + dt * s.theta_dot,
            theta_dot: s.theta_dot + dt * theta_acc,
        };

        trace!(force, dt, state = %self.state, "Plant stepped");
    }

    fn is_state_safe(&self, state: &CartPoleState) -> bool {
        let theta = normalize_angle(state.theta);
        state.x.abs() < self.config.area_size && theta.abs() < self.config.safe_angle_rad
    }

    fn reward(&self) -> Reward {
        self.shaped_reward()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_plant() -> CartPole {
        CartPole::new(PlantConfig::default()).unwrap()
    }

    #[test]
    fn test_plant_creation() {
        let plant = create_test_plant();
        assert_eq!(plant.get_state(), CartPoleState::default());
        assert!((plant.total_mass() - 1.1).abs() < 1e-12);
        assert!((plant.pole_mass_length() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlantConfig {
            pole_half_length: -0.5,
            ..PlantConfig::default()
        };
        assert!(CartPole::new(config).is_err());
    }

    #[test]
    fn test_reset_replaces_state() {
        let mut plant = create_test_plant();
        let state = CartPoleState::new(0.1, 0.2, 0.05, -0.1);
        plant.reset(state);
        assert_eq!(plant.get_state(), state);
    }

    #[test]
    fn test_upright_rest_is_equilibrium() {
        let mut plant = create_test_plant();
        plant.simulate(0.0, 0.02);
        assert_eq!(plant.get_state(), CartPoleState::default());
    }

    #[test]
    fn test_positions_use_pre_step_velocity() {
        let mut plant = create_test_plant();
        plant.reset(CartPoleState::new(0.0, 1.0, 0.0, 0.5));
        plant.simulate(0.0, 0.1);

        let state = plant.get_state();
        assert!((state.x - 0.1).abs() < 1e-12);
        assert!((state.theta - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_push_right_tilts_pole_left() {
        let mut plant = create_test_plant();
        for _ in 0..5 {
            plant.simulate(10.0, 0.02);
        }
        let state = plant.get_state();
        assert!(state.x_dot > 0.0);
        assert!(state.theta_dot < 0.0);
        assert!(state.theta < 0.0);
    }

    #[test]
    fn test_gravity_pulls_tilted_pole_down() {
        let plant = create_test_plant();
        let (_, theta_acc) = plant.accelerations(&CartPoleState::new(0.0, 0.0, 0.1, 0.0), 0.0);
        assert!(theta_acc > 0.0);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(0.1) - 0.1).abs() < 1e-12);
        assert!((normalize_angle(2.0 * PI + 0.1) - 0.1).abs() < 1e-9);
        assert!((normalize_angle(-2.0 * PI - 0.1) + 0.1).abs() < 1e-9);
        assert!((normalize_angle(PI) + PI).abs() < 1e-12);
    }

    #[test]
    fn test_full_turn_is_still_safe() {
        let plant = create_test_plant();
        assert!(plant.is_state_safe(&CartPoleState::new(0.0, 0.0, 2.0 * PI + 0.05, 0.0)));
    }

    #[test]
    fn test_safety_bounds_are_strict() {
        let plant = create_test_plant();
        assert!(!plant.is_state_safe(&CartPoleState::new(2.4, 0.0, 0.0, 0.0)));
        assert!(!plant.is_state_safe(&CartPoleState::new(-2.4, 0.0, 0.0, 0.0)));
        assert!(plant.is_state_safe(&CartPoleState::new(2.39, 0.0, 0.0, 0.0)));
        assert!(!plant.is_state_safe(&CartPoleState::new(f64::NAN, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_time_alive_reward() {
        let mut plant = create_test_plant();
        assert_eq!(plant.reward(), 1.0);
        plant.reset(CartPoleState::new(3.0, 0.0, 0.0, 0.0));
        assert_eq!(plant.reward(), 0.0);
    }

    #[test]
    fn test_safety_penalty_reward() {
        let mut plant = CartPole::new(PlantConfig {
            reward: RewardShaping::SafetyPenalty,
            ..PlantConfig::default()
        })
        .unwrap();
        assert_eq!(plant.reward(), 0.0);
        plant.reset(CartPoleState::new(0.0, 0.0, 0.5, 0.0));
        assert_eq!(plant.reward(), -1.0);
    }

    #[test]
    fn test_angle_penalty_reward() {
        let config = PlantConfig {
            reward: RewardShaping::AnglePenalty,
            ..PlantConfig::default()
        };
        let half_angle = config.safe_angle_rad / 2.0;
        let mut plant = CartPole::new(config).unwrap();

        assert_eq!(plant.reward(), 1.0);
        plant.reset(CartPoleState::new(0.0, 0.0, -half_angle, 0.0));
        assert!((plant.reward() - 0.5).abs() < 1e-12);
        plant.reset(CartPoleState::new(0.0, 0.0, 1.0, 0.0));
        assert_eq!(plant.reward(), 0.0);
    }
}
