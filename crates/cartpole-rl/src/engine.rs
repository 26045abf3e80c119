//! Q-learner - episodic training and policy extraction over a plant

use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use cartpole_core::config::validate_forces;
use cartpole_core::{
    CartPoleError, CartPoleState, DimensionSpec, GridConfig, LearnerConfig, Result,
    STATE_DIMENSIONS,
};

use crate::algorithm::{boltzmann_probabilities, sample_index, QTable};
use crate::discretize::Discretizer;
use crate::environment::Environment;
use crate::experience::{EpisodeTrace, Transition};
use crate::report::{EpisodeOutcome, EpisodeSummary, LearnerStats, Rollout, TrainingReport};
use crate::state::{ActionIndex, StateKey};

/// Upper bound on storage reserved ahead of an episode or rollout
const PREALLOCATED_STEPS: usize = 1024;

/// Tabular Q-learner with Boltzmann exploration and backward episode replay
pub struct QLearner {
    table: QTable,
    forces: Vec<f64>,
    config: LearnerConfig,
    rng: StdRng,
    stats: LearnerStats,
}

impl QLearner {
    /// Build a learner with a zeroed table over `dimensions`.
    ///
    /// Fails on an empty force set, a dimension without buckets or invalid
    /// hyperparameters.
    pub fn new(
        forces: Vec<f64>,
        dimensions: [DimensionSpec; STATE_DIMENSIONS],
        config: LearnerConfig,
    ) -> Result<Self> {
        validate_forces(&forces)?;
        config.validate()?;

        let discretizer = Discretizer::new(dimensions)?;
        let table = QTable::new(discretizer, forces.len());

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "Q-table initialized with {} states x {} actions",
            table.len(),
            table.action_count()
        );

        Ok(Self {
            table,
            forces,
            config,
            rng,
            stats: LearnerStats::default(),
        })
    }

    pub fn from_config(grid: &GridConfig, config: LearnerConfig) -> Result<Self> {
        Self::new(grid.forces.clone(), grid.dimensions(), config)
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Grid dimensions, e.g. for axis ticks
    pub fn dimensions(&self) -> &[DimensionSpec; STATE_DIMENSIONS] {
        self.table.discretizer().dimensions()
    }

    pub fn forces(&self) -> &[f64] {
        &self.forces
    }

    /// Read-only view of the value table
    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn stats(&self) -> &LearnerStats {
        &self.stats
    }

    /// Physical force of an action
    pub fn force(&self, action: ActionIndex) -> Result<f64> {
        self.forces
            .get(action)
            .copied()
            .ok_or(CartPoleError::InvalidAction {
                index: action,
                count: self.forces.len(),
            })
    }

    /// Discrete key of `state`; every unsafe state maps to the terminal key
    pub fn normalize<E: Environment + ?Sized>(&self, env: &E, state: &CartPoleState) -> StateKey {
        if !env.is_state_safe(state) {
            return StateKey::Terminal;
        }
        self.table.discretizer().grid_key(state)
    }

    /// Action values at the key of `state`
    pub fn get_q_vals<E: Environment + ?Sized>(
        &self,
        env: &E,
        state: &CartPoleState,
    ) -> Result<ArrayView1<'_, f64>> {
        self.table.values(&self.normalize(env, state))
    }

    /// Boltzmann distribution over actions at the key of `state`
    pub fn action_probabilities<E: Environment + ?Sized>(
        &self,
        env: &E,
        state: &CartPoleState,
    ) -> Result<Vec<f64>> {
        let values = self.get_q_vals(env, state)?;
        Ok(boltzmann_probabilities(values, self.config.temperature))
    }

    /// Sample an exploratory action for `state`
    pub fn select_action<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        state: &CartPoleState,
    ) -> Result<ActionIndex> {
        let probabilities = self.action_probabilities(env, state)?;
        let r: f64 = self.rng.gen();
        Ok(sample_index(&probabilities, r))
    }

    /// Greedy action index; ties go to the first action
    pub fn best_action_index<E: Environment + ?Sized>(
        &self,
        env: &E,
        state: &CartPoleState,
    ) -> Result<ActionIndex> {
        self.table.best_action(&self.normalize(env, state))
    }

    /// Force of the greedy action
    pub fn get_best_action<E: Environment + ?Sized>(
        &self,
        env: &E,
        state: &CartPoleState,
    ) -> Result<f64> {
        let action = self.best_action_index(env, state)?;
        self.force(action)
    }

    /// Train with the limits and rates from the learner's configuration
    pub fn train<E: Environment + ?Sized>(&mut self, env: &mut E) -> Result<TrainingReport> {
        let LearnerConfig {
            iterations,
            max_transitions,
            dt,
            learning_rate,
            discount_factor,
            ..
        } = self.config;
        self.learn(
            env,
            iterations,
            max_transitions,
            dt,
            learning_rate,
            discount_factor,
        )
    }

    /// Run up to `iterations` episodes, stopping as soon as one survives
    /// `max_transitions` steps.
    ///
    /// Each episode is replayed newest transition first once it ends.
    pub fn learn<E: Environment + ?Sized>(
        &mut self,
        env: &mut E,
        iterations: usize,
        max_transitions: usize,
        dt: f64,
        learning_rate: f64,
        discount_factor: f64,
    ) -> Result<TrainingReport> {
        let params = LearnerConfig {
            iterations,
            max_transitions,
            dt,
            learning_rate,
            discount_factor,
            ..self.config.clone()
        };
        params.validate()?;

        let mut report = TrainingReport::start();
        info!(
            run_id = %report.run_id,
            iterations,
            max_transitions,
            learning_rate,
            discount_factor,
            "Training started"
        );

        for iteration in 1..=iterations {
            let (trace, outcome) = self.run_episode(env, max_transitions, dt)?;
            let loss = self.table.replay(&trace, learning_rate, discount_factor)?;

            let summary = EpisodeSummary {
                iteration,
                outcome,
                transitions: trace.len(),
                total_reward: trace.total_reward(),
                loss,
                last_transition: match outcome {
                    EpisodeOutcome::Failure => trace.last().copied(),
                    EpisodeOutcome::Success => None,
                },
            };

            debug!(
                "Iteration #{:05} {} after {} steps, loss: {:.4}",
                iteration, outcome, summary.transitions, loss
            );

            self.stats.record_episode(&summary);
            report.episodes.push(summary);

            if outcome == EpisodeOutcome::Success {
                report.success = true;
                info!("Episode {} survived {} steps", iteration, max_transitions);
                break;
            }
        }

        report.finish();

        if report.success {
            info!(
                run_id = %report.run_id,
                episodes = report.episodes_run(),
                "Training succeeded"
            );
        } else {
            warn!(
                run_id = %report.run_id,
                episodes = report.episodes_run(),
                "Training exhausted its iterations without a successful episode"
            );
        }

        Ok(report)
    }

    fn run_episode<E: Environment + ?Sized>(
        &mut self,
        env: &mut E,
        max_transitions: usize,
        dt: f64,
    ) -> Result<(EpisodeTrace, EpisodeOutcome)> {
        env.reset(self.config.initial_state);
        if !env.is_system_safe() {
            return Err(CartPoleError::Config(format!(
                "initial state {} is outside the safe region",
                env.get_state()
            )));
        }

        let mut trace = EpisodeTrace::with_capacity(max_transitions.min(PREALLOCATED_STEPS));
        let mut state_key = self.normalize(&*env, &env.get_state());

        let outcome = loop {
            let action = self.select_action(&*env, &env.get_state())?;
            env.simulate(self.forces[action], dt);

            let reward = env.reward();
            let next_key = self.normalize(&*env, &env.get_state());
            trace.push(Transition::new(state_key, action, next_key, reward));

            if !env.is_system_safe() {
                break EpisodeOutcome::Failure;
            }
            if trace.len() >= max_transitions {
                break EpisodeOutcome::Success;
            }

            state_key = next_key;
        };

        Ok((trace, outcome))
    }

    /// Follow the greedy policy from `initial` for up to `steps` steps
    pub fn rollout<E: Environment + ?Sized>(
        &self,
        env: &mut E,
        initial: CartPoleState,
        steps: usize,
        dt: f64,
    ) -> Result<Rollout> {
        env.reset(initial);

        let reserved = steps.min(PREALLOCATED_STEPS);
        let mut states = Vec::with_capacity(reserved + 1);
        let mut forces = Vec::with_capacity(reserved);
        states.push(env.get_state());

        let mut steps_survived = 0;
        while steps_survived < steps && env.is_system_safe() {
            let force = self.get_best_action(&*env, &env.get_state())?;
            env.simulate(force, dt);

            forces.push(force);
            states.push(env.get_state());

            if !env.is_system_safe() {
                break;
            }
            steps_survived += 1;
        }

        Ok(Rollout {
            states,
            forces,
            steps_survived,
            completed: steps_survived == steps,
        })
    }
}
