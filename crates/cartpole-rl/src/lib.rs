//! Cartpole RL - plant dynamics and tabular Q-learning
//!
//! This crate provides the cart-pole plant, the discretization of its
//! continuous state onto a fixed grid, the Q-table and the learner that
//! trains it with Boltzmann exploration and backward episode replay.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod algorithm;
pub mod discretize;
pub mod engine;
pub mod environment;
pub mod experience;
pub mod plant;
pub mod report;
pub mod state;

pub use algorithm::{boltzmann_probabilities, QTable};
pub use discretize::Discretizer;
pub use engine::QLearner;
pub use environment::Environment;
pub use experience::{EpisodeTrace, Transition};
pub use plant::CartPole;
pub use report::{EpisodeOutcome, EpisodeSummary, LearnerStats, Rollout, TrainingReport};
pub use state::{ActionIndex, StateKey};
