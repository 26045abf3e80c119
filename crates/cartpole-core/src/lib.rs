//! Cartpole Core - configuration values, state types and errors
//!
//! This crate provides the foundational types shared by the plant, the
//! learner and the command line front end.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    DimensionSpec, GridConfig, LearnerConfig, PlantConfig, RewardShaping, STATE_DIMENSIONS,
};
pub use error::{CartPoleError, Result};
pub use types::{CartPoleState, Reward, RunId};
