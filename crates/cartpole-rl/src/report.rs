//! Training and rollout results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cartpole_core::{CartPoleState, Result, Reward, RunId};

use crate::experience::Transition;

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// Survived `max_transitions` steps
    Success,
    /// Left the safe region
    Failure,
}

impl std::fmt::Display for EpisodeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeOutcome::Success => write!(f, "success"),
            EpisodeOutcome::Failure => write!(f, "failed"),
        }
    }
}

/// Per-episode diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// 1-based episode number
    pub iteration: usize,
    pub outcome: EpisodeOutcome,
    pub transitions: usize,
    pub total_reward: Reward,
    /// Mean squared TD error of the replay
    pub loss: f64,
    /// Transition that left the safe region, for failed episodes
    pub last_transition: Option<Transition>,
}

/// Result of one call to `QLearner::learn`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub success: bool,
    pub episodes: Vec<EpisodeSummary>,
}

impl TrainingReport {
    pub(crate) fn start() -> Self {
        let now = Utc::now();
        Self {
            run_id: RunId::new(),
            started_at: now,
            finished_at: now,
            success: false,
            episodes: Vec::new(),
        }
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    pub fn episodes_run(&self) -> usize {
        self.episodes.len()
    }

    /// The episode that ended training, if one succeeded
    pub fn success_episode(&self) -> Option<&EpisodeSummary> {
        self.episodes
            .iter()
            .find(|e| e.outcome == EpisodeOutcome::Success)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A greedy-policy trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rollout {
    /// Visited states, starting with the initial state
    pub states: Vec<CartPoleState>,
    /// Force applied before each subsequent state
    pub forces: Vec<f64>,
    /// Steps that ended in a safe state
    pub steps_survived: usize,
    /// Whether the whole requested horizon stayed safe
    pub completed: bool,
}

/// Running totals across every `learn` call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearnerStats {
    pub episodes: u64,
    pub successes: u64,
    pub total_transitions: u64,
    pub total_reward: f64,
    pub average_reward: f64,
}

impl LearnerStats {
    pub(crate) fn record_episode(&mut self, summary: &EpisodeSummary) {
        self.episodes += 1;
        if summary.outcome == EpisodeOutcome::Success {
            self.successes += 1;
        }
        self.total_transitions += summary.transitions as u64;
        self.total_reward += summary.total_reward;
        self.average_reward = if self.total_transitions > 0 {
            self.total_reward / self.total_transitions as f64
        } else {
            0.0
        };
    }
}
