//! Training command

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;

use cartpole_rl::{CartPole, QLearner, Rollout, TrainingReport};

use crate::config::Config;

#[derive(Args)]
pub struct TrainArgs {
    /// Maximum number of episodes (overrides learner.iterations)
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Steps an episode must survive to count as a success
    #[arg(short, long)]
    pub max_transitions: Option<usize>,

    /// RNG seed for reproducible runs
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct TrainOutput<'a> {
    report: &'a TrainingReport,
    rollout: &'a Rollout,
}

pub fn run(args: &TrainArgs, config: &Config) -> Result<()> {
    let mut learner_config = config.learner.clone();
    if let Some(iterations) = args.iterations {
        learner_config.iterations = iterations;
    }
    if let Some(max_transitions) = args.max_transitions {
        learner_config.max_transitions = max_transitions;
    }
    if args.seed.is_some() {
        learner_config.seed = args.seed;
    }

    let mut plant = CartPole::new(config.plant.clone()).context("Failed to create plant")?;
    let mut learner =
        QLearner::from_config(&config.grid, learner_config).context("Failed to create learner")?;

    let report = learner.train(&mut plant).context("Training failed")?;

    let learner_config = learner.config();
    let rollout = learner
        .rollout(
            &mut plant,
            learner_config.initial_state,
            learner_config.max_transitions,
            learner_config.dt,
        )
        .context("Greedy rollout failed")?;

    info!(
        steps = rollout.steps_survived,
        completed = rollout.completed,
        "Greedy rollout finished"
    );

    if args.json {
        let output = TrainOutput {
            report: &report,
            rollout: &rollout,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_report(&learner, &report, &rollout);
    Ok(())
}

fn print_report(learner: &QLearner, report: &TrainingReport, rollout: &Rollout) {
    for episode in &report.episodes {
        println!(
            "Iteration #{:05} {} after {} steps",
            episode.iteration, episode.outcome, episode.transitions
        );
        if let Some(last) = &episode.last_transition {
            println!(
                "    last transition {} --[{}]--> {}",
                last.state, last.action, last.next_state
            );
        }
    }

    let stats = learner.stats();
    let elapsed = report.finished_at - report.started_at;

    println!();
    println!("Training Summary");
    println!("================");
    println!("Run:               {}", report.run_id);
    println!("Episodes:          {}", report.episodes_run());
    match report.success_episode() {
        Some(episode) => println!("Succeeded at:      episode {}", episode.iteration),
        None => println!("Succeeded at:      never"),
    }
    println!("Transitions:       {}", stats.total_transitions);
    println!("Avg reward/step:   {:.4}", stats.average_reward);
    println!("Duration:          {} ms", elapsed.num_milliseconds());
    println!(
        "Greedy rollout:    {}/{} steps{}",
        rollout.steps_survived,
        learner.config().max_transitions,
        if rollout.completed { "" } else { " (left the safe region)" }
    );
}
