//! Plant-only simulation command

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use cartpole_rl::{CartPole, Environment};

use crate::config::Config;

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of integration steps
    #[arg(short = 'n', long, default_value_t = 100)]
    pub steps: usize,

    /// Constant force applied at every step
    #[arg(short, long, allow_negative_numbers = true, conflicts_with = "random")]
    pub force: Option<f64>,

    /// Pick a random force from the configured action set at every step
    #[arg(short, long)]
    pub random: bool,

    /// Integration step in seconds (defaults to learner.dt)
    #[arg(long)]
    pub dt: Option<f64>,

    /// Keep stepping after the plant leaves the safe region
    #[arg(long)]
    pub keep_going: bool,
}

/// How the force of each step is chosen
enum ForceSource {
    Constant(f64),
    Random { forces: Vec<f64>, rng: StdRng },
}

impl ForceSource {
    fn next(&mut self) -> f64 {
        match self {
            ForceSource::Constant(force) => *force,
            ForceSource::Random { forces, rng } => forces.choose(rng).copied().unwrap_or(0.0),
        }
    }
}

pub fn run(args: &SimulateArgs, config: &Config) -> Result<()> {
    let dt = args.dt.unwrap_or(config.learner.dt);
    if !(dt.is_finite() && dt > 0.0) {
        bail!("dt must be positive, got {dt}");
    }

    let mut plant = CartPole::new(config.plant.clone()).context("Failed to create plant")?;
    plant.reset(config.learner.initial_state);

    let mut source = if args.random {
        let rng = match config.learner.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ForceSource::Random {
            forces: config.grid.forces.clone(),
            rng,
        }
    } else {
        ForceSource::Constant(args.force.unwrap_or(0.0))
    };

    println!("{:>8}  {:>8}  x, x_dot, theta, theta_dot  safe", "t", "force");
    print_row(0.0, None, &plant);

    for step in 1..=args.steps {
        let force = source.next();
        plant.simulate(force, dt);
        print_row(step as f64 * dt, Some(force), &plant);

        if !plant.is_system_safe() && !args.keep_going {
            println!("Plant left the safe region after {step} steps");
            return Ok(());
        }
    }

    Ok(())
}

fn print_row(t: f64, force: Option<f64>, plant: &CartPole) {
    let state = plant.get_state();
    let force = force.map_or_else(|| "-".to_string(), |f| format!("{f:+.2}"));
    println!(
        "{:>8.2}  {:>8}  {}  {}",
        t,
        force,
        state,
        if plant.is_system_safe() { "yes" } else { "no" }
    );
}
