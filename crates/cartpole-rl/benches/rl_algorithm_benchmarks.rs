//! RL Algorithm Benchmarks
//!
//! Benchmarks for the plant and the tabular learner:
//! - Plant integration steps
//! - State normalization onto the grid
//! - Boltzmann action selection
//! - Backward replay of an episode
//! - Full learning cycles
//!
//! ## Hot Paths Identified
//! 1. CartPole::simulate() - Called once per transition
//! 2. QLearner::normalize() - Called twice per transition
//! 3. QLearner::select_action() - Called once per transition
//! 4. QTable::replay() - Called once per episode

#![allow(clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cartpole_core::{CartPoleState, GridConfig, LearnerConfig, PlantConfig};
use cartpole_rl::{
    boltzmann_probabilities, CartPole, Environment, EpisodeTrace, QLearner, QTable, StateKey,
    Transition,
};

// ============================================================================
// Test Data Generators
// ============================================================================

fn create_plant() -> CartPole {
    CartPole::new(PlantConfig::default()).unwrap()
}

fn create_learner(iterations: usize) -> QLearner {
    let config = LearnerConfig {
        iterations,
        seed: Some(2016),
        ..LearnerConfig::default()
    };
    QLearner::from_config(&GridConfig::default(), config).unwrap()
}

fn generate_states(count: usize) -> Vec<CartPoleState> {
    (0..count)
        .map(|i| {
            let t = i as f64 * 0.37;
            CartPoleState::new(
                2.0 * t.sin(),
                3.0 * (t * 1.3).cos(),
                0.2 * (t * 0.7).sin(),
                2.5 * (t * 1.9).cos(),
            )
        })
        .collect()
}

fn generate_trace(table: &QTable, len: usize) -> EpisodeTrace {
    let keys: Vec<StateKey> = table
        .discretizer()
        .keys()
        .filter(|k| !k.is_terminal())
        .collect();

    let mut trace = EpisodeTrace::with_capacity(len);
    for i in 0..len {
        let state = keys[(i * 7) % keys.len()];
        let next_state = if i + 1 == len {
            StateKey::Terminal
        } else {
            keys[((i + 1) * 7) % keys.len()]
        };
        let reward = if next_state.is_terminal() { 0.0 } else { 1.0 };
        trace.push(Transition::new(state, i % 2, next_state, reward));
    }
    trace
}

// ============================================================================
// Plant Benchmarks
// ============================================================================

fn bench_plant_simulate(c: &mut Criterion) {
    let mut plant = create_plant();

    c.bench_function("plant/simulate", |b| {
        b.iter(|| {
            plant.reset(CartPoleState::new(0.1, 0.0, 0.05, 0.0));
            plant.simulate(black_box(10.0), black_box(0.02));
        })
    });
}

fn bench_plant_is_state_safe(c: &mut Criterion) {
    let plant = create_plant();
    let states = generate_states(100);

    c.bench_function("plant/is_state_safe_batch_100", |b| {
        b.iter(|| {
            states
                .iter()
                .filter(|s| plant.is_state_safe(black_box(s)))
                .count()
        })
    });
}

// ============================================================================
// Learner Benchmarks
// ============================================================================

fn bench_normalize(c: &mut Criterion) {
    let learner = create_learner(1);
    let plant = create_plant();
    let states = generate_states(100);

    let mut group = c.benchmark_group("learner/normalize");
    group.throughput(Throughput::Elements(states.len() as u64));
    group.bench_function("batch_100", |b| {
        b.iter(|| {
            for state in &states {
                black_box(learner.normalize(&plant, state));
            }
        })
    });
    group.finish();
}

fn bench_select_action(c: &mut Criterion) {
    let mut learner = create_learner(1);
    let plant = create_plant();
    let state = CartPoleState::new(0.1, -0.2, 0.01, 0.3);

    c.bench_function("learner/select_action", |b| {
        b.iter(|| learner.select_action(&plant, black_box(&state)).unwrap())
    });
}

fn bench_boltzmann_probabilities(c: &mut Criterion) {
    let mut group = c.benchmark_group("learner/boltzmann_by_action_count");
    for count in [2usize, 3, 5, 9] {
        let values = ndarray::Array1::from_iter((0..count).map(|i| i as f64 * 0.5));
        group.bench_with_input(BenchmarkId::from_parameter(count), &values, |b, values| {
            b.iter(|| boltzmann_probabilities(values.view(), black_box(4.0)))
        });
    }
    group.finish();
}

fn bench_replay(c: &mut Criterion) {
    let lengths = [10, 100, 500];

    let mut group = c.benchmark_group("learner/replay");
    for len in lengths {
        let learner = create_learner(1);
        let trace = generate_trace(learner.table(), len);
        let mut table = learner.table().clone();

        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &trace, |b, trace| {
            b.iter(|| table.replay(trace, 0.1, 1.0).unwrap())
        });
    }
    group.finish();
}

fn bench_learning_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("learner/train");
    group.sample_size(10);
    for iterations in [10, 100] {
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &iterations,
            |b, &iterations| {
                b.iter(|| {
                    let mut learner = create_learner(iterations);
                    let mut plant = create_plant();
                    learner.train(&mut plant).unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_rollout(c: &mut Criterion) {
    let mut learner = create_learner(200);
    let mut plant = create_plant();
    learner.train(&mut plant).unwrap();

    c.bench_function("learner/rollout_500", |b| {
        b.iter(|| {
            learner
                .rollout(&mut plant, CartPoleState::default(), 500, 0.02)
                .unwrap()
        })
    });
}

criterion_group!(
    name = plant_benchmarks;
    config = Criterion::default();
    targets =
        bench_plant_simulate,
        bench_plant_is_state_safe,
);

criterion_group!(
    name = learner_benchmarks;
    config = Criterion::default();
    targets =
        bench_normalize,
        bench_select_action,
        bench_boltzmann_probabilities,
        bench_replay,
        bench_rollout,
);

criterion_group!(
    name = training_benchmarks;
    config = Criterion::default();
    targets =
        bench_learning_cycle,
);

criterion_main!(plant_benchmarks, learner_benchmarks, training_benchmarks);
