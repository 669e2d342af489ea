//! Criterion benchmarks for the trial sequencer and model step.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dmts::config::{ModelConfig, TaskConfig};
use dmts::integrate::{Euler, Rk4};
use dmts::model::DmtsModel;
use dmts::sequencer::TrialSequencer;

fn make_task(dims: usize, seed: u64) -> TaskConfig {
    TaskConfig {
        dims,
        seed: Some(seed),
        ..TaskConfig::default()
    }
}

/// Signal lookups over an already-generated timeline at varying D.
fn bench_signal_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_lookup");

    for dims in [16usize, 64, 256, 512].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("all_signals", dims), dims, |b, &dims| {
            let mut seq = TrialSequencer::new(make_task(dims, 42)).expect("valid task");
            seq.ensure_generated(100);
            let mut n = 0u64;

            b.iter(|| {
                let t = (n % 300_000) as f64 * 0.001;
                n += 1;
                let target = seq.target_signal(t).expect("t >= 0")[0];
                let a = seq.choice_a_signal(t).expect("t >= 0")[0];
                let bb = seq.choice_b_signal(t).expect("t >= 0")[0];
                let r = seq.reset_signal(t).expect("t >= 0");
                black_box(target + a + bb + r)
            });
        });
    }

    group.finish();
}

/// Cost of lazily generating fresh trials.
fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    for dims in [32usize, 256].iter() {
        group.bench_with_input(BenchmarkId::new("100_trials", dims), dims, |b, &dims| {
            b.iter(|| {
                let mut seq = TrialSequencer::new(make_task(dims, 7)).expect("valid task");
                seq.ensure_generated(99);
                black_box(seq.generated())
            });
        });
    }

    group.finish();
}

/// One full-model step, comparing steppers.
fn bench_model_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_step");

    let cfg = ModelConfig {
        task: make_task(32, 3),
        ..ModelConfig::default()
    };

    group.bench_function("euler", |b| {
        let mut model = DmtsModel::new(&cfg).expect("valid config");
        let mut n = 0u64;
        b.iter(|| {
            let t = n as f64 * 0.001;
            n += 1;
            black_box(model.step(&Euler, t, 0.001).expect("t >= 0").evidence)
        });
    });

    group.bench_function("rk4", |b| {
        let mut model = DmtsModel::new(&cfg).expect("valid config");
        let mut n = 0u64;
        b.iter(|| {
            let t = n as f64 * 0.001;
            n += 1;
            black_box(model.step(&Rk4, t, 0.001).expect("t >= 0").evidence)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_signal_lookup,
    bench_generation,
    bench_model_step
);
criterion_main!(benches);
