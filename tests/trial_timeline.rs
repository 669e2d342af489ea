use dmts::accumulator::{AccumulatorDriver, Drive};
use dmts::config::{AccumulatorConfig, ModelConfig, StepMethod, TaskConfig};
use dmts::integrate::Euler;
use dmts::model::simulator::Simulator;
use dmts::sequencer::{Phase, TrialSequencer};
use dmts::Error;

fn task(seed: u64) -> TaskConfig {
    TaskConfig {
        t_isi: 0.5,
        t_present: 0.5,
        t_delay: 1.0,
        t_respond: 1.0,
        seed: Some(seed),
        ..TaskConfig::default()
    }
}

#[test]
fn scenario_timeline_with_lazy_generation() {
    let mut seq = TrialSequencer::new(task(1)).unwrap();

    assert_eq!(seq.resolve(0.6).unwrap(), (Phase::Present, 0));
    assert_eq!(seq.resolve(2.6).unwrap(), (Phase::Respond, 0));
    assert_eq!(seq.resolve(3.0).unwrap(), (Phase::Isi, 1));

    // Trial 0 appears on first signal query, trial 1 only once t reaches it.
    seq.target_signal(0.6).unwrap();
    assert_eq!(seq.generated(), 1);
    seq.reset_signal(2.6).unwrap();
    assert_eq!(seq.generated(), 1);

    let target = seq.target_signal(3.6).unwrap().to_vec();
    assert_eq!(seq.resolve(3.6).unwrap(), (Phase::Present, 1));
    assert_eq!(seq.generated(), 2);
    assert_eq!(target.as_slice(), seq.items()[1].shown_vector().as_slice());
}

#[test]
fn two_sequencers_with_the_same_seed_agree_when_queried_differently() {
    let mut dense = TrialSequencer::new(task(77)).unwrap();
    let mut sparse = TrialSequencer::new(task(77)).unwrap();

    for n in 0..3000 {
        dense.reset_signal(n as f64 * 0.01).unwrap();
    }
    // Jump straight to trial 9.
    let b = sparse.choice_b_signal(29.5).unwrap().to_vec();

    assert_eq!(dense.generated(), 10);
    assert_eq!(sparse.generated(), 10);
    assert_eq!(dense.items(), sparse.items());
    assert_eq!(b.as_slice(), dense.items()[9].foil_vector.as_slice());
}

#[test]
fn boundary_errors_are_typed() {
    let mut seq = TrialSequencer::new(task(1)).unwrap();
    assert!(matches!(seq.target_signal(-0.5), Err(Error::InvalidTime { .. })));

    let bad = TaskConfig {
        t_present: 0.0,
        ..task(1)
    };
    assert!(matches!(
        TrialSequencer::new(bad),
        Err(Error::InvalidConfig { field: "t_present", .. })
    ));

    let bad = AccumulatorConfig {
        tau: -1.0,
        ..AccumulatorConfig::default()
    };
    assert!(matches!(
        AccumulatorDriver::new(bad),
        Err(Error::InvalidConfig { field: "tau", .. })
    ));
}

#[test]
fn accumulator_driven_by_sequencer_reset() {
    // Constant evidence favoring B; only RESPOND lets it build up.
    let mut seq = TrialSequencer::new(task(5)).unwrap();
    let mut acc = AccumulatorDriver::new(AccumulatorConfig::default()).unwrap();
    let dt = 0.001;

    let mut end_of_delay = 0.0;
    let mut end_of_respond = 0.0;
    for n in 0..3000 {
        let t = n as f64 * dt;
        let reset = seq.reset_signal(t).unwrap();
        acc.step(&Euler, dt as f32, Drive::new(0.0, 1.0, reset));
        if n == 1999 {
            end_of_delay = acc.evidence();
        }
        if n == 2999 {
            end_of_respond = acc.evidence();
        }
    }

    let steady = 0.2 * 0.1;
    assert!(end_of_delay < steady / 5.0);
    assert!((end_of_respond - steady).abs() < steady * 0.05);
}

#[test]
fn full_run_serializes_to_json() {
    let cfg = ModelConfig {
        task: task(13),
        trials: 2,
        probe_every: 50,
        method: StepMethod::Rk4,
        ..ModelConfig::default()
    };
    let mut sim = Simulator::new(cfg).unwrap();
    sim.run().unwrap();
    assert!(sim.outcomes()[0].correct);

    let report = sim.into_report();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcomes"].as_array().unwrap().len(), 2);
    assert_eq!(json["stats"]["trials"], 2);
    assert_eq!(json["config"]["method"], "rk4");
    assert_eq!(json["probes"][0]["phase"], "isi");
}
