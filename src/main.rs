//! Command-line driver for the delayed match-to-sample model.
//!
//! Examples:
//!   dmts run
//!   dmts run --seed 7 --trials 20 --similarity 0.3
//!   dmts run --config model.json --trace run.json
//!   dmts scenario
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` to see trial generation.

use std::path::PathBuf;
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dmts::config::{ModelConfig, TaskConfig};
use dmts::model::simulator::Simulator;
use dmts::observer::SimulatorAdapter;
use dmts::sequencer::{Side, TrialSequencer};

fn usage() -> ! {
    eprintln!("dmts (delayed match-to-sample trial engine + evidence accumulator)");
    eprintln!("Usage: dmts <command> [options]\n");
    eprintln!("Commands:");
    eprintln!("  run                         Simulate trials and report outcomes");
    eprintln!("  scenario                    Print the phase timeline for the default task");
    eprintln!("  help                        Show this message\n");
    eprintln!("Options for `run`:");
    eprintln!("  --config <path.json>        Load a ModelConfig (missing fields use defaults)");
    eprintln!("  --seed <u64>                Seed the trial stream (default: nondeterministic)");
    eprintln!("  --trials <n>                Number of trials to complete");
    eprintln!("  --similarity <0..1>         Target/foil similarity");
    eprintln!("  --trace <path.json>         Write outcomes, probes and stats as JSON");
    process::exit(1);
}

#[derive(Debug, Default)]
struct RunArgs {
    config: Option<PathBuf>,
    seed: Option<u64>,
    trials: Option<usize>,
    similarity: Option<f32>,
    trace: Option<PathBuf>,
}

fn parse_run_args(args: &[String]) -> Result<RunArgs, String> {
    let mut out = RunArgs::default();
    let mut it = args.iter();
    while let Some(flag) = it.next() {
        let mut value = || {
            it.next()
                .cloned()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match flag.as_str() {
            "--config" => out.config = Some(PathBuf::from(value()?)),
            "--trace" => out.trace = Some(PathBuf::from(value()?)),
            "--seed" => {
                out.seed = Some(value()?.parse().map_err(|e| format!("--seed: {e}"))?)
            }
            "--trials" => {
                out.trials = Some(value()?.parse().map_err(|e| format!("--trials: {e}"))?)
            }
            "--similarity" => {
                out.similarity = Some(
                    value()?
                        .parse()
                        .map_err(|e| format!("--similarity: {e}"))?,
                )
            }
            other => return Err(format!("unknown option: {other}")),
        }
    }
    Ok(out)
}

fn build_config(args: &RunArgs) -> dmts::Result<ModelConfig> {
    let mut cfg = match &args.config {
        Some(path) => ModelConfig::load(path)?,
        None => ModelConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.task.seed = Some(seed);
    }
    if let Some(trials) = args.trials {
        cfg.trials = trials;
    }
    if let Some(similarity) = args.similarity {
        cfg.task.similarity = similarity;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(args: RunArgs) -> dmts::Result<()> {
    let cfg = build_config(&args)?;
    info!(
        trials = cfg.trials,
        dims = cfg.task.dims,
        similarity = cfg.task.similarity,
        seed = ?cfg.task.seed,
        "starting run"
    );

    let mut sim = Simulator::new(cfg)?;
    sim.run()?;

    for o in sim.outcomes() {
        println!(
            "trial={:<4} shown={} decided={} evidence={:+.4} correct={} memory~{}",
            o.trial,
            o.shown.label(),
            o.decided.map(|s| s.label()).unwrap_or("-"),
            o.evidence,
            o.correct,
            o.memory_readout.as_deref().unwrap_or("-"),
        );
    }

    let snap = SimulatorAdapter::new(&sim).snapshot();
    let stats = sim.stats();
    println!(
        "trials={} correct={} incorrect={} undecided={} acc={:.1}% last100={:.1}% shownA={:.1}% shownB={:.1}% mean|E|={:.3} t={:.3}s |memory|={:.3}",
        stats.trials,
        stats.correct,
        stats.incorrect,
        stats.undecided,
        stats.accuracy() * 100.0,
        stats.last_100_rate() * 100.0,
        stats.accuracy_by_side(Side::A) * 100.0,
        stats.accuracy_by_side(Side::B) * 100.0,
        stats.mean_abs_evidence(),
        snap.t,
        snap.memory_norm,
    );

    if let Some(path) = args.trace {
        let report = sim.into_report();
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)?;
        info!(path = %path.display(), "trace written");
    }
    Ok(())
}

fn scenario() -> dmts::Result<()> {
    let seq = TrialSequencer::new(TaskConfig {
        seed: Some(0),
        ..TaskConfig::default()
    })?;
    println!("trial_duration={}", seq.trial_duration());
    for t in [0.0, 0.5, 0.6, 1.0, 2.0, 2.6, 2.999, 3.0, 3.6] {
        let (phase, index) = seq.resolve(t)?;
        println!("t={t:<6} trial={index} phase={}", phase.label());
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(cmd) = args.first() else {
        usage();
    };

    let result = match cmd.as_str() {
        "run" => match parse_run_args(&args[1..]) {
            Ok(a) => run(a),
            Err(msg) => {
                eprintln!("{msg}");
                usage();
            }
        },
        "scenario" => scenario(),
        "help" | "--help" | "-h" => usage(),
        other => {
            eprintln!("Unknown command: {other}");
            usage();
        }
    };

    if let Err(e) = result {
        error!("{e}");
        process::exit(2);
    }
}
