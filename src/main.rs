//! Runs the OneMax genetic algorithm.
//!
//! Usage: `onemax [config.toml]`. Without an argument the defaults are used.
//! Log output is controlled through `RUST_LOG` (default `info`).

use std::fs;
use std::process::ExitCode;

use onemax::{
    error::{Result, ResultExt},
    evolution::{EvolutionConfig, EvolutionLoop, EvolutionOutcome},
    rng::RandomNumberGenerator,
    sink::{NullSink, PersistenceSink, TcpSink},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn load_config() -> Result<EvolutionConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let contents = fs::read_to_string(&path).context(format!("Failed to read {}", path))?;
            toml::from_str(&contents).context(format!("Failed to parse {}", path))
        }
        None => Ok(EvolutionConfig::default()),
    }
}

fn evolve<S: PersistenceSink>(config: EvolutionConfig, sink: S) -> Result<EvolutionOutcome> {
    let mut evolution = EvolutionLoop::new(config, RandomNumberGenerator::new(), sink)?;
    let outcome = evolution.run()?;
    for (i, individual) in evolution.population().individuals().iter().enumerate() {
        info!("{} {}", i, individual);
    }
    Ok(outcome)
}

fn run() -> Result<EvolutionOutcome> {
    let config = load_config()?;
    if config.get_sink().enabled {
        let sink = TcpSink::from_config(config.get_sink());
        evolve(config, sink)
    } else {
        evolve(config, NullSink)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(outcome) => {
            info!(
                generation = outcome.generation,
                average_fitness = outcome.average_fitness,
                reason = ?outcome.reason,
                best = %outcome.best,
                "Result after {} generations",
                outcome.generation
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Evolution failed");
            ExitCode::FAILURE
        }
    }
}
