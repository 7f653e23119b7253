pub mod error;
pub mod evolution;
pub mod fitness;
pub mod genome;
pub mod individual;
pub mod population;
pub mod rng;
pub mod sink;

// Re-export commonly used types for convenience
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{EvolutionConfig, EvolutionLoop, EvolutionOutcome, TerminationReason};
pub use genome::Genome;
pub use individual::Individual;
pub use population::Population;
pub use rng::RandomNumberGenerator;
