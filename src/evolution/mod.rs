pub mod launcher;
pub mod options;

pub use launcher::{EvolutionLoop, EvolutionOutcome, LoopState, TerminationReason};
pub use options::{EvolutionConfig, EvolutionConfigBuilder, LogLevel, SinkConfig};
