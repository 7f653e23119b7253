//! # EvolutionConfig
//!
//! The configuration bundle consumed by the [`EvolutionLoop`] when it starts.
//! It covers the genetic parameters (rates, sizes, thresholds), the
//! per-generation reporting level and the connection parameters of the
//! persistence sink.
//!
//! ## Example
//!
//! ```rust
//! use onemax::evolution::options::{EvolutionConfig, LogLevel};
//!
//! let config = EvolutionConfig::builder()
//!     .population_size(20)
//!     .genome_length(64)
//!     .mutation_rate(0.02)
//!     .desired_fitness(64.0)
//!     .log_level(LogLevel::None)
//!     .build();
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.get_genome_length(), 64);
//!
//! let default_config = EvolutionConfig::default();
//! assert_eq!(default_config.get_population_size(), 10);
//! ```
//!
//! [`EvolutionLoop`]: crate::evolution::EvolutionLoop

use serde::Deserialize;

use crate::error::{GeneticError, Result};

/// How much the loop reports after every generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Generation summary plus every individual.
    Verbose,
    /// Generation number and average fitness.
    Minimal,
    None,
}

/// Where surviving individuals are sent after each generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub host: String,
    pub port: u16,
    /// Name of the index the records belong to.
    pub index: String,
    /// When false the binary discards records instead of sending them.
    pub enabled: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9200,
            index: "logstash-ec".to_string(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Probability that a selected pair is recombined rather than cloned.
    crossover_rate: f64,
    /// Per-gene flip probability applied to every child.
    mutation_rate: f64,
    population_size: usize,
    genome_length: usize,
    max_generations: usize,
    /// Breeding iterations per generation; each one yields two children.
    children_per_generation: usize,
    /// Average fitness, on the raw popcount scale, at which the run stops.
    desired_fitness: f64,
    stop_at_first_perfect: bool,
    log_level: LogLevel,
    sink: SinkConfig,
}

impl EvolutionConfig {
    /// Returns a builder for creating an `EvolutionConfig` instance.
    pub fn builder() -> EvolutionConfigBuilder {
        EvolutionConfigBuilder::default()
    }

    /// Checks every parameter combination the loop relies on.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` when:
    /// - the population has fewer than 2 individuals
    /// - the genome length is zero
    /// - no children are bred per generation
    /// - a rate is not a finite value in `[0, 1]`
    /// - the desired fitness is negative or not finite
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(GeneticError::Configuration(format!(
                "Population size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.genome_length == 0 {
            return Err(GeneticError::Configuration(
                "Genome length cannot be zero".to_string(),
            ));
        }
        if self.children_per_generation == 0 {
            return Err(GeneticError::Configuration(
                "Number of children per generation cannot be zero".to_string(),
            ));
        }
        check_rate("Mutation rate", self.mutation_rate)?;
        check_rate("Crossover rate", self.crossover_rate)?;
        if !self.desired_fitness.is_finite() || self.desired_fitness < 0.0 {
            return Err(GeneticError::Configuration(format!(
                "Desired fitness must be a non-negative number, got {}",
                self.desired_fitness
            )));
        }
        Ok(())
    }

    pub fn get_crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_genome_length(&self) -> usize {
        self.genome_length
    }

    pub fn get_max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn get_children_per_generation(&self) -> usize {
        self.children_per_generation
    }

    pub fn get_desired_fitness(&self) -> f64 {
        self.desired_fitness
    }

    pub fn get_stop_at_first_perfect(&self) -> bool {
        self.stop_at_first_perfect
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn get_sink(&self) -> &SinkConfig {
        &self.sink
    }

    pub fn set_mutation_rate(&mut self, mutation_rate: f64) {
        self.mutation_rate = mutation_rate;
    }

    pub fn set_max_generations(&mut self, max_generations: usize) {
        self.max_generations = max_generations;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }
}

fn check_rate(name: &str, rate: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(GeneticError::Configuration(format!(
            "{} must be within [0, 1], got {}",
            name, rate
        )));
    }
    Ok(())
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            crossover_rate: 1.0,
            mutation_rate: 0.1,
            population_size: 10,
            genome_length: 32,
            max_generations: 200_000,
            children_per_generation: 10,
            desired_fitness: 32.0,
            stop_at_first_perfect: true,
            log_level: LogLevel::Minimal,
            sink: SinkConfig::default(),
        }
    }
}

/// Builder for `EvolutionConfig`.
///
/// Unset values fall back to `EvolutionConfig::default()`.
#[derive(Debug, Clone, Default)]
pub struct EvolutionConfigBuilder {
    crossover_rate: Option<f64>,
    mutation_rate: Option<f64>,
    population_size: Option<usize>,
    genome_length: Option<usize>,
    max_generations: Option<usize>,
    children_per_generation: Option<usize>,
    desired_fitness: Option<f64>,
    stop_at_first_perfect: Option<bool>,
    log_level: Option<LogLevel>,
    sink: Option<SinkConfig>,
}

impl EvolutionConfigBuilder {
    pub fn crossover_rate(mut self, value: f64) -> Self {
        self.crossover_rate = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn genome_length(mut self, value: usize) -> Self {
        self.genome_length = Some(value);
        self
    }

    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(value);
        self
    }

    pub fn children_per_generation(mut self, value: usize) -> Self {
        self.children_per_generation = Some(value);
        self
    }

    pub fn desired_fitness(mut self, value: f64) -> Self {
        self.desired_fitness = Some(value);
        self
    }

    pub fn stop_at_first_perfect(mut self, value: bool) -> Self {
        self.stop_at_first_perfect = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn sink(mut self, value: SinkConfig) -> Self {
        self.sink = Some(value);
        self
    }

    /// Builds the `EvolutionConfig` instance. Validation happens when the
    /// config is handed to the loop, or through `EvolutionConfig::validate`.
    pub fn build(self) -> EvolutionConfig {
        let defaults = EvolutionConfig::default();
        EvolutionConfig {
            crossover_rate: self.crossover_rate.unwrap_or(defaults.crossover_rate),
            mutation_rate: self.mutation_rate.unwrap_or(defaults.mutation_rate),
            population_size: self.population_size.unwrap_or(defaults.population_size),
            genome_length: self.genome_length.unwrap_or(defaults.genome_length),
            max_generations: self.max_generations.unwrap_or(defaults.max_generations),
            children_per_generation: self
                .children_per_generation
                .unwrap_or(defaults.children_per_generation),
            desired_fitness: self.desired_fitness.unwrap_or(defaults.desired_fitness),
            stop_at_first_perfect: self
                .stop_at_first_perfect
                .unwrap_or(defaults.stop_at_first_perfect),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            sink: self.sink.unwrap_or(defaults.sink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.get_genome_length(), 32);
        assert_eq!(config.get_max_generations(), 200_000);
        assert_eq!(config.get_sink().port, 9200);
        assert_eq!(config.get_sink().index, "logstash-ec");
    }

    #[test]
    fn test_builder_overrides() {
        let config = EvolutionConfig::builder()
            .population_size(4)
            .children_per_generation(1)
            .stop_at_first_perfect(false)
            .build();
        assert_eq!(config.get_population_size(), 4);
        assert_eq!(config.get_children_per_generation(), 1);
        assert!(!config.get_stop_at_first_perfect());
        assert!((config.get_mutation_rate() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_configurations() {
        let invalid = [
            EvolutionConfig::builder().population_size(0).build(),
            EvolutionConfig::builder().population_size(1).build(),
            EvolutionConfig::builder().genome_length(0).build(),
            EvolutionConfig::builder().children_per_generation(0).build(),
            EvolutionConfig::builder().mutation_rate(1.5).build(),
            EvolutionConfig::builder().mutation_rate(-0.1).build(),
            EvolutionConfig::builder().mutation_rate(f64::NAN).build(),
            EvolutionConfig::builder().crossover_rate(2.0).build(),
            EvolutionConfig::builder().desired_fitness(-1.0).build(),
            EvolutionConfig::builder().desired_fitness(f64::INFINITY).build(),
        ];
        for config in invalid {
            assert!(
                matches!(config.validate(), Err(GeneticError::Configuration(_))),
                "expected {:?} to be rejected",
                config
            );
        }
    }

    #[test]
    fn test_rate_boundaries_are_valid() {
        let config = EvolutionConfig::builder()
            .mutation_rate(0.0)
            .crossover_rate(1.0)
            .build();
        assert!(config.validate().is_ok());
        let config = EvolutionConfig::builder().mutation_rate(1.0).build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_setters() {
        let mut config = EvolutionConfig::default();
        config.set_max_generations(3);
        config.set_mutation_rate(0.5);
        config.set_log_level(LogLevel::Verbose);
        assert_eq!(config.get_max_generations(), 3);
        assert!((config.get_mutation_rate() - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.get_log_level(), LogLevel::Verbose);
    }
}
