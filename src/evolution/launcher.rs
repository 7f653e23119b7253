use tracing::{debug, info, instrument, warn};

use super::options::{EvolutionConfig, LogLevel};
use crate::{
    error::{GeneticError, Result},
    individual::Individual,
    population::Population,
    rng::RandomNumberGenerator,
    sink::{IndividualRecord, PersistenceSink},
};

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminationReason {
    /// The generation counter went past the configured maximum.
    MaxGenerationsExceeded,
    /// The average fitness reached the desired fitness.
    DesiredFitnessReached,
    /// An individual with every gene set was found while refreshing the
    /// average fitness.
    PerfectIndividualFound(Individual),
}

/// The phase the loop is in.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Initializing,
    Breeding,
    Truncating,
    ConvergenceCheck,
    Terminated(TerminationReason),
}

/// The final report of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOutcome {
    pub reason: TerminationReason,
    /// Number of completed generations.
    pub generation: usize,
    pub average_fitness: f64,
    /// The winner if a perfect individual stopped the run, otherwise the
    /// fittest survivor.
    pub best: Individual,
}

/// Drives a population through breeding, truncation and convergence checks
/// until one of the termination conditions holds.
///
/// # Example
///
/// ```rust
/// use onemax::evolution::{EvolutionConfig, EvolutionLoop, LogLevel};
/// use onemax::rng::RandomNumberGenerator;
/// use onemax::sink::NullSink;
///
/// let config = EvolutionConfig::builder()
///     .population_size(10)
///     .genome_length(16)
///     .mutation_rate(0.05)
///     .desired_fitness(16.0)
///     .max_generations(500)
///     .log_level(LogLevel::None)
///     .build();
///
/// let rng = RandomNumberGenerator::from_seed(7);
/// let mut evolution = EvolutionLoop::new(config, rng, NullSink).unwrap();
/// let outcome = evolution.run().unwrap();
/// assert!(outcome.generation <= 501);
/// ```
#[derive(Debug)]
pub struct EvolutionLoop<S: PersistenceSink> {
    config: EvolutionConfig,
    population: Population,
    rng: RandomNumberGenerator,
    sink: S,
    generation: usize,
    state: LoopState,
}

impl<S: PersistenceSink> EvolutionLoop<S> {
    /// Validates `config` and initializes a random population.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the configuration is invalid.
    pub fn new(config: EvolutionConfig, mut rng: RandomNumberGenerator, sink: S) -> Result<Self> {
        config.validate()?;
        let population = Population::initialize(
            config.get_population_size(),
            config.get_genome_length(),
            &mut rng,
        )?;
        Self::assemble(config, population, rng, sink)
    }

    /// Starts from an existing population instead of a random one.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the configuration is invalid
    /// or does not match the population's size or genome length.
    pub fn with_population(
        config: EvolutionConfig,
        population: Population,
        rng: RandomNumberGenerator,
        sink: S,
    ) -> Result<Self> {
        config.validate()?;
        if population.target_size() != config.get_population_size()
            || population.max_fitness() != config.get_genome_length()
        {
            return Err(GeneticError::Configuration(format!(
                "Population of {} x {} genes does not match the configured {} x {}",
                population.target_size(),
                population.max_fitness(),
                config.get_population_size(),
                config.get_genome_length()
            )));
        }
        Self::assemble(config, population, rng, sink)
    }

    fn assemble(
        config: EvolutionConfig,
        mut population: Population,
        rng: RandomNumberGenerator,
        sink: S,
    ) -> Result<Self> {
        population.refresh_fitness();
        population.refresh_average_fitness(false);
        info!(
            individuals = config.get_population_size(),
            genome_length = config.get_genome_length(),
            desired_fitness = config.get_desired_fitness(),
            "Initialized population"
        );
        Ok(Self {
            config,
            population,
            rng,
            sink,
            generation: 0,
            state: LoopState::Initializing,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs until a termination condition holds. The population as it stood
    /// on entry is checked first, so a run may end without breeding at all.
    ///
    /// # Errors
    ///
    /// Only broken population invariants are reported; sink failures are
    /// logged and ignored.
    pub fn run(&mut self) -> Result<EvolutionOutcome> {
        let mut termination = self.check_convergence();
        while termination.is_none() {
            termination = self.step()?;
        }
        self.outcome()
    }

    /// Refreshes the average fitness and compares the population against the
    /// termination conditions, in order: perfect individual (if enabled),
    /// desired average fitness, generation limit.
    pub fn check_convergence(&mut self) -> Option<TerminationReason> {
        self.state = LoopState::ConvergenceCheck;
        let winner = self
            .population
            .refresh_average_fitness(self.config.get_stop_at_first_perfect());

        let reason = if let Some(winner) = winner {
            info!(winner = %winner, "Perfect individual found");
            Some(TerminationReason::PerfectIndividualFound(winner))
        } else if self.population.average_fitness() >= self.config.get_desired_fitness() {
            info!(
                average_fitness = self.population.average_fitness(),
                generation = self.generation,
                "Desired fitness reached"
            );
            Some(TerminationReason::DesiredFitnessReached)
        } else if self.generation > self.config.get_max_generations() {
            info!(
                generation = self.generation,
                "Reached the maximal amount of generations"
            );
            Some(TerminationReason::MaxGenerationsExceeded)
        } else {
            None
        };

        if let Some(reason) = &reason {
            self.state = LoopState::Terminated(reason.clone());
        }
        reason
    }

    /// Runs one full cycle: breed, truncate, advance the generation, persist
    /// the survivors and check for convergence.
    ///
    /// # Errors
    ///
    /// Returns an error if the run has already terminated or a population
    /// invariant is broken.
    #[instrument(level = "debug", skip(self), fields(generation = self.generation + 1))]
    pub fn step(&mut self) -> Result<Option<TerminationReason>> {
        if let LoopState::Terminated(reason) = &self.state {
            return Err(GeneticError::Other(format!(
                "Evolution already terminated: {:?}",
                reason
            )));
        }
        let before = self.population.average_fitness();

        self.state = LoopState::Breeding;
        self.breed()?;

        self.state = LoopState::Truncating;
        self.population.truncate()?;

        self.generation += 1;
        self.population.refresh_generation(self.generation);
        self.report(before);
        self.persist_population();

        Ok(self.check_convergence())
    }

    /// Breeds `children_per_generation` pairs into the population. Each pair
    /// is crossed over (with probability `crossover_rate`, otherwise the
    /// parents are cloned) and then mutated.
    fn breed(&mut self) -> Result<()> {
        let mutation_rate = self.config.get_mutation_rate();
        let crossover_rate = self.config.get_crossover_rate();

        for _ in 0..self.config.get_children_per_generation() {
            let (mother, father) = self.population.select_parents(&mut self.rng)?;
            let (mut first, mut second) = if self.rng.gen_probability() < crossover_rate {
                Population::crossover(&mother, &father, &mut self.rng)?
            } else {
                (
                    Individual::new(mother.into_genome(), 0),
                    Individual::new(father.into_genome(), 0),
                )
            };
            first.mutate(mutation_rate, &mut self.rng);
            debug!(child = %first, winner = first.is_perfect(), "Mutated child1");
            second.mutate(mutation_rate, &mut self.rng);
            debug!(child = %second, winner = second.is_perfect(), "Mutated child2");
            self.population.append_pair(first, second);
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self), fields(individuals = self.population.len()))]
    fn persist_population(&mut self) {
        for individual in self.population.individuals() {
            let record = IndividualRecord::from(individual);
            if let Err(e) = self.sink.persist(&record) {
                warn!(error = %e, generation = self.generation, "Failed to persist individual");
            }
        }
    }

    fn report(&self, average_before: f64) {
        match self.config.get_log_level() {
            LogLevel::Minimal => info!(
                generation = self.generation,
                fitness_before = average_before,
                fitness_after = self.population.average_fitness(),
                "Generation bred"
            ),
            LogLevel::Verbose => {
                info!(
                    generation = self.generation,
                    fitness_before = average_before,
                    fitness_after = self.population.average_fitness(),
                    "Generation bred"
                );
                for (i, individual) in self.population.individuals().iter().enumerate() {
                    info!(generation = self.generation, "{} {}", i, individual);
                }
            }
            LogLevel::None => {}
        }
    }

    fn outcome(&self) -> Result<EvolutionOutcome> {
        let reason = match &self.state {
            LoopState::Terminated(reason) => reason.clone(),
            state => {
                return Err(GeneticError::Other(format!(
                    "Evolution has not terminated, current state: {:?}",
                    state
                )))
            }
        };
        let best = match &reason {
            TerminationReason::PerfectIndividualFound(winner) => winner.clone(),
            _ => self.population.fittest()?.clone(),
        };
        Ok(EvolutionOutcome {
            reason,
            generation: self.generation,
            average_fitness: self.population.average_fitness(),
            best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NullSink;

    fn config(children_per_generation: usize) -> EvolutionConfig {
        EvolutionConfig::builder()
            .population_size(6)
            .genome_length(12)
            .mutation_rate(0.1)
            .children_per_generation(children_per_generation)
            .log_level(LogLevel::None)
            .build()
    }

    #[test]
    fn test_breed_adds_two_children_per_iteration() {
        for children in [1, 3, 7] {
            let mut evolution = EvolutionLoop::new(
                config(children),
                RandomNumberGenerator::from_seed(children as u64),
                NullSink,
            )
            .unwrap();
            evolution.breed().unwrap();
            assert_eq!(evolution.population().len(), 6 + 2 * children);
            assert!(evolution.population().is_consistent());
            assert!(evolution
                .population()
                .individuals()
                .iter()
                .all(|ind| ind.genome().len() == 12));

            evolution.population.truncate().unwrap();
            assert_eq!(evolution.population().len(), 6);
        }
    }

    #[test]
    fn test_breed_without_crossover_clones_parents() {
        let config = EvolutionConfig::builder()
            .population_size(4)
            .genome_length(8)
            .mutation_rate(0.0)
            .crossover_rate(0.0)
            .children_per_generation(2)
            .log_level(LogLevel::None)
            .build();
        let mut evolution =
            EvolutionLoop::new(config, RandomNumberGenerator::from_seed(9), NullSink).unwrap();
        let parents: Vec<Individual> = evolution.population().individuals().to_vec();
        evolution.breed().unwrap();
        assert_eq!(evolution.population().len(), 8);
        for child in &evolution.population().individuals()[4..] {
            assert!(parents.contains(child));
            assert_eq!(child.generation(), 0);
        }
    }
}
