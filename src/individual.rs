//! # Individual
//!
//! An `Individual` pairs a [`Genome`] with its cached fitness and the
//! generation in which it was last refreshed.
//!
//! ## Example
//!
//! ```rust
//! use onemax::genome::Genome;
//! use onemax::individual::Individual;
//! use onemax::rng::RandomNumberGenerator;
//!
//! let genome = Genome::from_genes(vec![1, 0, 1, 1]).unwrap();
//! let mut individual = Individual::new(genome, 0);
//! assert_eq!(individual.fitness(), 3);
//!
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! individual.mutate(1.0, &mut rng);
//! assert_eq!(individual.genome().genes(), &[0, 1, 0, 0]);
//! assert_eq!(individual.fitness(), 1);
//! ```

use std::fmt;

use crate::{fitness::fitness, genome::Genome, rng::RandomNumberGenerator};

/// A candidate solution with its cached fitness and generation tag.
///
/// Two individuals compare equal when their genomes hold the same genes;
/// fitness and generation are ignored. This is the equality used by
/// [`Population::position_of`](crate::population::Population::position_of).
#[derive(Debug, Clone)]
pub struct Individual {
    genome: Genome,
    fitness: usize,
    generation: usize,
}

impl Individual {
    /// Creates an individual, computing its fitness eagerly.
    pub fn new(genome: Genome, generation: usize) -> Self {
        let fitness = fitness(&genome);
        Self {
            genome,
            fitness,
            generation,
        }
    }

    /// Creates a generation-0 individual with a random genome of `length` genes.
    pub fn random(length: usize, rng: &mut RandomNumberGenerator) -> Self {
        Self::new(Genome::random(length, rng), 0)
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn fitness(&self) -> usize {
        self.fitness
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// Whether every gene is 1.
    pub fn is_perfect(&self) -> bool {
        self.fitness == self.genome.len()
    }

    /// Flips every gene independently with probability `mutation_rate`, then
    /// recomputes the cached fitness.
    ///
    /// A rate of 0.0 never flips a gene and a rate of 1.0 flips every gene.
    pub fn mutate(&mut self, mutation_rate: f64, rng: &mut RandomNumberGenerator) {
        self.genome.flip_where(|| rng.gen_probability() < mutation_rate);
        self.refresh_fitness();
    }

    /// Recomputes the cached fitness from the genome.
    pub fn refresh_fitness(&mut self) {
        self.fitness = fitness(&self.genome);
    }

    pub fn into_genome(self) -> Genome {
        self.genome
    }
}

impl PartialEq for Individual {
    fn eq(&self, other: &Self) -> bool {
        self.genome == other.genome
    }
}

impl Eq for Individual {}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fitness={} generation={}",
            self.genome, self.fitness, self.generation
        )
    }
}
