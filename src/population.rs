//! # Population
//!
//! An ordered collection of [`Individual`]s with a fixed target size. The
//! population owns the genetic operators that act on more than one
//! individual: parent selection, single-point crossover, survival truncation
//! and the aggregate statistics used for convergence checks.
//!
//! Between [`Population::initialize`] and the next call to
//! [`Population::truncate`] the population may grow beyond its target size;
//! truncation always restores it to exactly the target size.
//!
//! ## Example
//!
//! ```rust
//! use onemax::population::Population;
//! use onemax::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let mut population = Population::initialize(10, 16, &mut rng).unwrap();
//!
//! let (mother, father) = population.select_parents(&mut rng).unwrap();
//! let (mut first, mut second) = Population::crossover(&mother, &father, &mut rng).unwrap();
//! first.mutate(0.05, &mut rng);
//! second.mutate(0.05, &mut rng);
//! population.append_pair(first, second);
//! assert_eq!(population.len(), 12);
//!
//! population.truncate().unwrap();
//! assert_eq!(population.len(), 10);
//! ```

use tracing::{debug, instrument};

use crate::{
    error::{GeneticError, OptionExt, Result},
    fitness::fitness,
    individual::Individual,
    rng::RandomNumberGenerator,
};

/// A population of fixed-length binary individuals.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
    target_size: usize,
    max_fitness: usize,
    average_fitness: f64,
}

impl Population {
    /// Creates `size` individuals with random genomes of `genome_length` genes,
    /// all tagged with generation 0.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `size` or `genome_length` is zero.
    pub fn initialize(
        size: usize,
        genome_length: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self> {
        if size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if genome_length == 0 {
            return Err(GeneticError::Configuration(
                "Genome length cannot be zero".to_string(),
            ));
        }

        let individuals = (0..size)
            .map(|_| Individual::random(genome_length, rng))
            .collect();
        let mut population = Self {
            individuals,
            target_size: size,
            max_fitness: genome_length,
            average_fitness: 0.0,
        };
        population.refresh_average_fitness(false);
        Ok(population)
    }

    /// Builds a population from existing individuals. The maximum attainable
    /// fitness is the genome length shared by all of them.
    ///
    /// # Errors
    ///
    /// - `EmptyPopulation` if `individuals` is empty
    /// - `Configuration` if `target_size` is zero
    /// - `InvariantViolation` if the genomes differ in length
    pub fn from_individuals(individuals: Vec<Individual>, target_size: usize) -> Result<Self> {
        if target_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        let genome_length = individuals
            .first()
            .map(|ind| ind.genome().len())
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        if individuals
            .iter()
            .any(|ind| ind.genome().len() != genome_length)
        {
            return Err(GeneticError::InvariantViolation(
                "All genomes in a population must have the same length".to_string(),
            ));
        }

        let mut population = Self {
            individuals,
            target_size,
            max_fitness: genome_length,
            average_fitness: 0.0,
        };
        population.refresh_average_fitness(false);
        Ok(population)
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// The best attainable fitness, equal to the genome length.
    pub fn max_fitness(&self) -> usize {
        self.max_fitness
    }

    /// The cached average fitness as of the last refresh.
    pub fn average_fitness(&self) -> f64 {
        self.average_fitness
    }

    /// The individual with the highest cached fitness. On ties the one
    /// nearest the end wins, matching what truncation prefers to keep.
    pub fn fittest(&self) -> Result<&Individual> {
        self.individuals
            .iter()
            .max_by_key(|ind| ind.fitness())
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
    }

    pub fn best_fitness(&self) -> Option<usize> {
        self.individuals.iter().map(Individual::fitness).max()
    }

    /// Picks two distinct members uniformly at random and returns copies.
    ///
    /// The second draw is repeated until it differs from the first.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the population has fewer than 2 members.
    pub fn select_parents(
        &self,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Individual, Individual)> {
        let len = self.individuals.len();
        if len < 2 {
            return Err(GeneticError::InvariantViolation(format!(
                "Parent selection needs at least 2 individuals, found {}",
                len
            )));
        }

        let mother = rng.gen_index(len);
        let mut father = rng.gen_index(len);
        while father == mother {
            father = rng.gen_index(len);
        }
        debug!(mother, father, "Selected parents");

        Ok((
            self.individuals[mother].clone(),
            self.individuals[father].clone(),
        ))
    }

    /// Single-point crossover at a point drawn uniformly from
    /// `[0, genome length)`. See [`Population::crossover_at`].
    pub fn crossover(
        parent_a: &Individual,
        parent_b: &Individual,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Individual, Individual)> {
        let len = parent_a.genome().len();
        if len == 0 {
            return Err(GeneticError::InvariantViolation(
                "Cannot cross over empty genomes".to_string(),
            ));
        }
        let point = rng.gen_index(len);
        Self::crossover_at(parent_a, parent_b, point)
    }

    /// Single-point crossover at `point`:
    ///
    /// - first child: `a[..point] + b[point..]`
    /// - second child: `b[..point] + a[point..]`
    ///
    /// Both children have fresh fitness and generation 0. The parents are not
    /// modified.
    ///
    /// # Errors
    ///
    /// - `InvariantViolation` if the parents' genome lengths differ
    /// - `OutOfBounds` if `point` exceeds the genome length
    #[instrument(level = "debug", skip(parent_a, parent_b), fields(genome_length = parent_a.genome().len(), cut_point = point))]
    pub fn crossover_at(
        parent_a: &Individual,
        parent_b: &Individual,
        point: usize,
    ) -> Result<(Individual, Individual)> {
        let (a, b) = (parent_a.genome(), parent_b.genome());
        if a.len() != b.len() {
            return Err(GeneticError::InvariantViolation(format!(
                "Crossover parents differ in genome length: {} vs {}",
                a.len(),
                b.len()
            )));
        }
        if point > a.len() {
            return Err(GeneticError::OutOfBounds(format!(
                "crossover point {} in a genome of length {}",
                point,
                a.len()
            )));
        }

        let first = Individual::new(a.splice(b, point), 0);
        let second = Individual::new(b.splice(a, point), 0);
        debug!(mother = %parent_a, father = %parent_b, "Parents");
        debug!(child1 = %first, child2 = %second, "Children");
        Ok((first, second))
    }

    /// Adds an individual beyond the target size. Only used while breeding.
    pub fn append(&mut self, individual: Individual) {
        self.individuals.push(individual);
    }

    pub fn append_pair(&mut self, first: Individual, second: Individual) {
        self.individuals.push(first);
        self.individuals.push(second);
    }

    /// Survival selection: sorts all individuals by fitness ascending with a
    /// stable sort and keeps the last `target_size`. Among equal fitness the
    /// individuals later in the pre-sort order are kept. Refreshes the
    /// average fitness afterwards.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if there are fewer than `target_size`
    /// individuals.
    #[instrument(level = "debug", skip(self), fields(size = self.individuals.len(), target_size = self.target_size))]
    pub fn truncate(&mut self) -> Result<()> {
        let len = self.individuals.len();
        if len < self.target_size {
            return Err(GeneticError::InvariantViolation(format!(
                "Cannot truncate {} individuals to a target size of {}",
                len, self.target_size
            )));
        }

        self.individuals.sort_by_key(Individual::fitness);
        self.individuals.drain(..len - self.target_size);
        self.refresh_average_fitness(false);
        Ok(())
    }

    /// Recomputes every individual's fitness and the average over the
    /// population.
    ///
    /// With `stop_at_first_perfect` set, the scan stops at the first
    /// individual whose fitness equals the maximum and returns a copy of it.
    /// The cached average is left untouched in that case.
    pub fn refresh_average_fitness(&mut self, stop_at_first_perfect: bool) -> Option<Individual> {
        if self.individuals.is_empty() {
            self.average_fitness = 0.0;
            return None;
        }

        let mut total = 0usize;
        for individual in self.individuals.iter_mut() {
            individual.refresh_fitness();
            if stop_at_first_perfect && individual.fitness() == self.max_fitness {
                return Some(individual.clone());
            }
            total += individual.fitness();
        }
        self.average_fitness = total as f64 / self.individuals.len() as f64;
        None
    }

    /// Recomputes and overwrites every cached fitness.
    pub fn refresh_fitness(&mut self) {
        self.individuals
            .iter_mut()
            .for_each(Individual::refresh_fitness);
    }

    /// Stamps every individual with `generation`.
    pub fn refresh_generation(&mut self, generation: usize) {
        self.individuals
            .iter_mut()
            .for_each(|ind| ind.set_generation(generation));
    }

    /// Index of the first individual whose genome equals `individual`'s.
    ///
    /// This is a linear scan. Duplicate genomes resolve to the first match.
    pub fn position_of(&self, individual: &Individual) -> Option<usize> {
        self.individuals.iter().position(|ind| ind == individual)
    }

    /// Replaces the individual at `index`.
    pub fn set_individual(&mut self, index: usize, individual: Individual) -> Result<()> {
        let len = self.individuals.len();
        let slot = self.individuals.get_mut(index).ok_or_else(|| {
            GeneticError::OutOfBounds(format!("index {} in a population of {}", index, len))
        })?;
        *slot = individual;
        Ok(())
    }

    /// Removes and returns the individual at `index`.
    pub fn remove_individual(&mut self, index: usize) -> Result<Individual> {
        if index >= self.individuals.len() {
            return Err(GeneticError::OutOfBounds(format!(
                "index {} in a population of {}",
                index,
                self.individuals.len()
            )));
        }
        Ok(self.individuals.remove(index))
    }

    /// Replaces two members by value: `old_a` and `old_b` are located with
    /// [`Population::position_of`] and overwritten with `new_a` and `new_b`.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if either is missing. The population is
    /// left unchanged in that case.
    pub fn replace_individuals(
        &mut self,
        old_a: &Individual,
        new_a: Individual,
        old_b: &Individual,
        new_b: Individual,
    ) -> Result<()> {
        let missing = |ind: &Individual| {
            GeneticError::InvariantViolation(format!(
                "individual {} is not in the population",
                ind
            ))
        };
        let pos_a = self.position_of(old_a).ok_or_else(|| missing(old_a))?;
        let pos_b = self.position_of(old_b).ok_or_else(|| missing(old_b))?;

        self.set_individual(pos_a, new_a)?;
        self.set_individual(pos_b, new_b)
    }

    /// Whether every cached fitness matches its genome.
    pub fn is_consistent(&self) -> bool {
        self.individuals
            .iter()
            .all(|ind| ind.fitness() == fitness(ind.genome()))
    }
}
