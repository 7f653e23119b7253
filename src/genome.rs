//! # Genome
//!
//! A fixed-length sequence of binary genes. The length is set on creation and
//! never changes; the only in-place modification is flipping a single gene.

use std::fmt;

use crate::{
    error::{GeneticError, Result},
    rng::RandomNumberGenerator,
};

/// A fixed-length binary genome. Every gene is either 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genome {
    genes: Vec<u8>,
}

impl Genome {
    /// Creates a genome of `length` genes, each independently 0 or 1 with
    /// equal probability.
    pub fn random(length: usize, rng: &mut RandomNumberGenerator) -> Self {
        Self {
            genes: (0..length).map(|_| rng.gen_bit()).collect(),
        }
    }

    /// Creates a genome from explicit gene values.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidGene` if any value is not 0 or 1.
    pub fn from_genes(genes: Vec<u8>) -> Result<Self> {
        if let Some(&bad) = genes.iter().find(|&&g| g > 1) {
            return Err(GeneticError::InvalidGene(bad));
        }
        Ok(Self { genes })
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[u8] {
        &self.genes
    }

    /// Returns the gene at `position`, if any.
    pub fn gene(&self, position: usize) -> Option<u8> {
        self.genes.get(position).copied()
    }

    /// Flips the gene at `position` from 0 to 1 or from 1 to 0.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::OutOfBounds` if `position >= len()`.
    pub fn flip_bit(&mut self, position: usize) -> Result<()> {
        let len = self.genes.len();
        let gene = self.genes.get_mut(position).ok_or_else(|| {
            GeneticError::OutOfBounds(format!(
                "gene position {} in a genome of length {}",
                position, len
            ))
        })?;
        *gene = 1 - *gene;
        Ok(())
    }

    /// Flips every gene for which `should_flip` returns true, visiting the
    /// genes in order.
    pub(crate) fn flip_where<F>(&mut self, mut should_flip: F)
    where
        F: FnMut() -> bool,
    {
        for gene in self.genes.iter_mut() {
            if should_flip() {
                *gene = 1 - *gene;
            }
        }
    }

    /// Builds `self[0..point] + other[point..]`.
    ///
    /// Callers guarantee equal lengths and `point <= len()`.
    pub(crate) fn splice(&self, other: &Genome, point: usize) -> Genome {
        let mut genes = Vec::with_capacity(self.genes.len());
        genes.extend_from_slice(&self.genes[..point]);
        genes.extend_from_slice(&other.genes[point..]);
        Genome { genes }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            write!(f, "{}", gene)?;
        }
        Ok(())
    }
}
