//! OneMax fitness: the number of genes set to 1.

use crate::genome::Genome;

/// Counts the genes equal to 1. Pure and O(L).
pub fn fitness(genome: &Genome) -> usize {
    genome.genes().iter().filter(|&&g| g == 1).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitness_counts_ones() {
        let genome = Genome::from_genes(vec![1, 0, 1, 1, 0]).unwrap();
        assert_eq!(fitness(&genome), 3);
    }

    #[test]
    fn test_fitness_bounds() {
        assert_eq!(fitness(&Genome::from_genes(vec![0; 8]).unwrap()), 0);
        assert_eq!(fitness(&Genome::from_genes(vec![1; 8]).unwrap()), 8);
        assert_eq!(fitness(&Genome::from_genes(Vec::new()).unwrap()), 0);
    }
}
