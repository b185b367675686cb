use crate::engines::generation::genome::{Gene, Symbol, ALPHABET, GENE_SIZE};
use rand::Rng;

pub const DEFAULT_MUTATION_RATE: f64 = 0.075;

/// Single-point crossover: `a[..point] ++ b[point..]`, point uniform in [0, 12)
pub fn crossover<R: Rng>(parent1: &Gene, parent2: &Gene, rng: &mut R) -> Gene {
    let point = rng.gen_range(0..GENE_SIZE);
    crossover_at(parent1, parent2, point)
}

pub fn crossover_at(parent1: &Gene, parent2: &Gene, point: usize) -> Gene {
    let point = point.min(GENE_SIZE);
    let mut child = *parent1.symbols();
    child[point..].copy_from_slice(&parent2.symbols()[point..]);
    Gene::from_symbols(child)
}

/// Mutation: each locus independently reflects within the alphabet
pub fn mutate<R: Rng>(gene: &Gene, mutation_rate: f64, rng: &mut R) -> Gene {
    let mut symbols = *gene.symbols();
    for symbol in symbols.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            *symbol = symbol.reflect();
        }
    }
    Gene::from_symbols(symbols)
}

/// Offspring of two parents: crossover, then mutation
pub fn new_gene<R: Rng>(parent1: &Gene, parent2: &Gene, mutation_rate: f64, rng: &mut R) -> Gene {
    let child = crossover(parent1, parent2, rng);
    mutate(&child, mutation_rate, rng)
}

/// Generate random gene, passed through the same mutation step as offspring
pub fn random_gene<R: Rng>(mutation_rate: f64, rng: &mut R) -> Gene {
    let mut symbols = [Symbol::S; GENE_SIZE];
    for symbol in symbols.iter_mut() {
        *symbol = ALPHABET[rng.gen_range(0..ALPHABET.len())];
    }
    mutate(&Gene::from_symbols(symbols), mutation_rate, rng)
}
