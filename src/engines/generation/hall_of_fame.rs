use crate::engines::generation::genome::Gene;
use crate::engines::generation::population::Individual;
use crate::types::ProfitReport;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EliteIndividual {
    pub individual: Individual,
    pub fitness: f64,
    pub report: Option<ProfitReport>, // None when the backtest failed
}

/// Best individuals seen so far, one entry per distinct gene.
///
/// Entries are kept sorted by fitness (descending). The sort is stable, so
/// among equal fitness the earliest evaluated individual ranks first.
pub struct HallOfFame {
    entries: Vec<EliteIndividual>,
    max_size: usize,
    seen_genes: HashSet<Gene>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size: max_size.max(1),
            seen_genes: HashSet::new(),
        }
    }

    /// Attempt to add an individual to the Hall of Fame
    pub fn try_add(&mut self, elite: EliteIndividual) -> bool {
        // Deduplication check
        if self.seen_genes.contains(&elite.individual.gene) {
            return false;
        }

        self.seen_genes.insert(elite.individual.gene);
        self.entries.push(elite);

        self.entries.sort_by(|a, b| {
            b.fitness.partial_cmp(&a.fitness).unwrap_or(std::cmp::Ordering::Equal)
        });

        // Trim to max size
        while self.entries.len() > self.max_size {
            if let Some(removed) = self.entries.pop() {
                self.seen_genes.remove(&removed.individual.gene);
            }
        }

        true
    }

    pub fn best(&self) -> Option<&EliteIndividual> {
        self.entries.first()
    }

    pub fn get_all(&self) -> &[EliteIndividual] {
        &self.entries
    }

    pub fn get_top_n(&self, n: usize) -> &[EliteIndividual] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elite(id: u64, gene: &str, fitness: f64) -> EliteIndividual {
        EliteIndividual {
            individual: Individual::seed(id, gene.parse().unwrap()),
            fitness,
            report: None,
        }
    }

    #[test]
    fn test_ties_keep_evaluation_order() {
        let mut hof = HallOfFame::new(5);
        hof.try_add(elite(0, "SSSSSSSSSSSS", 0.1));
        hof.try_add(elite(1, "TTTTTTTTTTTT", 0.1));
        assert_eq!(hof.best().unwrap().individual.id, 0);
    }

    #[test]
    fn test_duplicate_gene_rejected() {
        let mut hof = HallOfFame::new(5);
        assert!(hof.try_add(elite(0, "SSSSSSSSSSSS", 0.1)));
        assert!(!hof.try_add(elite(3, "SSSSSSSSSSSS", 0.1)));
        assert_eq!(hof.len(), 1);
    }

    #[test]
    fn test_trims_worst() {
        let mut hof = HallOfFame::new(2);
        hof.try_add(elite(0, "SSSSSSSSSSSS", 0.1));
        hof.try_add(elite(1, "TTTTTTTTTTTT", 0.3));
        hof.try_add(elite(2, "FFFFFFFFFFFF", 0.2));
        let ids: Vec<u64> = hof.get_all().iter().map(|e| e.individual.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(hof.get_top_n(1).len(), 1);
    }
}
