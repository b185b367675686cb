use super::genome::Gene;
use serde::{Deserialize, Serialize};

/// One member of a generation, with its breeding provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub id: u64,
    pub gene: Gene,
    pub generation: usize,
    pub parents: Option<(u64, u64)>,
}

impl Individual {
    pub fn seed(id: u64, gene: Gene) -> Self {
        Self {
            id,
            gene,
            generation: 1,
            parents: None,
        }
    }

    pub fn child(id: u64, gene: Gene, generation: usize, parents: (u64, u64)) -> Self {
        Self {
            id,
            gene,
            generation,
            parents: Some(parents),
        }
    }
}

pub type Population = Vec<Individual>;

/// Hands out individual ids in creation order
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}
