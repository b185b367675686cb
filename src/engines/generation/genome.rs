//! Genome representation for the pivot-agent search
//!
//! A gene is a fixed-length string of 12 symbols over the alphabet `S T F R`
//! (ordinal values 0..3). Sub-slices of the gene are base-4 numerals that
//! decode to the agent's hyperparameters, see `GeneCodec`.
//!
//! Because `Gene` stores typed symbols in a fixed-size array, a value of this
//! type is always exactly 12 loci long and never holds a foreign symbol.
//! Text only becomes a `Gene` through `FromStr`, which rejects anything else.
//!
//! # Example
//!
//! ```
//! use pivotgen::engines::generation::Gene;
//!
//! let gene: Gene = "SRSSSSSSTSRR".parse().unwrap();
//! assert_eq!(gene.to_string(), "SRSSSSSSTSRR");
//! assert!("SRSS".parse::<Gene>().is_err());
//! ```

use crate::error::PivotgenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const GENE_SIZE: usize = 12;

pub const ALPHABET: [Symbol; 4] = [Symbol::S, Symbol::T, Symbol::F, Symbol::R];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    S,
    T,
    F,
    R,
}

impl Symbol {
    pub fn index(self) -> usize {
        match self {
            Symbol::S => 0,
            Symbol::T => 1,
            Symbol::F => 2,
            Symbol::R => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        ALPHABET.get(index).copied()
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::S => 'S',
            Symbol::T => 'T',
            Symbol::F => 'F',
            Symbol::R => 'R',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        ALPHABET.iter().copied().find(|s| s.as_char() == c)
    }

    /// Mirror within the alphabet: S <-> R, T <-> F
    pub fn reflect(self) -> Self {
        ALPHABET[ALPHABET.len() - 1 - self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Gene([Symbol; GENE_SIZE]);

impl Gene {
    pub fn from_symbols(symbols: [Symbol; GENE_SIZE]) -> Self {
        Self(symbols)
    }

    pub fn symbols(&self) -> &[Symbol; GENE_SIZE] {
        &self.0
    }
}

impl FromStr for Gene {
    type Err = PivotgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.chars().count();
        if length != GENE_SIZE {
            return Err(PivotgenError::InvalidGene(format!(
                "{:?} has length {}, expected {}",
                s, length, GENE_SIZE
            )));
        }

        let mut symbols = [Symbol::S; GENE_SIZE];
        for (slot, c) in symbols.iter_mut().zip(s.chars()) {
            *slot = Symbol::from_char(c).ok_or_else(|| {
                PivotgenError::InvalidGene(format!("{:?} contains foreign symbol {:?}", s, c))
            })?;
        }
        Ok(Self(symbols))
    }
}

impl TryFrom<String> for Gene {
    type Error = PivotgenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Gene> for String {
    fn from(gene: Gene) -> Self {
        gene.to_string()
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            write!(f, "{}", symbol.as_char())?;
        }
        Ok(())
    }
}
