pub mod codec;
pub mod evolution_engine;
pub mod genome;
pub mod hall_of_fame;
pub mod operators;
pub mod population;
pub mod progress;
pub mod selection;

pub use codec::{GeneCodec, GeneConfig};
pub use evolution_engine::{EvolutionEngine, EvolutionReport, ProgressCallback};
pub use genome::{Gene, Symbol, ALPHABET, GENE_SIZE};
pub use hall_of_fame::{EliteIndividual, HallOfFame};
pub use population::{Individual, Population};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressMessage};
