use super::evolution_engine::ProgressCallback;
use super::population::Individual;

/// Reports progress through the `log` facade
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize, population_size: usize) {
        log::info!("Processing generation {} ({} individuals)", generation, population_size);
    }

    fn on_individual_evaluated(&mut self, individual: &Individual, fitness: f64) {
        log::info!(
            "  id {} gene {} | score {:.6}",
            individual.id,
            individual.gene,
            fitness
        );
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hof_size: usize) {
        log::info!(
            "Generation {} complete. Best fitness: {:.6}, Hall of Fame size: {}",
            generation,
            best_fitness,
            hof_size
        );
    }
}

// For handing progress to another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart { generation: usize, population_size: usize },
    IndividualEvaluated { id: u64, fitness: f64 },
    GenerationComplete { generation: usize, best_fitness: f64, hof_size: usize },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize, population_size: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart {
            generation,
            population_size,
        });
    }

    fn on_individual_evaluated(&mut self, individual: &Individual, fitness: f64) {
        let _ = self.sender.send(ProgressMessage::IndividualEvaluated {
            id: individual.id,
            fitness,
        });
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hof_size: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation,
            best_fitness,
            hof_size,
        });
    }
}
