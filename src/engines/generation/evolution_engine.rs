use crate::config::{ConfigSection, EvolutionConfig};
use crate::engines::evaluation::{Backtester, Evaluation};
use crate::engines::generation::{
    genome::Gene,
    hall_of_fame::{EliteIndividual, HallOfFame},
    operators::{new_gene, random_gene},
    population::{IdSequence, Individual, Population},
    selection::{fitness_to_probabilities, sample_parent_pair},
};
use crate::error::{PivotgenError, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize, population_size: usize);
    fn on_individual_evaluated(&mut self, individual: &Individual, fitness: f64);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hall_of_fame_size: usize);
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize, population_size: usize) {
        (**self).on_generation_start(generation, population_size)
    }

    fn on_individual_evaluated(&mut self, individual: &Individual, fitness: f64) {
        (**self).on_individual_evaluated(individual, fitness)
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hall_of_fame_size: usize) {
        (**self).on_generation_complete(generation, best_fitness, hall_of_fame_size)
    }
}

/// Outcome of a full run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub best: EliteIndividual,
    pub hall_of_fame: Vec<EliteIndividual>,
    /// Every evaluated population, oldest first
    pub history: Vec<Individual>,
    pub scores: BTreeMap<u64, f64>,
    pub generations_run: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct EvolutionEngine {
    config: EvolutionConfig,
    backtester: Backtester,
    hall_of_fame: HallOfFame,
    ids: IdSequence,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig, backtester: Backtester) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let hall_of_fame = HallOfFame::new(config.hall_of_fame_size);

        Ok(Self {
            config,
            backtester,
            hall_of_fame,
            ids: IdSequence::default(),
            rng,
        })
    }

    /// Run generations `1..=target_generations` and return the best
    /// individual ever evaluated.
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<EvolutionReport> {
        let started_at = Utc::now();
        let mut population = self.initial_population()?;
        let mut history = Vec::new();
        let mut scores = BTreeMap::new();

        let mut generation = 1;
        while generation <= self.config.target_generations {
            callback.on_generation_start(generation, population.len());

            let evaluations = self.evaluate_population(&population);

            for (individual, evaluation) in population.iter().zip(&evaluations) {
                scores.insert(individual.id, evaluation.fitness);
                callback.on_individual_evaluated(individual, evaluation.fitness);
                self.hall_of_fame.try_add(EliteIndividual {
                    individual: individual.clone(),
                    fitness: evaluation.fitness,
                    report: evaluation.report,
                });
            }

            let fitness: Vec<f64> = evaluations.iter().map(|e| e.fitness).collect();
            let best_fitness = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            callback.on_generation_complete(generation, best_fitness, self.hall_of_fame.len());

            let next = self.breed_next_generation(&population, &fitness, generation)?;
            history.append(&mut population);
            population = next;
            generation += 1;
        }

        let best = self
            .hall_of_fame
            .best()
            .cloned()
            .ok_or_else(|| PivotgenError::Generation("No individual was evaluated".to_string()))?;

        log::info!(
            "Best gene {} (id {}, generation {}) with fitness {:.6}",
            best.individual.gene,
            best.individual.id,
            best.individual.generation,
            best.fitness
        );

        Ok(EvolutionReport {
            best,
            hall_of_fame: self.hall_of_fame.get_all().to_vec(),
            history,
            scores,
            generations_run: generation - 1,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Seed genes first, topped up with unique random genes
    pub fn initial_population(&mut self) -> Result<Population> {
        let size = self.config.effective_population_size();
        let mut genes: Vec<Gene> = self.config.parsed_seed_genes()?;
        genes.truncate(size);

        let mut taken: HashSet<Gene> = genes.iter().copied().collect();
        while genes.len() < size {
            let gene = self.unique_random_gene(&taken)?;
            taken.insert(gene);
            genes.push(gene);
        }

        Ok(genes
            .into_iter()
            .map(|gene| Individual::seed(self.ids.next_id(), gene))
            .collect())
    }

    fn evaluate_population(&self, population: &[Individual]) -> Vec<Evaluation> {
        let backtester = &self.backtester;
        if self.config.parallel {
            population
                .par_iter()
                .map(|individual| backtester.evaluate(&individual.gene))
                .collect()
        } else {
            population
                .iter()
                .map(|individual| backtester.evaluate(&individual.gene))
                .collect()
        }
    }

    /// Same-size next generation bred from fitness-weighted parent pairs.
    /// Children within one generation never share a gene.
    pub fn breed_next_generation(
        &mut self,
        population: &[Individual],
        fitness: &[f64],
        generation: usize,
    ) -> Result<Population> {
        let probabilities = fitness_to_probabilities(fitness);
        let size = population.len();
        let mut next_generation: Population = Vec::with_capacity(size);
        let mut taken: HashSet<Gene> = HashSet::new();

        while next_generation.len() < size {
            let (i1, i2) = sample_parent_pair(&probabilities, &mut self.rng)?;
            let (p1, p2) = (&population[i1], &population[i2]);

            for (first, second) in [(p1, p2), (p2, p1)] {
                if next_generation.len() >= size {
                    break;
                }
                let gene = self.unique_child(&first.gene, &second.gene, &taken)?;
                taken.insert(gene);
                next_generation.push(Individual::child(
                    self.ids.next_id(),
                    gene,
                    generation + 1,
                    (first.id, second.id),
                ));
            }
        }

        Ok(next_generation)
    }

    fn unique_child(&mut self, first: &Gene, second: &Gene, taken: &HashSet<Gene>) -> Result<Gene> {
        let (rate, retries) = (self.config.mutation_rate, self.config.max_duplicate_retries);
        let offspring = draw_unused(taken, retries, || {
            new_gene(first, second, rate, &mut self.rng)
        });
        if let Ok(gene) = offspring {
            return Ok(gene);
        }

        log::debug!(
            "Offspring of {} x {} kept duplicating, falling back to a random gene",
            first,
            second
        );
        self.unique_random_gene(taken)
    }

    fn unique_random_gene(&mut self, taken: &HashSet<Gene>) -> Result<Gene> {
        let (rate, retries) = (self.config.mutation_rate, self.config.max_duplicate_retries);
        draw_unused(taken, retries, || random_gene(rate, &mut self.rng))
    }

    pub fn get_hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }
}

/// First drawn gene not in `taken`, giving up after `retries` redraws
fn draw_unused<F>(taken: &HashSet<Gene>, retries: usize, mut draw: F) -> Result<Gene>
where
    F: FnMut() -> Gene,
{
    for _ in 0..=retries {
        let gene = draw();
        if !taken.contains(&gene) {
            return Ok(gene);
        }
    }

    Err(PivotgenError::Generation(format!(
        "Duplicate offspring: no unused gene found after {} retries",
        retries
    )))
}
