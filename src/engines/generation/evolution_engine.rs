use crate::config::evolution::DiscoveryConfig;
use crate::config::traits::ConfigSection;
use crate::engines::evaluation::backtester::{Backtest, NoFilter, TradeFilter};
use crate::engines::evaluation::fitness::{FitnessEvaluator, FitnessResult};
use crate::engines::generation::{
    export::StrategyExporter,
    genome::Chromosome,
    hall_of_fame::{EliteStrategy, HallOfFame},
    operators::*,
    pareto::pareto_rank,
    validator::ChromosomeValidator,
};
use crate::error::{DiscoveryError, Result};
use crate::types::Direction;
use crate::utils::indicator_metadata::ParameterSpace;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

/// Re-mutation attempts before an invalid offspring is replaced
pub const MAX_REPAIR_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionState {
    Initializing,
    Evaluating,
    Evolving,
    Converged,
    Exhausted,
}

/// Summary of one evaluated generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub generation: usize,
    pub best_score: f64,
    pub mean_score: f64,
    pub worst_score: f64,
    pub best_chromosome: Chromosome,
    pub population_size: usize,
    pub passing_count: usize,
    pub pareto_front_size: usize,
}

#[derive(Debug, Clone)]
pub struct DiscoveryResult {
    pub generations: Vec<GenerationResult>,
    /// Best strategies across the whole run, highest adjusted score first
    pub top_strategies: Vec<EliteStrategy>,
    pub total_evaluations: usize,
    pub converged: bool,
    pub convergence_generation: Option<usize>,
    pub final_state: EvolutionState,
}

impl DiscoveryResult {
    pub fn best(&self) -> Option<&EliteStrategy> {
        self.top_strategies.first()
    }

    pub fn export_top<E: StrategyExporter>(&self, exporter: &E) -> Vec<E::Document> {
        self.top_strategies
            .iter()
            .map(|elite| exporter.export(&elite.chromosome))
            .collect()
    }
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hall_of_fame_size: usize);
    fn on_strategy_evaluated(&mut self, strategy_num: usize, total: usize);
}

/// True when the best score of the last `window` generations does not beat
/// the best of every earlier generation. Needs at least `2 * window`
/// generations of history.
pub fn has_converged(best_history: &[f64], window: usize) -> bool {
    if window == 0 || best_history.len() < 2 * window {
        return false;
    }

    let split = best_history.len() - window;
    let recent_best = best_history[split..].iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let prior_best = best_history[..split].iter().copied().fold(f64::NEG_INFINITY, f64::max);

    recent_best <= prior_best
}

pub struct EvolutionEngine<B, F = NoFilter> {
    config: DiscoveryConfig,
    space: ParameterSpace,
    evaluator: FitnessEvaluator,
    backtest: B,
    filter: F,
    rng: StdRng,
}

impl<B: Backtest> EvolutionEngine<B, NoFilter> {
    pub fn new(config: DiscoveryConfig, backtest: B) -> Result<Self> {
        Self::with_filter(config, backtest, NoFilter)
    }
}

impl<B: Backtest, F: TradeFilter> EvolutionEngine<B, F> {
    /// Validates `config` up front; nothing runs on an invalid configuration
    pub fn with_filter(config: DiscoveryConfig, backtest: B, filter: F) -> Result<Self> {
        config.validate()?;
        let space = ParameterSpace::restricted(&config.indicators)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let evaluator = FitnessEvaluator::new(
            config.min_trades,
            config.backtest_failure,
            config.parallel_evaluation,
        );

        Ok(Self {
            config,
            space,
            evaluator,
            backtest,
            filter,
            rng,
        })
    }

    /// Search over a custom indicator table instead of the configured one
    pub fn with_parameter_space(mut self, space: ParameterSpace) -> Self {
        self.space = space;
        self
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn parameter_space(&self) -> &ParameterSpace {
        &self.space
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<DiscoveryResult> {
        let mut state = EvolutionState::Initializing;
        info!(
            "Starting discovery: population {}, up to {} generations, {} indicators",
            self.config.population_size,
            self.config.max_generations,
            self.space.len()
        );

        let mut population = initialize_population(
            self.config.population_size,
            self.config.direction,
            &self.space,
            &mut self.rng,
        );

        let mut hall_of_fame = HallOfFame::new(self.config.top_k);
        let mut generations = Vec::with_capacity(self.config.max_generations);
        let mut best_history = Vec::with_capacity(self.config.max_generations);
        let mut total_evaluations = 0;
        let mut convergence_generation = None;

        for generation in 0..self.config.max_generations {
            state = transition(state, EvolutionState::Evaluating);
            callback.on_generation_start(generation);

            // All results for the generation are in hand before selection starts.
            let fitness = self.evaluator.evaluate_population_with_progress(
                &population,
                &self.backtest,
                &self.filter,
                |done, total| callback.on_strategy_evaluated(done, total),
            )?;
            total_evaluations += population.len();

            for (chromosome, result) in population.iter().zip(&fitness) {
                hall_of_fame.try_add(chromosome, result);
            }

            let scores: Vec<f64> = fitness.iter().map(|f| f.adjusted_score).collect();
            let summary = summarize(generation, &population, &fitness, &scores);
            info!(
                "Generation {}: best {:.4}, mean {:.4}, worst {:.4}, passing {}/{}, front {}",
                generation + 1,
                summary.best_score,
                summary.mean_score,
                summary.worst_score,
                summary.passing_count,
                summary.population_size,
                summary.pareto_front_size
            );
            best_history.push(summary.best_score);
            callback.on_generation_complete(generation, summary.best_score, hall_of_fame.len());
            generations.push(summary);

            if has_converged(&best_history, self.config.convergence_generations) {
                info!("Converged after generation {}", generation + 1);
                convergence_generation = Some(generation);
                break;
            }
            if generation + 1 == self.config.max_generations {
                break;
            }

            state = transition(state, EvolutionState::Evolving);
            population = self.next_generation(&population, &scores)?;
        }

        let final_state = if convergence_generation.is_some() {
            EvolutionState::Converged
        } else {
            EvolutionState::Exhausted
        };
        transition(state, final_state);

        let top_strategies = hall_of_fame.into_strategies();
        info!(
            "Discovery finished: {} generations, {} evaluations, best {:.4}",
            generations.len(),
            total_evaluations,
            top_strategies.first().map(EliteStrategy::score).unwrap_or(0.0)
        );

        Ok(DiscoveryResult {
            generations,
            top_strategies,
            total_evaluations,
            converged: convergence_generation.is_some(),
            convergence_generation,
            final_state,
        })
    }

    /// Elites carried unchanged, then offspring until the population is full
    fn next_generation(&mut self, population: &[Chromosome], scores: &[f64]) -> Result<Vec<Chromosome>> {
        let size = self.config.population_size;
        let mutation_rate = self.config.mutation_rate;
        let space = &self.space;
        let rng = &mut self.rng;
        let validator = ChromosomeValidator::new(space);

        let mut next_generation = elitism(population, scores, self.config.elite_count)?;

        while next_generation.len() < size {
            let parent1 = tournament_selection(population, scores, self.config.tournament_size, rng)?;
            let parent2 = tournament_selection(population, scores, self.config.tournament_size, rng)?;

            let (child1, child2) = if rng.gen_bool(self.config.crossover_rate) {
                crossover(&parent1, &parent2, space, rng)
            } else {
                (parent1, parent2)
            };

            let child1 = mutate(&child1, mutation_rate, space, rng);
            let child2 = mutate(&child2, mutation_rate, space, rng);

            next_generation.push(repair(child1, mutation_rate, &validator, space, self.config.direction, rng)?);
            if next_generation.len() < size {
                next_generation.push(repair(child2, mutation_rate, &validator, space, self.config.direction, rng)?);
            }
        }

        Ok(next_generation)
    }
}

fn transition(from: EvolutionState, to: EvolutionState) -> EvolutionState {
    if from != to {
        debug!("Evolution state {:?} -> {:?}", from, to);
    }
    to
}

/// Re-mutate until valid; past the retry bound, substitute a fresh random
/// chromosome. Only a valid chromosome ever leaves this function.
fn repair<R: Rng>(
    mut candidate: Chromosome,
    mutation_rate: f64,
    validator: &ChromosomeValidator,
    space: &ParameterSpace,
    direction: Option<Direction>,
    rng: &mut R,
) -> Result<Chromosome> {
    for attempt in 0..=MAX_REPAIR_ATTEMPTS {
        if validator.is_valid(&candidate) {
            return Ok(candidate);
        }
        if attempt == MAX_REPAIR_ATTEMPTS {
            break;
        }
        debug!("Repair attempt {} for offspring {}", attempt + 1, candidate.id);
        candidate = mutate(&candidate, mutation_rate, space, rng);
    }

    warn!(
        "Discarding offspring {} after {} repair attempts: {}",
        candidate.id,
        MAX_REPAIR_ATTEMPTS,
        validator.violations(&candidate).join("; ")
    );

    let mut last_violations = Vec::new();
    for _ in 0..=MAX_REPAIR_ATTEMPTS {
        let fresh = random_chromosome(space, direction, rng);
        last_violations = validator.violations(&fresh);
        if last_violations.is_empty() {
            return Ok(fresh);
        }
    }
    Err(DiscoveryError::Validation(format!(
        "parameter space cannot produce a valid chromosome: {}",
        last_violations.join("; ")
    )))
}

fn summarize(
    generation: usize,
    population: &[Chromosome],
    fitness: &[FitnessResult],
    scores: &[f64],
) -> GenerationResult {
    let mut best_idx = 0;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[best_idx] {
            best_idx = i;
        }
    }

    let best_score = scores.get(best_idx).copied().unwrap_or(0.0);
    let worst_score = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let mean_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };
    let pareto_front_size = pareto_rank(fitness).iter().filter(|&&rank| rank == 0).count();

    GenerationResult {
        generation,
        best_score,
        mean_score,
        worst_score: if scores.is_empty() { 0.0 } else { worst_score },
        best_chromosome: population[best_idx].clone(),
        population_size: population.len(),
        passing_count: fitness.iter().filter(|f| f.passed_filters).count(),
        pareto_front_size,
    }
}
