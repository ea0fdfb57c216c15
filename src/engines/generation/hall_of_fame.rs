use crate::engines::evaluation::fitness::FitnessResult;
use crate::engines::generation::genome::Chromosome;

use std::collections::HashSet;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub struct EliteStrategy {
    pub chromosome: Chromosome,
    pub fitness: FitnessResult,
}

impl EliteStrategy {
    pub fn score(&self) -> f64 {
        self.fitness.adjusted_score
    }
}

/// Best strategies seen across every generation, deduplicated by chromosome id
pub struct HallOfFame {
    strategies: Vec<EliteStrategy>,
    max_size: usize,
    seen_ids: HashSet<Uuid>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            strategies: Vec::new(),
            max_size,
            seen_ids: HashSet::new(),
        }
    }

    /// Attempt to add a strategy to the Hall of Fame
    pub fn try_add(&mut self, chromosome: &Chromosome, fitness: &FitnessResult) -> bool {
        // Elites are re-evaluated every generation under the same id
        if self.seen_ids.contains(&chromosome.id) {
            return false;
        }

        if self.strategies.len() >= self.max_size {
            let worst = self.strategies.last().map(EliteStrategy::score).unwrap_or(f64::NEG_INFINITY);
            if fitness.adjusted_score <= worst {
                return false;
            }
        }

        self.seen_ids.insert(chromosome.id);
        self.strategies.push(EliteStrategy {
            chromosome: chromosome.clone(),
            fitness: fitness.clone(),
        });
        self.sort_and_trim();

        true
    }

    /// Sort by adjusted score (descending, stable) and trim to max size
    fn sort_and_trim(&mut self) {
        self.strategies
            .sort_by(|a, b| b.score().total_cmp(&a.score()));

        while self.strategies.len() > self.max_size {
            if let Some(removed) = self.strategies.pop() {
                self.seen_ids.remove(&removed.chromosome.id);
            }
        }
    }

    pub fn best(&self) -> Option<&EliteStrategy> {
        self.strategies.first()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn into_strategies(self) -> Vec<EliteStrategy> {
        self.strategies
    }
}
