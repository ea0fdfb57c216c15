use super::traits::ConfigSection;
use crate::types::Direction;
use crate::utils::indicator_metadata::STANDARD_INDICATORS;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a failed backtest means for the candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacktestFailurePolicy {
    /// Score the candidate as the worst possible strategy and keep going
    #[default]
    WorstFitness,
    /// Stop the run with the backtest error
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub population_size: usize,
    pub max_generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elite_count: usize,
    pub tournament_size: usize,
    pub convergence_generations: usize,
    pub top_k: usize,
    pub min_trades: usize,

    pub seed: Option<u64>,
    pub direction: Option<Direction>,
    pub indicators: Vec<String>,
    pub parallel_evaluation: bool,
    pub backtest_failure: BacktestFailurePolicy,

    // Descriptive only, passed through to the backtest side
    pub symbols: Vec<String>,
    pub timeframe: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 20,
            mutation_rate: 0.2,
            crossover_rate: 0.7,
            elite_count: 2,
            tournament_size: 3,
            convergence_generations: 5,
            top_k: 10,
            min_trades: 50,
            seed: None,
            direction: None,
            indicators: Vec::new(),
            parallel_evaluation: true,
            backtest_failure: BacktestFailurePolicy::WorstFitness,
            symbols: Vec::new(),
            timeframe: "1h".to_string(),
            start_date: None,
            end_date: None,
        }
    }
}

impl ConfigSection for DiscoveryConfig {
    fn section_name() -> &'static str {
        "discovery"
    }

    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.population_size < 2 {
            violations.push(format!("population_size must be >= 2 (got {})", self.population_size));
        }
        if self.max_generations < 1 {
            violations.push(format!("max_generations must be >= 1 (got {})", self.max_generations));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            violations.push(format!("mutation_rate must be in [0, 1] (got {})", self.mutation_rate));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            violations.push(format!("crossover_rate must be in [0, 1] (got {})", self.crossover_rate));
        }
        if self.elite_count >= self.population_size {
            violations.push(format!(
                "elite_count must be < population_size (got {} >= {})",
                self.elite_count, self.population_size
            ));
        }
        if self.tournament_size < 1 {
            violations.push(format!("tournament_size must be >= 1 (got {})", self.tournament_size));
        }
        if self.convergence_generations < 1 {
            violations.push(format!(
                "convergence_generations must be >= 1 (got {})",
                self.convergence_generations
            ));
        }
        if self.top_k < 1 {
            violations.push(format!("top_k must be >= 1 (got {})", self.top_k));
        }
        for name in &self.indicators {
            if !STANDARD_INDICATORS.iter().any(|spec| spec.name == name.as_str()) {
                violations.push(format!("unknown indicator {}", name));
            }
        }

        violations
    }
}
