use crate::config::evolution::BacktestFailurePolicy;
use crate::engines::evaluation::backtester::{Backtest, BacktestMetrics, TradeFilter};
use crate::engines::generation::genome::Chromosome;
use crate::error::{DiscoveryError, Result};
use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

pub const SHARPE_WEIGHT: f64 = 0.4;
pub const DRAWDOWN_WEIGHT: f64 = 0.3;
pub const PROFIT_FACTOR_WEIGHT: f64 = 0.3;

const SHARPE_BOUNDS: (f64, f64) = (-1.0, 4.0);
const PROFIT_FACTOR_CAP: f64 = 5.0;

/// Genes allowed before the complexity penalty starts
pub const FREE_GENES: usize = 2;
pub const PENALTY_PER_GENE: f64 = 0.02;
pub const MAX_COMPLEXITY_PENALTY: f64 = 0.1;

/// Filter entry recorded when the backtest itself failed
pub const BACKTEST_FILTER: &str = "backtest";

/// Fitness of one chromosome in one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessResult {
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub profit_factor: f64,
    pub total_trades: usize,
    pub complexity_penalty: f64,
    pub raw_score: f64,
    pub adjusted_score: f64,
    pub passed_filters: bool,
    pub filter_results: BTreeMap<String, bool>,
}

impl FitnessResult {
    /// Maximized objectives: (sharpe, 1 - drawdown, profit factor)
    pub fn objectives(&self) -> [f64; 3] {
        [self.sharpe_ratio, 1.0 - self.max_drawdown, self.profit_factor]
    }

    /// Worst possible fitness, used when a backtest fails
    pub fn failed(gene_count: usize) -> Self {
        Self {
            sharpe_ratio: SHARPE_BOUNDS.0,
            max_drawdown: 1.0,
            profit_factor: 0.0,
            total_trades: 0,
            complexity_penalty: compute_complexity_penalty(gene_count),
            raw_score: 0.0,
            adjusted_score: 0.0,
            passed_filters: false,
            filter_results: BTreeMap::from([(BACKTEST_FILTER.to_string(), false)]),
        }
    }
}

/// Weighted score in [0, 1] from sharpe, drawdown and profit factor
pub fn compute_fitness_score(sharpe: f64, max_drawdown: f64, profit_factor: f64) -> f64 {
    let (sharpe_lo, sharpe_hi) = SHARPE_BOUNDS;
    let sharpe_norm = (sharpe.clamp(sharpe_lo, sharpe_hi) - sharpe_lo) / (sharpe_hi - sharpe_lo);
    let drawdown_norm = 1.0 - max_drawdown.clamp(0.0, 1.0);
    let pf_norm = profit_factor.clamp(0.0, PROFIT_FACTOR_CAP) / PROFIT_FACTOR_CAP;

    let score = SHARPE_WEIGHT * sharpe_norm + DRAWDOWN_WEIGHT * drawdown_norm + PROFIT_FACTOR_WEIGHT * pf_norm;
    if score.is_nan() {
        0.0
    } else {
        score
    }
}

pub fn compute_complexity_penalty(n_genes: usize) -> f64 {
    if n_genes <= FREE_GENES {
        return 0.0;
    }
    (PENALTY_PER_GENE * (n_genes - FREE_GENES) as f64).min(MAX_COMPLEXITY_PENALTY)
}

/// Scores populations through the backtest collaborator
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    pub min_trades: usize,
    pub failure_policy: BacktestFailurePolicy,
    pub parallel: bool,
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self {
            min_trades: 50,
            failure_policy: BacktestFailurePolicy::WorstFitness,
            parallel: false,
        }
    }
}

impl FitnessEvaluator {
    pub fn new(min_trades: usize, failure_policy: BacktestFailurePolicy, parallel: bool) -> Self {
        Self {
            min_trades,
            failure_policy,
            parallel,
        }
    }

    /// Score a backtest outcome. Too few trades forces the adjusted score to
    /// zero ahead of any penalty.
    pub fn score(
        &self,
        metrics: &BacktestMetrics,
        gene_count: usize,
        filter_results: BTreeMap<String, bool>,
    ) -> FitnessResult {
        let raw_score = compute_fitness_score(metrics.sharpe_ratio, metrics.max_drawdown, metrics.profit_factor);
        let complexity_penalty = compute_complexity_penalty(gene_count);

        let adjusted_score = if metrics.total_trades < self.min_trades {
            0.0
        } else {
            (raw_score - complexity_penalty).max(0.0)
        };
        let passed_filters = filter_results.values().all(|&passed| passed);

        FitnessResult {
            sharpe_ratio: metrics.sharpe_ratio,
            max_drawdown: metrics.max_drawdown,
            profit_factor: metrics.profit_factor,
            total_trades: metrics.total_trades,
            complexity_penalty,
            raw_score,
            adjusted_score,
            passed_filters,
            filter_results,
        }
    }

    pub fn evaluate_one<B, F>(&self, chromosome: &Chromosome, backtest: &B, filter: &F) -> Result<FitnessResult>
    where
        B: Backtest + ?Sized,
        F: TradeFilter + ?Sized,
    {
        match backtest.run(chromosome) {
            Ok(metrics) => {
                let filter_results = filter.apply(chromosome, &metrics);
                Ok(self.score(&metrics, chromosome.gene_count(), filter_results))
            }
            Err(source) => match self.failure_policy {
                BacktestFailurePolicy::WorstFitness => {
                    warn!("Backtest failed for {}: {:#}", chromosome.id, source);
                    Ok(FitnessResult::failed(chromosome.gene_count()))
                }
                BacktestFailurePolicy::Abort => Err(DiscoveryError::Backtest {
                    chromosome_id: chromosome.id.to_string(),
                    source,
                }),
            },
        }
    }

    /// One result per chromosome, in input order. Every result is collected
    /// before this returns.
    pub fn evaluate_population<B, F>(
        &self,
        chromosomes: &[Chromosome],
        backtest: &B,
        filter: &F,
    ) -> Result<Vec<FitnessResult>>
    where
        B: Backtest + ?Sized,
        F: TradeFilter + ?Sized,
    {
        self.evaluate_population_with_progress(chromosomes, backtest, filter, |_, _| {})
    }

    /// Like `evaluate_population`, calling `progress(done, total)` as each
    /// candidate finishes. `done` counts up from 1 even when evaluating in
    /// parallel.
    pub fn evaluate_population_with_progress<B, F, P>(
        &self,
        chromosomes: &[Chromosome],
        backtest: &B,
        filter: &F,
        progress: P,
    ) -> Result<Vec<FitnessResult>>
    where
        B: Backtest + ?Sized,
        F: TradeFilter + ?Sized,
        P: FnMut(usize, usize) + Send,
    {
        let total = chromosomes.len();
        let progress = Mutex::new((0usize, progress));
        let evaluate = |chromosome: &Chromosome| {
            let result = self.evaluate_one(chromosome, backtest, filter);
            if let Ok(mut guard) = progress.lock() {
                let (done, report) = &mut *guard;
                *done += 1;
                report(*done, total);
            }
            result
        };

        if self.parallel {
            chromosomes.par_iter().map(evaluate).collect()
        } else {
            chromosomes.iter().map(evaluate).collect()
        }
    }
}
