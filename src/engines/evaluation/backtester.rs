use crate::engines::generation::genome::Chromosome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Performance summary produced by the strategy-execution engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub sharpe_ratio: f64,
    /// Fraction of peak equity, 0.0-1.0
    pub max_drawdown: f64,
    pub profit_factor: f64,
    pub total_trades: usize,
}

/// Turns a chromosome into performance numbers.
///
/// Implementations must be pure per chromosome: candidates of one generation
/// may be evaluated concurrently.
pub trait Backtest: Sync {
    fn run(&self, chromosome: &Chromosome) -> anyhow::Result<BacktestMetrics>;
}

impl<F> Backtest for F
where
    F: Fn(&Chromosome) -> anyhow::Result<BacktestMetrics> + Sync,
{
    fn run(&self, chromosome: &Chromosome) -> anyhow::Result<BacktestMetrics> {
        self(chromosome)
    }
}

/// Named pass/fail checks applied after a backtest
pub trait TradeFilter: Sync {
    fn apply(&self, chromosome: &Chromosome, metrics: &BacktestMetrics) -> BTreeMap<String, bool>;
}

impl<F> TradeFilter for F
where
    F: Fn(&Chromosome, &BacktestMetrics) -> BTreeMap<String, bool> + Sync,
{
    fn apply(&self, chromosome: &Chromosome, metrics: &BacktestMetrics) -> BTreeMap<String, bool> {
        self(chromosome, metrics)
    }
}

/// No filters; every candidate passes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilter;

impl TradeFilter for NoFilter {
    fn apply(&self, _chromosome: &Chromosome, _metrics: &BacktestMetrics) -> BTreeMap<String, bool> {
        BTreeMap::new()
    }
}
