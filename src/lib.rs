//! Evolutionary discovery of trading-strategy genomes.
//!
//! A population of [`Chromosome`]s (entry/exit indicator conditions plus risk
//! parameters) is scored through an external [`Backtest`], then bred with
//! tournament selection, uniform crossover, mutation and elitism until the
//! best score stops improving or the generation cap is reached.
//!
//! ```no_run
//! use tradebias_discovery::{BacktestMetrics, Chromosome, DiscoveryConfig, EvolutionEngine};
//!
//! let config = DiscoveryConfig { seed: Some(42), ..DiscoveryConfig::default() };
//! let backtest = |c: &Chromosome| -> anyhow::Result<BacktestMetrics> {
//!     Ok(BacktestMetrics {
//!         sharpe_ratio: 1.0 + 0.1 * c.gene_count() as f64,
//!         max_drawdown: 0.1,
//!         profit_factor: 1.5,
//!         total_trades: 100,
//!     })
//! };
//!
//! let mut engine = EvolutionEngine::new(config, backtest)?;
//! let result = engine.run(())?;
//! println!("best score: {:?}", result.best().map(|s| s.fitness.adjusted_score));
//! # Ok::<(), tradebias_discovery::DiscoveryError>(())
//! ```

pub mod config;
pub mod engines;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{BacktestFailurePolicy, ConfigManager, ConfigSection, DiscoveryConfig};
pub use engines::evaluation::{Backtest, BacktestMetrics, FitnessEvaluator, FitnessResult, NoFilter, TradeFilter};
pub use engines::generation::{
    Chromosome, DiscoveryResult, EliteStrategy, EvolutionEngine, EvolutionState, Gene, GenerationResult,
    ProgressCallback,
};
pub use error::{DiscoveryError, Result};
pub use types::{Condition, Direction, IndicatorCategory};
pub use utils::ParameterSpace;
