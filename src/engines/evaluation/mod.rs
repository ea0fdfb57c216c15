pub mod backtester;
pub mod fitness;

pub use backtester::{Backtest, BacktestMetrics, NoFilter, TradeFilter};
pub use fitness::{compute_complexity_penalty, compute_fitness_score, FitnessEvaluator, FitnessResult};
