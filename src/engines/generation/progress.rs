use super::evolution_engine::ProgressCallback;
use log::{debug, info};

/// Reports progress through the `log` facade
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        debug!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hof_size: usize) {
        info!(
            "Generation {} complete. Best fitness: {:.4}, Hall of Fame size: {}",
            generation + 1,
            best_fitness,
            hof_size
        );
    }

    fn on_strategy_evaluated(&mut self, strategy_num: usize, total: usize) {
        if strategy_num % 10 == 0 || strategy_num == total {
            debug!("  Evaluated {}/{} strategies", strategy_num, total);
        }
    }
}

/// Silent callback
impl ProgressCallback for () {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, _best_fitness: f64, _hof_size: usize) {}

    fn on_strategy_evaluated(&mut self, _strategy_num: usize, _total: usize) {}
}
