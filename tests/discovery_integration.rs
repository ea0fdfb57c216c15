use anyhow::anyhow;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tradebias_discovery::engines::generation::{ConsoleProgressCallback, DocumentExporter};
use tradebias_discovery::{
    BacktestFailurePolicy, BacktestMetrics, Chromosome, ConfigManager, DiscoveryConfig, DiscoveryError,
    EvolutionEngine, EvolutionState, ProgressCallback,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Rewards larger genomes so the search has a gradient to climb
fn gene_count_backtest(chromosome: &Chromosome) -> anyhow::Result<BacktestMetrics> {
    Ok(BacktestMetrics {
        sharpe_ratio: 1.0 + 0.1 * chromosome.gene_count() as f64,
        max_drawdown: 0.1,
        profit_factor: 1.5,
        total_trades: 100,
    })
}

fn small_config(seed: u64) -> DiscoveryConfig {
    DiscoveryConfig {
        population_size: 6,
        max_generations: 3,
        elite_count: 1,
        top_k: 2,
        seed: Some(seed),
        ..DiscoveryConfig::default()
    }
}

#[derive(Default)]
struct RecordingCallback {
    started: Vec<usize>,
    completed: Vec<(usize, f64, usize)>,
    evaluated: Vec<(usize, usize)>,
}

impl ProgressCallback for &mut RecordingCallback {
    fn on_generation_start(&mut self, generation: usize) {
        self.started.push(generation);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hall_of_fame_size: usize) {
        self.completed.push((generation, best_fitness, hall_of_fame_size));
    }

    fn on_strategy_evaluated(&mut self, strategy_num: usize, total: usize) {
        self.evaluated.push((strategy_num, total));
    }
}

#[test]
fn test_small_discovery_run() {
    init_logger();

    let mut engine = EvolutionEngine::new(small_config(42), gene_count_backtest).unwrap();
    let mut callback = RecordingCallback::default();
    let result = engine.run(&mut callback).unwrap();

    assert!((1..=3).contains(&result.generations.len()));
    assert!(result.top_strategies.len() <= 2);
    assert!(!result.top_strategies.is_empty());
    for pair in result.top_strategies.windows(2) {
        assert!(pair[0].score() >= pair[1].score());
    }
    assert_eq!(result.total_evaluations, 6 * result.generations.len());

    for (i, generation) in result.generations.iter().enumerate() {
        assert_eq!(generation.generation, i);
        assert_eq!(generation.population_size, 6);
        assert_eq!(generation.passing_count, 6);
        assert!(generation.pareto_front_size >= 1);
        assert!(generation.best_score >= generation.mean_score - 1e-12);
    }

    assert_eq!(callback.started.len(), result.generations.len());
    assert_eq!(callback.completed.len(), result.generations.len());
    // Reported as each candidate finishes, counting up within every generation
    let expected: Vec<(usize, usize)> = (0..result.generations.len())
        .flat_map(|_| (1..=6).map(|done| (done, 6)))
        .collect();
    assert_eq!(callback.evaluated, expected);
}

#[test]
fn test_best_score_never_regresses_with_elitism() {
    init_logger();

    let config = DiscoveryConfig {
        max_generations: 6,
        convergence_generations: 10,
        ..small_config(3)
    };
    let mut engine = EvolutionEngine::new(config, gene_count_backtest).unwrap();
    let result = engine.run(ConsoleProgressCallback).unwrap();

    assert_eq!(result.final_state, EvolutionState::Exhausted);
    assert!(!result.converged);
    for pair in result.generations.windows(2) {
        assert!(pair[1].best_score >= pair[0].best_score - 1e-12);
    }
}

#[test]
fn test_same_seed_same_result() {
    init_logger();

    let run = |seed: u64| {
        let mut engine = EvolutionEngine::new(small_config(seed), gene_count_backtest).unwrap();
        engine.run(()).unwrap()
    };

    let first = run(7);
    let second = run(7);
    assert_eq!(first.generations, second.generations);
    assert_eq!(first.top_strategies, second.top_strategies);
    assert_eq!(first.convergence_generation, second.convergence_generation);
}

#[test]
fn test_sequential_and_parallel_agree() {
    let run = |parallel_evaluation: bool| {
        let config = DiscoveryConfig {
            parallel_evaluation,
            ..small_config(13)
        };
        let mut engine = EvolutionEngine::new(config, gene_count_backtest).unwrap();
        engine.run(()).unwrap()
    };

    let sequential = run(false);
    let parallel = run(true);
    assert_eq!(sequential.generations, parallel.generations);
    assert_eq!(sequential.top_strategies, parallel.top_strategies);
}

#[test]
fn test_filters_are_recorded() {
    let filter = |chromosome: &Chromosome, metrics: &BacktestMetrics| {
        BTreeMap::from([
            ("min_trades".to_string(), metrics.total_trades >= 50),
            ("short_genome".to_string(), chromosome.gene_count() <= 3),
        ])
    };

    let mut engine = EvolutionEngine::with_filter(small_config(17), gene_count_backtest, filter).unwrap();
    let result = engine.run(()).unwrap();

    for elite in &result.top_strategies {
        let filters = &elite.fitness.filter_results;
        assert_eq!(filters.len(), 2);
        assert!(filters["min_trades"]);
        assert_eq!(filters["short_genome"], elite.chromosome.gene_count() <= 3);
        assert_eq!(elite.fitness.passed_filters, elite.chromosome.gene_count() <= 3);
    }
}

#[test]
fn test_failing_backtest_gets_worst_fitness() {
    let calls = AtomicUsize::new(0);
    let flaky = |chromosome: &Chromosome| {
        if calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            Err(anyhow!("no data for {}", chromosome.id))
        } else {
            gene_count_backtest(chromosome)
        }
    };

    let config = DiscoveryConfig {
        parallel_evaluation: false,
        ..small_config(19)
    };
    let mut engine = EvolutionEngine::new(config, flaky).unwrap();
    let result = engine.run(()).unwrap();

    let first = &result.generations[0];
    assert_eq!(first.passing_count, 3);
    assert_eq!(first.worst_score, 0.0);
    assert!(first.best_score > 0.0);
}

#[test]
fn test_abort_policy_surfaces_backtest_error() {
    let failing = |_: &Chromosome| -> anyhow::Result<BacktestMetrics> { Err(anyhow!("engine offline")) };
    let config = DiscoveryConfig {
        backtest_failure: BacktestFailurePolicy::Abort,
        ..small_config(23)
    };

    let mut engine = EvolutionEngine::new(config, failing).unwrap();
    match engine.run(()) {
        Err(DiscoveryError::Backtest { source, .. }) => {
            assert!(source.to_string().contains("engine offline"));
        }
        other => panic!("expected backtest error, got {:?}", other.map(|r| r.total_evaluations)),
    }
}

#[test]
fn test_restricted_indicators_and_direction() {
    let config = DiscoveryConfig {
        indicators: vec!["RSI".to_string(), "MACD".to_string()],
        direction: Some(tradebias_discovery::Direction::Short),
        ..small_config(29)
    };

    let mut engine = EvolutionEngine::new(config, gene_count_backtest).unwrap();
    assert_eq!(engine.parameter_space().len(), 2);
    let result = engine.run(()).unwrap();

    for elite in &result.top_strategies {
        let chromosome = &elite.chromosome;
        assert_eq!(chromosome.direction, tradebias_discovery::Direction::Short);
        for gene in chromosome.entry_genes.iter().chain(&chromosome.exit_genes) {
            assert!(gene.indicator == "RSI" || gene.indicator == "MACD", "{}", gene.indicator);
        }
    }
}

#[test]
fn test_export_top_strategies() {
    let mut engine = EvolutionEngine::new(small_config(31), gene_count_backtest).unwrap();
    let result = engine.run(()).unwrap();

    let documents = result.export_top(&DocumentExporter);
    assert_eq!(documents.len(), result.top_strategies.len());
    for (document, elite) in documents.iter().zip(&result.top_strategies) {
        assert_eq!(document.id, elite.chromosome.id.to_string());
        assert_eq!(document.entry_rules.len(), elite.chromosome.entry_genes.len());
        assert_eq!(document.exit_rules.len(), elite.chromosome.exit_genes.len());

        let json = document.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["id"], document.id.as_str());
    }
}

#[test]
fn test_invalid_config_runs_nothing() {
    let calls = AtomicUsize::new(0);
    let counting = |chromosome: &Chromosome| {
        calls.fetch_add(1, Ordering::SeqCst);
        gene_count_backtest(chromosome)
    };
    let config = DiscoveryConfig {
        population_size: 4,
        elite_count: 4,
        ..DiscoveryConfig::default()
    };

    assert!(matches!(
        EvolutionEngine::new(config, counting),
        Err(DiscoveryError::Configuration(_))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_config_file_drives_engine() {
    let manager = ConfigManager::new();
    manager
        .load_from_str(
            r#"
            [discovery]
            population_size = 6
            max_generations = 2
            elite_count = 1
            top_k = 3
            seed = 5
            indicators = ["RSI", "STOCH", "BBANDS"]
            "#,
        )
        .unwrap();

    let config = manager.get().unwrap();
    assert_eq!(config.population_size, 6);
    assert_eq!(config.mutation_rate, 0.2);

    let mut engine = EvolutionEngine::new(config, gene_count_backtest).unwrap();
    let result = engine.run(()).unwrap();
    assert_eq!(result.generations.len(), 2);
    assert!(result.top_strategies.len() <= 3);
}
