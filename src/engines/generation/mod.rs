pub mod genome;
pub mod validator;
pub mod operators;
pub mod pareto;
pub mod hall_of_fame;
pub mod evolution_engine;
pub mod progress;
pub mod export;

pub use genome::{Chromosome, Gene, TimeFilter};
pub use validator::ChromosomeValidator;
pub use hall_of_fame::{HallOfFame, EliteStrategy};
pub use evolution_engine::{
    has_converged, DiscoveryResult, EvolutionEngine, EvolutionState, GenerationResult, ProgressCallback,
};
pub use progress::ConsoleProgressCallback;
pub use pareto::{pareto_dominates, pareto_rank};
pub use export::{DocumentExporter, StrategyDocument, StrategyExporter};
