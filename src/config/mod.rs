pub mod traits;
pub mod evolution;
pub mod manager;

pub use manager::ConfigManager;
pub use evolution::{BacktestFailurePolicy, DiscoveryConfig};
pub use traits::ConfigSection;
