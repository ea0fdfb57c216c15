use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Selection error: population is empty")]
    EmptyPopulation,

    #[error("Selection error: population has {population} individuals but {scores} scores")]
    PopulationSizeMismatch { population: usize, scores: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("Backtest error for chromosome {chromosome_id}: {source}")]
    Backtest {
        chromosome_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
