use super::{evolution::DiscoveryConfig, traits::ConfigSection};
use crate::error::{DiscoveryError, Result};
use config::{Config, Environment, File, FileFormat};
use log::info;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `TRADEBIAS__DISCOVERY__SEED=7`
pub const ENV_PREFIX: &str = "TRADEBIAS";

pub struct ConfigManager {
    config: Arc<RwLock<DiscoveryConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(DiscoveryConfig::default())),
        }
    }

    /// Load the `[discovery]` section of a TOML file, then environment overrides
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .add_source(env_source());
        let config = extract(builder.build()?)?;

        info!("Loaded discovery config from {}", path.display());
        self.replace(config)
    }

    pub fn load_from_str(&self, contents: &str) -> Result<()> {
        let builder = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .add_source(env_source());
        let config = extract(builder.build()?)?;
        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = self.get()?;
        let document = BTreeMap::from([(DiscoveryConfig::section_name(), config)]);
        let toml_str = toml::to_string_pretty(&document)?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Result<DiscoveryConfig> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| DiscoveryError::Configuration("config lock poisoned".to_string()))
    }

    /// Apply `f` to a copy; the stored config only changes if the result validates
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut DiscoveryConfig),
    {
        let mut candidate = self.get()?;
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: DiscoveryConfig) -> Result<()> {
        config.validate()?;
        let mut guard = self
            .config
            .write()
            .map_err(|_| DiscoveryError::Configuration("config lock poisoned".to_string()))?;
        *guard = config;
        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn extract(settings: Config) -> Result<DiscoveryConfig> {
    // A file without a [discovery] table means "all defaults".
    match settings.get::<DiscoveryConfig>(DiscoveryConfig::section_name()) {
        Ok(config) => Ok(config),
        Err(config::ConfigError::NotFound(_)) => Ok(DiscoveryConfig::default()),
        Err(err) => Err(err.into()),
    }
}
