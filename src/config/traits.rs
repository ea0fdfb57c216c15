use crate::error::{DiscoveryError, Result};
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;

    /// Every violated constraint, in field order
    fn violations(&self) -> Vec<String>;

    /// Fails with one error listing all violations
    fn validate(&self) -> Result<()> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DiscoveryError::Configuration(violations.join("; ")))
        }
    }
}
