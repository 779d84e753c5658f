//! Configuration loading for the inventory engine.
//!
//! Settings are plain TOML; every field has a default so an empty document is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted `tolerance_kg`. The tolerance only absorbs float error.
pub const MAX_TOLERANCE_KG: f64 = 1e-6;

/// What to do when a request cannot be satisfied in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortfallPolicy {
    /// Satisfy as much as possible, log, and report the remainder in the outcome.
    #[default]
    Lenient,
    /// Reject the whole request before touching any store.
    Strict,
}

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Policy for stores that exceed the remaining capacity
    pub store_shortfall: ShortfallPolicy,
    /// Policy for retrievals that exceed the stock present
    pub retrieve_shortfall: ShortfallPolicy,
    /// Float slack, in kg, when comparing a request with the room or stock
    /// available. At most [`MAX_TOLERANCE_KG`].
    pub tolerance_kg: f64,
    /// An inventory weighing at most this many kg counts as empty
    pub empty_threshold_kg: f64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            store_shortfall: ShortfallPolicy::Lenient,
            retrieve_shortfall: ShortfallPolicy::Lenient,
            tolerance_kg: 1e-9,
            empty_threshold_kg: 1e-9,
        }
    }
}

impl InventoryConfig {
    /// Configuration that rejects every shortfall outright.
    pub fn strict() -> Self {
        Self {
            store_shortfall: ShortfallPolicy::Strict,
            retrieve_shortfall: ShortfallPolicy::Strict,
            ..Self::default()
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that both thresholds are usable numbers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance_kg.is_finite() && (0.0..=MAX_TOLERANCE_KG).contains(&self.tolerance_kg)) {
            return Err(ConfigError::Invalid(format!(
                "tolerance_kg must be between 0 and {MAX_TOLERANCE_KG}, got {}",
                self.tolerance_kg
            )));
        }
        if !(self.empty_threshold_kg.is_finite() && self.empty_threshold_kg >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "empty_threshold_kg must be a finite, non-negative number, got {}",
                self.empty_threshold_kg
            )));
        }
        Ok(())
    }

    /// Tolerance actually applied, for configurations built in code without
    /// going through [`validate`](Self::validate).
    pub fn slack_kg(&self) -> f64 {
        if self.tolerance_kg.is_finite() {
            self.tolerance_kg.clamp(0.0, MAX_TOLERANCE_KG)
        } else {
            0.0
        }
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
