//! Harness configuration.

use serde::{Deserialize, Serialize};

use crate::diffuser::DiffusionMethod;
use crate::error::{GroverError, GroverResult};

/// Shots drawn per test when nothing else is configured.
pub const DEFAULT_SHOTS: u64 = 1024;

/// Minimum observed probability of the marked item for a test to pass.
pub const DEFAULT_SUCCESS_THRESHOLD: f64 = 0.75;

/// Sampling and verdict settings for Grover test runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Number of measurement shots per test.
    pub shots: u64,
    /// Inclusive success threshold on the marked item's observed frequency.
    pub success_threshold: f64,
    /// Sampling seed; `None` draws from the thread-local generator.
    pub seed: Option<u64>,
    /// Diffuser realization used by the engine.
    pub diffusion: DiffusionMethod,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            seed: None,
            diffusion: DiffusionMethod::Reflection,
        }
    }
}

impl HarnessConfig {
    /// Set the number of shots.
    #[must_use]
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Set the success threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.success_threshold = threshold;
        self
    }

    /// Fix the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose the diffuser realization.
    #[must_use]
    pub fn with_diffusion(mut self, diffusion: DiffusionMethod) -> Self {
        self.diffusion = diffusion;
        self
    }

    /// Check that shots and threshold are usable.
    pub fn validate(&self) -> GroverResult<()> {
        if self.shots == 0 {
            return Err(GroverError::InvalidShots);
        }
        if !(0.0..=1.0).contains(&self.success_threshold) {
            return Err(GroverError::InvalidThreshold(self.success_threshold));
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.shots, 1024);
        assert_eq!(config.success_threshold, 0.75);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = HarnessConfig::from_json(r#"{ "seed": 9, "diffusion": "decomposed" }"#).unwrap();
        assert_eq!(config.shots, DEFAULT_SHOTS);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.diffusion, DiffusionMethod::Decomposed);
    }

    #[test]
    fn test_json_round_trip() {
        let config = HarnessConfig::default().with_shots(2048).with_seed(3);
        let parsed = HarnessConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            HarnessConfig::default().with_shots(0).validate(),
            Err(GroverError::InvalidShots)
        );
        assert_eq!(
            HarnessConfig::default().with_threshold(1.5).validate(),
            Err(GroverError::InvalidThreshold(1.5))
        );
        assert!(HarnessConfig::default().with_threshold(f64::NAN).validate().is_err());
    }
}
