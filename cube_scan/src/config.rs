// THEORY:
// Tunable scanner configuration. Defaults: 8px sampling windows, a five-frame
// history per face and a centered region half the frame's shorter side. A
// config is validated once, when a pipeline or pool is built from it.

use crate::core_modules::consensus::DEFAULT_HISTORY_CAPACITY;
use crate::core_modules::facelet_sampler::DEFAULT_SAMPLE_RADIUS;
use crate::core_modules::region_locator::Region;
use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a `ScanPipeline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Half-width of the square window averaged around each cell center.
    pub sample_radius: u32,
    /// Observations remembered per face for consensus voting.
    pub history_capacity: usize,
    /// Side of the centered region as a fraction of the frame's shorter side.
    pub region_fraction: f64,
    /// Confidence reported for the centered region.
    pub region_confidence: f64,
    /// Operator-selected region. Replaces the centered heuristic when set.
    pub fixed_region: Option<Region>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sample_radius: DEFAULT_SAMPLE_RADIUS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            region_fraction: 0.5,
            region_confidence: 0.7,
            fixed_region: None,
        }
    }
}

impl ScanConfig {
    /// Loads and validates a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: ScanConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(ScanError::InvalidConfig(
                "history_capacity must be at least 1".into(),
            ));
        }
        if !(self.region_fraction > 0.0 && self.region_fraction <= 1.0) {
            return Err(ScanError::InvalidConfig(format!(
                "region_fraction must be in (0, 1], got {}",
                self.region_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.region_confidence) {
            return Err(ScanError::InvalidConfig(format!(
                "region_confidence must be in [0, 1], got {}",
                self.region_confidence
            )));
        }
        if let Some(region) = &self.fixed_region {
            if region.width <= 0.0 || region.height <= 0.0 {
                return Err(ScanError::InvalidConfig(
                    "fixed_region must have a positive width and height".into(),
                ));
            }
            if !(0.0..=1.0).contains(&region.confidence) {
                return Err(ScanError::InvalidConfig(format!(
                    "fixed_region confidence must be in [0, 1], got {}",
                    region.confidence
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ScanConfig::from_json_str(r#"{ "sample_radius": 4 }"#).unwrap();
        assert_eq!(config.sample_radius, 4);
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
        assert_eq!(config.region_fraction, 0.5);
    }

    #[test]
    fn rejects_zero_history() {
        let err = ScanConfig::from_json_str(r#"{ "history_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ScanConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ScanError::ConfigParse(_)));
    }

    #[test]
    fn parses_fixed_region() {
        let config = ScanConfig::from_json_str(
            r#"{ "fixed_region": { "x": 1, "y": 2, "width": 30, "height": 30, "confidence": 0.9 } }"#,
        )
        .unwrap();
        assert_eq!(config.fixed_region.unwrap().width, 30.0);
    }
}
