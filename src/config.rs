//! Generator Configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Candidates scored per variant before the best is kept.
pub const DEFAULT_CANDIDATE_COUNT: u32 = 5;
/// Score at which candidate selection stops early.
pub const DEFAULT_MIN_QUALITY_SCORE: f64 = 80.0;
pub const DEFAULT_VARIATIONS: u32 = 3;
/// Records kept by the dedup ledger.
pub const LEDGER_CAPACITY: usize = 1000;
/// Mixed into every identity hash. Changing it invalidates all prior hashes.
pub const FORMAT_VERSION: &str = "logoforge/1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    #[serde(default = "default_candidate_count")]
    pub candidate_count: u32,
    #[serde(default = "default_min_quality_score")]
    pub min_quality_score: f64,
    #[serde(default = "default_variations")]
    pub default_variations: u32,
    #[serde(default = "default_ledger_capacity")]
    pub ledger_capacity: usize,
    #[serde(default)]
    pub avoid_repeats: bool,
    #[serde(default = "default_max_rerolls")]
    pub max_rerolls: u32,
    #[serde(default = "default_format_version")]
    pub format_version: String,
}

fn default_candidate_count() -> u32 { DEFAULT_CANDIDATE_COUNT }
fn default_min_quality_score() -> f64 { DEFAULT_MIN_QUALITY_SCORE }
fn default_variations() -> u32 { DEFAULT_VARIATIONS }
fn default_ledger_capacity() -> usize { LEDGER_CAPACITY }
fn default_max_rerolls() -> u32 { 3 }
fn default_format_version() -> String { FORMAT_VERSION.to_string() }

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            candidate_count: default_candidate_count(),
            min_quality_score: default_min_quality_score(),
            default_variations: default_variations(),
            ledger_capacity: default_ledger_capacity(),
            avoid_repeats: false,
            max_rerolls: default_max_rerolls(),
            format_version: default_format_version(),
        }
    }
}

impl GeneratorConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = GeneratorConfig::default();
        assert_eq!(c.candidate_count, 5);
        assert_eq!(c.min_quality_score, 80.0);
        assert_eq!(c.default_variations, 3);
        assert_eq!(c.ledger_capacity, 1000);
        assert!(!c.avoid_repeats);
        assert_eq!(c.format_version, FORMAT_VERSION);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let c: GeneratorConfig = serde_json::from_str(r#"{"candidateCount": 2, "avoidRepeats": true}"#).unwrap();
        assert_eq!(c.candidate_count, 2);
        assert!(c.avoid_repeats);
        assert_eq!(c.min_quality_score, DEFAULT_MIN_QUALITY_SCORE);
        assert_eq!(c.max_rerolls, 3);
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        assert_eq!(GeneratorConfig::load(&missing).unwrap(), GeneratorConfig::default());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{candidateCount").unwrap();
        assert!(matches!(GeneratorConfig::load(&bad), Err(ConfigError::Parse(_))));

        let good = dir.path().join("good.json");
        fs::write(&good, r#"{"formatVersion": "logoforge/2"}"#).unwrap();
        assert_eq!(GeneratorConfig::load(&good).unwrap().format_version, "logoforge/2");
    }
}
