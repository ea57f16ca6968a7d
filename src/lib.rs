//! Gold-per-minute tracking by rank tier
//!
//! Folds a stream of crawled match records into running averages of gold
//! earned per minute, bucketed by match interval (0-10 mins, 10-20 mins, ...)
//! and by the rank tier of the match.

pub mod aggregate;
pub mod data;
pub mod features;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use aggregate::{Engine, EngineStats, IngestOutcome};
pub use data::{Participant, RawRecord};
pub use features::{extract, ExtractionError};
pub use snapshot::{Series, SeriesPoint, Snapshot};

/// Rank tier of a match, in ascending order of skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    /// Number of tiers
    pub const COUNT: usize = 9;

    /// All tiers, ordered by index
    pub const ALL: [Tier; Tier::COUNT] = [
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Diamond,
        Tier::Master,
        Tier::Grandmaster,
        Tier::Challenger,
    ];

    /// Ordinal position of the tier (0 = IRON, 8 = CHALLENGER)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Tier::ALL.get(index).copied()
    }

    /// Label as sent by the crawler
    pub fn label(self) -> &'static str {
        match self {
            Tier::Iron => "IRON",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Diamond => "DIAMOND",
            Tier::Master => "MASTER",
            Tier::Grandmaster => "GRANDMASTER",
            Tier::Challenger => "CHALLENGER",
        }
    }

    /// Resolve a crawler label, ignoring surrounding whitespace and case
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_uppercase();
        Tier::ALL.iter().copied().find(|t| t.label() == label)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = GpmError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Tier::from_label(s).ok_or_else(|| GpmError::Parse(format!("Unknown tier: {}", s)))
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum GpmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, GpmError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Number of intervals tracked per match (0-10 mins is interval 0)
    pub max_intervals: usize,
    /// Records folded before further records are dropped
    pub max_points: u64,
    /// Length of one interval in minutes, used to turn gold into gold per minute
    pub interval_minutes: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            max_intervals: 6,
            max_points: 4000,
            interval_minutes: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Snapshot rendering: table, json or csv
    pub format: String,
    /// Print a snapshot every N folded records (0 = only at the end)
    pub refresh_every: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: "table".to_string(),
            refresh_every: 0,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GpmError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| GpmError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GpmError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.aggregation.validate()
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_intervals == 0 {
            return Err(GpmError::Config(
                "aggregation.max_intervals must be at least 1".to_string(),
            ));
        }
        if !self.interval_minutes.is_finite() || self.interval_minutes <= 0.0 {
            return Err(GpmError::Config(format!(
                "aggregation.interval_minutes must be positive, got {}",
                self.interval_minutes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order_and_index() {
        assert_eq!(Tier::Iron.index(), 0);
        assert_eq!(Tier::Gold.index(), 3);
        assert_eq!(Tier::Challenger.index(), 8);
        assert!(Tier::Silver < Tier::Platinum);
        for (i, tier) in Tier::ALL.iter().enumerate() {
            assert_eq!(tier.index(), i);
            assert_eq!(Tier::from_index(i), Some(*tier));
        }
        assert_eq!(Tier::from_index(Tier::COUNT), None);
    }

    #[test]
    fn test_tier_from_label() {
        assert_eq!(Tier::from_label("GOLD"), Some(Tier::Gold));
        assert_eq!(Tier::from_label(" grandmaster "), Some(Tier::Grandmaster));
        assert_eq!(Tier::from_label("UNRANKED"), None);
        assert!("WOOD".parse::<Tier>().is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.aggregation.max_points = 12;
        config.output.format = "csv".to_string();
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded.aggregation, config.aggregation);
        assert_eq!(loaded.output.format, "csv");
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[aggregation]\nmax_points = 10\n").unwrap();

        let loaded = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.aggregation.max_points, 10);
        assert_eq!(loaded.aggregation.max_intervals, 6);
        assert_eq!(loaded.output.format, "table");
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let mut config = Config::default();
        config.aggregation.max_intervals = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.aggregation.interval_minutes = 0.0;
        assert!(config.validate().is_err());
    }
}
