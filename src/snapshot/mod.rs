//! Exportable views of the running means
//!
//! A snapshot holds one series per populated interval, each listing the
//! tiers that have data in ascending order. Renderers pull snapshots when
//! they want them; nothing is pushed.

pub mod builder;
pub mod format;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Tier;

pub use builder::{build_series, interval_label};
pub use format::{render, OutputFormat};

/// Running means at one moment
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    /// Records folded when the snapshot was taken
    pub processed: u64,
    pub series: Vec<Series>,
}

impl Snapshot {
    pub fn new(processed: u64, series: Vec<Series>) -> Self {
        Snapshot {
            taken_at: Utc::now(),
            processed,
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series for one interval, if it has data
    pub fn series_for(&self, interval: usize) -> Option<&Series> {
        self.series.iter().find(|s| s.interval == interval)
    }
}

/// Means of one interval across tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub interval: usize,
    /// e.g. "10-20 mins"
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub tier: Tier,
    pub tier_index: usize,
    pub mean: f64,
    pub count: u64,
}

impl Series {
    pub fn point(&self, tier: Tier) -> Option<&SeriesPoint> {
        self.points.iter().find(|p| p.tier == tier)
    }
}
