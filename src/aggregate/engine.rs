//! Aggregation engine
//!
//! Owns the accumulator table and the record counters. One ingestion path
//! calls `on_record`; any number of readers may call `get`, `snapshot` and
//! `stats` at the same time. A record is folded under a single write lock, so
//! every key it touches is updated as a unit and readers never see half a
//! record. `reset` takes the same lock and so waits for in-flight folds and
//! reads.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::store::AggregationStore;
use crate::data::RawRecord;
use crate::features::{ExtractionError, Extractor};
use crate::snapshot::{build_series, Snapshot};
use crate::{AggregationConfig, Tier};

/// What happened to one delivered record
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Folded into the running means
    Folded { tier: Tier, intervals: usize },
    /// `max_points` already reached; the record was not looked at
    Dropped,
    /// The record could not be used and left no trace in the store
    Discarded(ExtractionError),
}

/// Record counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Records folded since the last reset
    pub processed: u64,
    /// Records turned away by the `max_points` cap
    pub dropped: u64,
    /// Records that failed extraction
    pub discarded: u64,
}

pub struct Engine {
    config: AggregationConfig,
    extractor: Extractor,
    store: RwLock<AggregationStore>,
    processed: AtomicU64,
    dropped: AtomicU64,
    discarded: AtomicU64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(AggregationConfig::default())
    }
}

impl Engine {
    pub fn new(config: AggregationConfig) -> Self {
        Engine {
            config,
            extractor: Extractor::new(&config),
            store: RwLock::new(AggregationStore::new(config.max_intervals)),
            processed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Admission check, extraction and fold for one delivered record.
    ///
    /// Never fails: unusable records are discarded and records past the cap are
    /// dropped, both leaving the store and `processed` untouched.
    pub fn on_record(&self, record: &RawRecord) -> IngestOutcome {
        if self.processed.load(Ordering::Acquire) >= self.config.max_points {
            return self.drop_record();
        }

        let extraction = match self.extractor.extract(record) {
            Ok(extraction) => extraction,
            Err(e) => {
                log::debug!("Skipping record: {}", e);
                self.discarded.fetch_add(1, Ordering::Relaxed);
                return IngestOutcome::Discarded(e);
            }
        };
        for skipped in &extraction.skipped {
            log::debug!("{} tier record: {}", extraction.tier, skipped);
        }

        let mut store = self.store.write();
        // Another writer may have filled the last slot while we extracted
        if self.processed.load(Ordering::Acquire) >= self.config.max_points {
            drop(store);
            return self.drop_record();
        }
        let intervals = store.fold(extraction.tier, &extraction.intervals);
        self.processed.fetch_add(1, Ordering::AcqRel);

        IngestOutcome::Folded {
            tier: extraction.tier,
            intervals,
        }
    }

    fn drop_record(&self) -> IngestOutcome {
        if self.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
            log::info!(
                "Reached {} processed records, dropping further records",
                self.config.max_points
            );
        }
        IngestOutcome::Dropped
    }

    /// (mean, count) for one interval and tier
    pub fn get(&self, interval: usize, tier: Tier) -> Option<(f64, u64)> {
        self.store.read().get(interval, tier)
    }

    /// Records folded since the last reset
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            processed: self.processed.load(Ordering::Acquire),
            dropped: self.dropped.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }

    /// Current running means as ordered series
    pub fn snapshot(&self) -> Snapshot {
        let store = self.store.read();
        let processed = self.processed.load(Ordering::Acquire);
        let series = build_series(&store, self.config.max_intervals, self.config.interval_minutes);
        Snapshot::new(processed, series)
    }

    /// Clear every accumulator and counter
    pub fn reset(&self) {
        let mut store = self.store.write();
        store.clear();
        self.processed.store(0, Ordering::Release);
        self.dropped.store(0, Ordering::Relaxed);
        self.discarded.store(0, Ordering::Relaxed);
        log::info!("Aggregation state reset");
    }
}
