//! Per-record interval rates
//!
//! Each participant carries cumulative gold sampled at the end of every
//! interval. Interval 0's rate is the first sample over the interval length;
//! interval k's rate is the forward difference of samples k-1 and k over the
//! same length. Rates are then averaged over the participants of the record.
//!
//! The record covers as many intervals as its shortest usable timeline allows
//! (one fewer than the sample count, since the last sample closes a partial
//! window), capped at `max_intervals`. A participant with a hole in its
//! timeline drops out of the affected intervals only.

use serde_json::Value;
use thiserror::Error;

use crate::data::{Participant, RawRecord};
use crate::{AggregationConfig, Tier};

/// Average rate per interval for one record; `None` marks a skipped interval
pub type IntervalVector = Vec<Option<f64>>;

/// Why a record, or one interval of it, could not be used
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("no participant has a usable gold timeline")]
    NoUsableParticipants,

    #[error("unknown rank tier: {0:?}")]
    UnknownTier(String),

    #[error("no participant contributed to interval {interval}")]
    ZeroParticipants { interval: usize },
}

/// Why a participant's timeline was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusableReason {
    MissingTimeline,
    MissingGold,
    NotASequence,
    TooShort,
}

/// What became of one participant of the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantOutcome {
    Usable { checkpoints: usize },
    Unusable(UnusableReason),
}

/// Result of extracting one record
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub tier: Tier,
    pub intervals: IntervalVector,
    pub participants: Vec<ParticipantOutcome>,
    /// `ZeroParticipants` for every interval left empty
    pub skipped: Vec<ExtractionError>,
}

impl Extraction {
    /// Intervals that received a value
    pub fn rates(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.intervals
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }

    pub fn usable_participants(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| matches!(p, ParticipantOutcome::Usable { .. }))
            .count()
    }
}

/// Extractor bound to an interval cap and length
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    max_intervals: usize,
    interval_minutes: f64,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&AggregationConfig::default())
    }
}

impl Extractor {
    /// A cap of zero intervals is treated as one.
    pub fn new(config: &AggregationConfig) -> Self {
        Extractor {
            max_intervals: config.max_intervals.max(1),
            interval_minutes: config.interval_minutes,
        }
    }

    pub fn extract(&self, record: &RawRecord) -> Result<Extraction, ExtractionError> {
        let tier = resolve_tier(record)?;

        let mut participants = Vec::with_capacity(record.participants().len());
        let mut timelines = Vec::new();
        for participant in record.participants() {
            match read_samples(participant) {
                Ok(samples) => {
                    participants.push(ParticipantOutcome::Usable {
                        checkpoints: samples.len(),
                    });
                    timelines.push(samples);
                }
                Err(reason) => participants.push(ParticipantOutcome::Unusable(reason)),
            }
        }

        let shortest = timelines
            .iter()
            .map(Vec::len)
            .min()
            .ok_or(ExtractionError::NoUsableParticipants)?;
        let interval_count = (shortest - 1).min(self.max_intervals);

        let mut intervals = Vec::with_capacity(interval_count);
        let mut skipped = Vec::new();
        for interval in 0..interval_count {
            let rates: Vec<f64> = timelines
                .iter()
                .filter_map(|samples| interval_gold(samples, interval))
                .map(|gold| gold / self.interval_minutes)
                .filter(|rate| rate.is_finite())
                .collect();

            match mean_of(&rates) {
                Some(mean) => intervals.push(Some(mean)),
                None => {
                    skipped.push(ExtractionError::ZeroParticipants { interval });
                    intervals.push(None);
                }
            }
        }

        if intervals.iter().all(Option::is_none) {
            return Err(ExtractionError::NoUsableParticipants);
        }

        Ok(Extraction {
            tier,
            intervals,
            participants,
            skipped,
        })
    }
}

/// Mean of finite rates; each term is scaled before summing so large rates
/// cannot overflow the total
fn mean_of(rates: &[f64]) -> Option<f64> {
    if rates.is_empty() {
        return None;
    }
    let n = rates.len() as f64;
    Some(rates.iter().map(|r| r / n).sum::<f64>()).filter(|m| m.is_finite())
}

/// Extract with the default 10-minute intervals.
///
/// `max_intervals` should be at least 1; zero is treated as one.
pub fn extract(record: &RawRecord, max_intervals: usize) -> Result<Extraction, ExtractionError> {
    let config = AggregationConfig {
        max_intervals,
        ..AggregationConfig::default()
    };
    Extractor::new(&config).extract(record)
}

fn resolve_tier(record: &RawRecord) -> Result<Tier, ExtractionError> {
    match record.tier_label() {
        Some(label) => {
            Tier::from_label(label).ok_or_else(|| ExtractionError::UnknownTier(label.to_string()))
        }
        None => Err(ExtractionError::UnknownTier(String::new())),
    }
}

/// Gold earned inside one interval, if both bounding samples are present
fn interval_gold(samples: &[Option<f64>], interval: usize) -> Option<f64> {
    let end = (*samples.get(interval)?)?;
    if interval == 0 {
        return Some(end);
    }
    let start = (*samples.get(interval - 1)?)?;
    Some(end - start)
}

/// Cumulative samples of a participant; holes are `None`
fn read_samples(participant: &Participant) -> Result<Vec<Option<f64>>, UnusableReason> {
    let timeline = participant
        .timeline
        .as_ref()
        .ok_or(UnusableReason::MissingTimeline)?;
    if !timeline.is_object() {
        return Err(UnusableReason::MissingTimeline);
    }
    let gold = participant.gold().ok_or(UnusableReason::MissingGold)?;

    let samples: Vec<Option<f64>> = match gold {
        Value::Array(items) => items.iter().map(sample_value).collect(),
        Value::Object(map) => map.values().map(sample_value).collect(),
        _ => return Err(UnusableReason::NotASequence),
    };

    if samples.len() < 2 {
        return Err(UnusableReason::TooShort);
    }
    Ok(samples)
}

fn sample_value(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}
