//! Feature extraction
//!
//! Turns one raw match into per-interval gold-per-minute rates.

pub mod extract;

pub use extract::{
    extract, Extraction, ExtractionError, Extractor, IntervalVector, ParticipantOutcome,
    UnusableReason,
};
