//! Running aggregation
//!
//! Long-lived running means keyed by (interval, tier) and the engine that
//! feeds records into them.

pub mod accumulator;
pub mod engine;
pub mod store;

pub use accumulator::Accumulator;
pub use engine::{Engine, EngineStats, IngestOutcome};
pub use store::AggregationStore;
