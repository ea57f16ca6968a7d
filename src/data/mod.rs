//! Match record ingestion
//!
//! Raw crawler documents, the sources that deliver them, and a synthetic
//! generator for demos.

pub mod record;
pub mod simulate;
pub mod source;

pub use record::{Participant, RawRecord};
pub use source::{read_export, ExportSource, JsonLinesSource, RecordSource};
