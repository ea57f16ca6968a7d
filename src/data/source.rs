//! Record sources
//!
//! Adapters that turn a feed of crawler documents into `RawRecord`s. A
//! document that cannot be decoded is yielded as an `Err` so the caller can
//! log it and move on to the next one.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde_json::Value;

use super::record::RawRecord;
use crate::{GpmError, Result};

/// Anything that delivers match records one at a time
pub trait RecordSource {
    /// Next record, `None` once the source is exhausted
    fn next_record(&mut self) -> Option<Result<RawRecord>>;
}

/// One JSON document per line
pub struct JsonLinesSource<R> {
    reader: R,
    line: String,
    line_number: usize,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        JsonLinesSource {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }

    /// Lines read so far, including blank ones
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl JsonLinesSource<Box<dyn BufRead>> {
    /// Read from a file, or from stdin when the path is absent or "-"
    pub fn open(path: Option<&str>) -> Result<Self> {
        let reader: Box<dyn BufRead> = match path {
            None | Some("-") => Box::new(BufReader::new(io::stdin())),
            Some(p) => Box::new(BufReader::new(File::open(p)?)),
        };
        Ok(JsonLinesSource::new(reader))
    }
}

impl<R: BufRead> RecordSource for JsonLinesSource<R> {
    fn next_record(&mut self) -> Option<Result<RawRecord>> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Some(serde_json::from_str(trimmed).map_err(|e| {
                GpmError::Parse(format!("line {}: {}", self.line_number, e))
            }));
        }
    }
}

/// Records from a database export held in memory
pub struct ExportSource {
    documents: std::vec::IntoIter<(String, Value)>,
}

impl ExportSource {
    /// Accepts either an array of records or an object mapping push ids to records
    pub fn from_value(value: Value) -> Result<Self> {
        let documents: Vec<(String, Value)> = match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            Value::Object(map) => map.into_iter().collect(),
            other => {
                return Err(GpmError::Parse(format!(
                    "export must be a JSON array or object, got {}",
                    json_kind(&other)
                )))
            }
        };
        Ok(ExportSource {
            documents: documents.into_iter(),
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.len() == 0
    }
}

impl RecordSource for ExportSource {
    fn next_record(&mut self) -> Option<Result<RawRecord>> {
        let (key, doc) = self.documents.next()?;
        Some(
            serde_json::from_value(doc)
                .map_err(|e| GpmError::Parse(format!("record {}: {}", key, e))),
        )
    }
}

/// Load a database export file
pub fn read_export<P: AsRef<Path>>(path: P) -> Result<ExportSource> {
    let file = File::open(path.as_ref())?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    ExportSource::from_value(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn collect<S: RecordSource>(mut source: S) -> Vec<Result<RawRecord>> {
        let mut out = Vec::new();
        while let Some(item) = source.next_record() {
            out.push(item);
        }
        out
    }

    #[test]
    fn test_json_lines_skips_blank_and_reports_bad_lines() {
        let input = concat!(
            r#"{"rank": {"tier": "GOLD"}, "match": {"coreData": {"participants": []}}}"#,
            "\n\n",
            "not json\n",
            r#"{"rank": {"tier": "IRON"}}"#,
            "\n"
        );
        let mut source = JsonLinesSource::new(Cursor::new(input));

        let first = source.next_record().unwrap().unwrap();
        assert_eq!(first.tier_label(), Some("GOLD"));

        let bad = source.next_record().unwrap();
        match bad {
            Err(GpmError::Parse(msg)) => assert!(msg.starts_with("line 3")),
            other => panic!("expected parse error, got {:?}", other),
        }

        let last = source.next_record().unwrap().unwrap();
        assert_eq!(last.tier_label(), Some("IRON"));
        assert!(source.next_record().is_none());
        assert_eq!(source.line_number(), 4);
    }

    #[test]
    fn test_export_object_keeps_document_order() {
        let export = serde_json::json!({
            "-Nb": {"rank": {"tier": "SILVER"}},
            "-Na": {"rank": {"tier": "DIAMOND"}},
            "-Nc": 42
        });
        let source = ExportSource::from_value(export).unwrap();
        assert_eq!(source.len(), 3);

        let items = collect(source);
        assert_eq!(items[0].as_ref().unwrap().tier_label(), Some("SILVER"));
        assert_eq!(items[1].as_ref().unwrap().tier_label(), Some("DIAMOND"));
        assert!(items[2].is_err());
    }

    #[test]
    fn test_export_rejects_scalar() {
        assert!(ExportSource::from_value(Value::from(3)).is_err());
    }

    #[test]
    fn test_read_export_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"rank": {{"tier": "MASTER"}}}}, {{"rank": {{"tier": "GOLD"}}}}]"#
        )
        .unwrap();

        let items = collect(read_export(file.path()).unwrap());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().tier_label(), Some("MASTER"));
    }
}
