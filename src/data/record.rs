//! Raw match documents as produced by the crawler feed
//!
//! Only the fields the aggregation reads are modelled. Participant timelines
//! stay untyped so a malformed timeline never fails decoding of the record
//! around it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A single crawled match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "match", default)]
    pub game: MatchData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<RankInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchData {
    #[serde(rename = "coreData", default)]
    pub core_data: CoreData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreData {
    #[serde(default)]
    pub participants: Vec<Participant>,
}

/// Rank attached to the match by the crawler's elo estimator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

/// One player of a match
///
/// Any JSON value decodes into a participant; whatever is not an object with a
/// `timeline` simply has no timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct Participant {
    pub timeline: Option<Value>,
}

impl From<Value> for Participant {
    fn from(value: Value) -> Self {
        let timeline = match value {
            Value::Object(mut map) => map.remove("timeline"),
            _ => None,
        };
        Participant { timeline }
    }
}

impl From<Participant> for Value {
    fn from(participant: Participant) -> Self {
        let mut map = Map::new();
        if let Some(timeline) = participant.timeline {
            map.insert("timeline".to_string(), timeline);
        }
        Value::Object(map)
    }
}

impl Participant {
    /// Participant whose gold timeline is a plain array of cumulative samples
    pub fn with_gold(samples: &[f64]) -> Self {
        Participant {
            timeline: Some(json!({ "gold": samples })),
        }
    }

    /// Participant whose gold timeline is keyed by window label ("0-10", "10-20", ...)
    pub fn with_labelled_gold(samples: &[f64], interval_minutes: u32) -> Self {
        let mut gold = Map::new();
        for (i, sample) in samples.iter().enumerate() {
            let start = i as u32 * interval_minutes;
            let label = if i + 1 == samples.len() {
                format!("{}-end", start)
            } else {
                format!("{}-{}", start, start + interval_minutes)
            };
            gold.insert(label, json!(sample));
        }
        Participant {
            timeline: Some(json!({ "gold": gold })),
        }
    }

    /// Participant with an arbitrary timeline value
    pub fn with_timeline(timeline: Value) -> Self {
        Participant {
            timeline: Some(timeline),
        }
    }

    /// Participant without any timeline
    pub fn empty() -> Self {
        Participant::default()
    }

    /// The raw gold timeline, if present
    pub fn gold(&self) -> Option<&Value> {
        self.timeline
            .as_ref()
            .and_then(|t| t.get("gold"))
            .filter(|g| !g.is_null())
    }
}

impl RawRecord {
    pub fn new(tier: &str, participants: Vec<Participant>) -> Self {
        RawRecord {
            game: MatchData {
                core_data: CoreData { participants },
            },
            rank: Some(RankInfo {
                tier: Some(tier.to_string()),
            }),
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.game.core_data.participants
    }

    /// Tier label as sent by the crawler
    pub fn tier_label(&self) -> Option<&str> {
        self.rank.as_ref().and_then(|r| r.tier.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_crawler_document() {
        let doc = r#"{
            "match": {"coreData": {"gameId": 1, "participants": [
                {"timeline": {"gold": {"0-10": 100, "10-20": 250, "20-end": 400}}},
                {"timeline": {"creeps": {"0-10": 5}}},
                {"stats": {}},
                null
            ]}},
            "rank": {"tier": "GOLD", "division": "II"}
        }"#;

        let record: RawRecord = serde_json::from_str(doc).unwrap();
        assert_eq!(record.tier_label(), Some("GOLD"));
        assert_eq!(record.participants().len(), 4);
        assert!(record.participants()[0].gold().is_some());
        assert!(record.participants()[1].timeline.is_some());
        assert!(record.participants()[1].gold().is_none());
        assert!(record.participants()[2].timeline.is_none());
        assert!(record.participants()[3].timeline.is_none());
    }

    #[test]
    fn test_decode_missing_sections() {
        let record: RawRecord = serde_json::from_str("{}").unwrap();
        assert!(record.participants().is_empty());
        assert_eq!(record.tier_label(), None);
    }

    #[test]
    fn test_labelled_gold_keeps_window_order() {
        let p = Participant::with_labelled_gold(&[1.0, 2.0, 3.0], 10);
        let gold = p.gold().unwrap().as_object().unwrap();
        let keys: Vec<&str> = gold.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["0-10", "10-20", "20-end"]);
    }

    #[test]
    fn test_record_serializes_to_crawler_shape() {
        let record = RawRecord::new("SILVER", vec![Participant::with_gold(&[1.0, 2.0])]);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["rank"]["tier"], "SILVER");
        assert_eq!(
            value["match"]["coreData"]["participants"][0]["timeline"]["gold"][1],
            2.0
        );
    }
}
