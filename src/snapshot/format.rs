//! Text renderings of a snapshot

use std::collections::BTreeSet;
use std::fmt::Write;

use super::Snapshot;
use crate::{GpmError, Result, Tier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = GpmError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(GpmError::Parse(format!(
                "Unknown format: {}. Use table, json, or csv.",
                s
            ))),
        }
    }
}

pub fn render(snapshot: &Snapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(snapshot)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(snapshot)?),
        OutputFormat::Csv => Ok(render_csv(snapshot)),
    }
}

/// One row per tier with data, one column per populated interval
fn render_table(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Mean gold per minute per player");
    let _ = writeln!(out, "───────────────────────────────");

    if snapshot.is_empty() {
        let _ = writeln!(out, "  (no data)");
    } else {
        let tiers: BTreeSet<Tier> = snapshot
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.tier))
            .collect();

        let _ = write!(out, "{:<12}", "Tier");
        for series in &snapshot.series {
            let _ = write!(out, " {:>12}", series.label);
        }
        let _ = writeln!(out);

        for tier in tiers {
            let _ = write!(out, "{:<12}", tier.label());
            for series in &snapshot.series {
                match series.point(tier) {
                    Some(p) => {
                        let _ = write!(out, " {:>12.1}", p.mean);
                    }
                    None => {
                        let _ = write!(out, " {:>12}", "-");
                    }
                }
            }
            let _ = writeln!(out);
        }
    }

    let _ = writeln!(out, "───────────────────────────────");
    let _ = writeln!(out, "  Loaded matches: {}", snapshot.processed);
    out
}

fn render_csv(snapshot: &Snapshot) -> String {
    let mut out = String::from("interval,label,tier,tier_index,mean,count\n");
    for series in &snapshot.series {
        for p in &series.points {
            let _ = writeln!(
                out,
                "{},{},{},{},{:.4},{}",
                series.interval, series.label, p.tier, p.tier_index, p.mean, p.count
            );
        }
    }
    out
}
