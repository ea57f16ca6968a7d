//! Synthetic match generator
//!
//! Produces crawler-shaped records with plausible gold curves so the
//! aggregation can be exercised without a live feed. A fraction of
//! participants is deliberately broken.

use std::io::Write;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde_json::json;

use super::record::{Participant, RawRecord};
use crate::{Result, Tier};

/// Synthetic feed settings
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub records: usize,
    pub participants_per_match: usize,
    /// Probability that a participant's timeline is broken
    pub malformed_rate: f64,
    /// Probability that a record carries a tier label outside the known ranks
    pub unknown_tier_rate: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            records: 100,
            participants_per_match: 10,
            malformed_rate: 0.05,
            unknown_tier_rate: 0.01,
            seed: 42,
        }
    }
}

/// Generate a batch of synthetic records
pub fn generate(config: &SimulationConfig) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.records)
        .map(|_| generate_record(&mut rng, config))
        .collect()
}

fn generate_record(rng: &mut StdRng, config: &SimulationConfig) -> RawRecord {
    let tier = Tier::ALL[rng.gen_range(0..Tier::COUNT)];
    let label = if rng.gen_bool(config.unknown_tier_rate) {
        "UNRANKED"
    } else {
        tier.label()
    };

    // Checkpoints at 10, 20, ... minutes plus the partial final window
    let checkpoints = rng.gen_range(3..=7);

    let participants = (0..config.participants_per_match)
        .map(|_| {
            if rng.gen_bool(config.malformed_rate) {
                malformed_participant(rng)
            } else {
                let samples = gold_curve(rng, tier, checkpoints);
                Participant::with_labelled_gold(&samples, 10)
            }
        })
        .collect();

    RawRecord::new(label, participants)
}

/// Cumulative gold at each checkpoint; higher tiers farm faster
fn gold_curve(rng: &mut StdRng, tier: Tier, checkpoints: usize) -> Vec<f64> {
    let base_gpm = 280.0 + 22.0 * tier.index() as f64;
    let mut total = 0.0;
    (0..checkpoints)
        .map(|i| {
            let gpm = (base_gpm + 35.0 * i as f64) * rng.gen_range(0.8..1.2);
            total += (gpm * 10.0).round();
            total
        })
        .collect()
}

fn malformed_participant(rng: &mut StdRng) -> Participant {
    match rng.gen_range(0..4) {
        0 => Participant::empty(),
        1 => Participant::with_timeline(json!({ "creepsPerMin": { "0-10": 7.2 } })),
        2 => Participant::with_timeline(json!({ "gold": "unavailable" })),
        _ => Participant::with_timeline(json!({ "gold": { "0-10": 3100.0 } })),
    }
}

/// Write records as JSON lines
pub fn write_json_lines<W: Write>(records: &[RawRecord], mut writer: W) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
