//! Accumulator table keyed by (interval, tier)

use std::collections::BTreeMap;

use super::accumulator::Accumulator;
use crate::Tier;

/// Running means per interval and tier
///
/// Accumulators are created on first contribution and only removed by
/// `clear`. Intervals at or beyond `max_intervals` are never stored.
#[derive(Debug, Clone)]
pub struct AggregationStore {
    intervals: BTreeMap<usize, BTreeMap<Tier, Accumulator>>,
    max_intervals: usize,
}

impl AggregationStore {
    pub fn new(max_intervals: usize) -> Self {
        AggregationStore {
            intervals: BTreeMap::new(),
            max_intervals,
        }
    }

    pub fn max_intervals(&self) -> usize {
        self.max_intervals
    }

    /// Fold one record's interval rates into the accumulators for `tier`.
    ///
    /// Skipped intervals (`None`) leave their accumulator untouched. Returns the
    /// number of values folded.
    pub fn fold(&mut self, tier: Tier, rates: &[Option<f64>]) -> usize {
        let mut folded = 0;
        for (interval, rate) in rates.iter().enumerate().take(self.max_intervals) {
            let Some(rate) = rate.filter(|r| r.is_finite()) else {
                continue;
            };
            let pushed = self
                .intervals
                .entry(interval)
                .or_default()
                .entry(tier)
                .or_default()
                .push(rate);
            if pushed {
                folded += 1;
            }
        }
        folded
    }

    /// (mean, count) at one key
    pub fn get(&self, interval: usize, tier: Tier) -> Option<(f64, u64)> {
        self.intervals
            .get(&interval)
            .and_then(|tiers| tiers.get(&tier))
            .map(Accumulator::value)
    }

    /// Accumulators of one interval in ascending tier order
    pub fn interval(&self, interval: usize) -> Option<&BTreeMap<Tier, Accumulator>> {
        self.intervals.get(&interval)
    }

    /// Number of populated (interval, tier) keys
    pub fn len(&self) -> usize {
        self.intervals.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_creates_accumulators_lazily() {
        let mut store = AggregationStore::new(6);
        assert!(store.is_empty());

        let folded = store.fold(Tier::Gold, &[Some(11.0), Some(14.5)]);
        assert_eq!(folded, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0, Tier::Gold), Some((11.0, 1)));
        assert_eq!(store.get(1, Tier::Gold), Some((14.5, 1)));
        assert_eq!(store.get(0, Tier::Silver), None);
        assert_eq!(store.get(2, Tier::Gold), None);
    }

    #[test]
    fn test_fold_updates_running_mean() {
        let mut store = AggregationStore::new(6);
        store.fold(Tier::Gold, &[Some(11.0)]);
        store.fold(Tier::Gold, &[Some(9.0)]);
        assert_eq!(store.get(0, Tier::Gold), Some((10.0, 2)));
    }

    #[test]
    fn test_skipped_interval_not_counted() {
        let mut store = AggregationStore::new(6);
        store.fold(Tier::Iron, &[Some(5.0), None, Some(7.0)]);
        assert_eq!(store.get(1, Tier::Iron), None);
        assert!(store.interval(1).is_none());
        assert_eq!(store.get(2, Tier::Iron), Some((7.0, 1)));
    }

    #[test]
    fn test_fold_never_exceeds_interval_cap() {
        let mut store = AggregationStore::new(2);
        assert_eq!(store.max_intervals(), 2);
        let folded = store.fold(Tier::Master, &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(folded, 2);
        assert!(store.interval(2).is_none());
        assert!(store.interval(3).is_none());
    }

    #[test]
    fn test_tiers_kept_in_order() {
        let mut store = AggregationStore::new(6);
        store.fold(Tier::Challenger, &[Some(1.0)]);
        store.fold(Tier::Iron, &[Some(2.0)]);
        store.fold(Tier::Gold, &[Some(3.0)]);

        let tiers: Vec<Tier> = store.interval(0).unwrap().keys().copied().collect();
        assert_eq!(tiers, vec![Tier::Iron, Tier::Gold, Tier::Challenger]);
    }

    #[test]
    fn test_clear() {
        let mut store = AggregationStore::new(6);
        store.fold(Tier::Gold, &[Some(1.0)]);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get(0, Tier::Gold), None);
    }
}
