//! Snapshot construction from the accumulator table

use super::{Series, SeriesPoint};
use crate::aggregate::AggregationStore;

/// Ordered series for intervals `0..max_intervals`.
///
/// Intervals without any accumulator are left out rather than emitted empty.
pub fn build_series(
    store: &AggregationStore,
    max_intervals: usize,
    interval_minutes: f64,
) -> Vec<Series> {
    (0..max_intervals)
        .filter_map(|interval| {
            let tiers = store.interval(interval)?;
            let points: Vec<SeriesPoint> = tiers
                .iter()
                .filter(|(_, acc)| !acc.is_empty())
                .map(|(tier, acc)| SeriesPoint {
                    tier: *tier,
                    tier_index: tier.index(),
                    mean: acc.mean(),
                    count: acc.count(),
                })
                .collect();
            if points.is_empty() {
                return None;
            }
            Some(Series {
                interval,
                label: interval_label(interval, interval_minutes),
                points,
            })
        })
        .collect()
}

/// "0-10 mins", "10-20 mins", ...
pub fn interval_label(interval: usize, interval_minutes: f64) -> String {
    let start = interval as f64 * interval_minutes;
    let end = start + interval_minutes;
    format!("{}-{} mins", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tier;

    #[test]
    fn test_empty_store() {
        let store = AggregationStore::new(6);
        assert!(build_series(&store, 6, 10.0).is_empty());
    }

    #[test]
    fn test_only_populated_interval_emitted() {
        let mut store = AggregationStore::new(6);
        store.fold(Tier::Gold, &[None, None, Some(420.0)]);

        let series = build_series(&store, 6, 10.0);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].interval, 2);
        assert_eq!(series[0].label, "20-30 mins");
        assert_eq!(
            series[0].points,
            vec![SeriesPoint {
                tier: Tier::Gold,
                tier_index: 3,
                mean: 420.0,
                count: 1,
            }]
        );
    }

    #[test]
    fn test_series_ordering() {
        let mut store = AggregationStore::new(6);
        store.fold(Tier::Diamond, &[Some(5.0), Some(6.0)]);
        store.fold(Tier::Bronze, &[Some(1.0)]);
        store.fold(Tier::Grandmaster, &[Some(9.0), Some(8.0)]);

        let series = build_series(&store, 6, 10.0);
        assert_eq!(series.iter().map(|s| s.interval).collect::<Vec<_>>(), vec![0, 1]);

        let tiers: Vec<usize> = series[0].points.iter().map(|p| p.tier_index).collect();
        assert_eq!(tiers, vec![1, 5, 7]);
        let tiers: Vec<usize> = series[1].points.iter().map(|p| p.tier_index).collect();
        assert_eq!(tiers, vec![5, 7]);
    }

    #[test]
    fn test_build_bounded_by_requested_intervals() {
        let mut store = AggregationStore::new(6);
        store.fold(Tier::Gold, &[Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(build_series(&store, 2, 10.0).len(), 2);
    }

    #[test]
    fn test_interval_label() {
        assert_eq!(interval_label(0, 10.0), "0-10 mins");
        assert_eq!(interval_label(5, 10.0), "50-60 mins");
        assert_eq!(interval_label(1, 2.5), "2.5-5 mins");
    }
}
