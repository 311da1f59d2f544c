use crate::timing::{Delta, Timestamp};
use std::collections::BTreeMap;
use tracing::debug;

/// One row of a delta histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaBucket {
    pub delta_ms: Delta,
    pub count: usize,
}

/// Frequency table of the gaps between consecutive timestamps.
///
/// Buckets are kept as a single list sorted by delta, so the delta column and
/// the count column emitted from it are always aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaHistogram {
    buckets: Vec<DeltaBucket>,
    total_deltas: usize,
}

impl DeltaHistogram {
    /// Buckets in ascending delta order
    pub fn buckets(&self) -> &[DeltaBucket] {
        &self.buckets
    }

    /// Number of deltas observed, i.e. the sum of all counts
    pub fn total_deltas(&self) -> usize {
        self.total_deltas
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Occurrences of a given delta, zero if it was never observed
    pub fn count_of(&self, delta_ms: Delta) -> usize {
        self.buckets
            .binary_search_by_key(&delta_ms, |bucket| bucket.delta_ms)
            .map(|idx| self.buckets[idx].count)
            .unwrap_or(0)
    }

    /// The two co-indexed output columns: delta values and their counts
    pub fn columns(&self) -> (Vec<Delta>, Vec<usize>) {
        self.buckets
            .iter()
            .map(|bucket| (bucket.delta_ms, bucket.count))
            .unzip()
    }

    /// Bucket with the highest count, the lowest delta winning ties
    pub fn mode(&self) -> Option<DeltaBucket> {
        self.buckets
            .iter()
            .copied()
            .fold(None, |best: Option<DeltaBucket>, bucket| match best {
                Some(b) if b.count >= bucket.count => Some(b),
                _ => Some(bucket),
            })
    }
}

/// Differences between temporally adjacent timestamps.
///
/// Yields `len - 1` values, or none for fewer than two timestamps.
pub fn deltas(sequence: &[Timestamp]) -> Vec<Delta> {
    sequence.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Build the delta histogram of a timestamp sequence.
///
/// Zero and negative deltas (from millisecond rounding) are counted like any
/// other value. The input is not modified.
pub fn aggregate(sequence: &[Timestamp]) -> DeltaHistogram {
    let mut counts: BTreeMap<Delta, usize> = BTreeMap::new();
    for delta in deltas(sequence) {
        *counts.entry(delta).or_insert(0) += 1;
    }

    let total_deltas = sequence.len().saturating_sub(1);
    let buckets = counts
        .into_iter()
        .map(|(delta_ms, count)| DeltaBucket { delta_ms, count })
        .collect::<Vec<_>>();

    debug!(
        timestamps = sequence.len(),
        total_deltas = total_deltas,
        distinct_deltas = buckets.len(),
        "Delta histogram aggregated"
    );

    DeltaHistogram {
        buckets,
        total_deltas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_mixed_deltas() {
        let histogram = aggregate(&[0, 10, 10, 25]);

        assert_eq!(histogram.total_deltas(), 3);
        assert_eq!(histogram.count_of(10), 1);
        assert_eq!(histogram.count_of(0), 1);
        assert_eq!(histogram.count_of(15), 1);
        assert_eq!(histogram.count_of(5), 0);

        let (keys, counts) = histogram.columns();
        assert_eq!(keys, vec![0, 10, 15]);
        assert_eq!(counts, vec![1, 1, 1]);
    }

    #[test]
    fn test_aggregate_single_timestamp() {
        let histogram = aggregate(&[100]);
        assert!(histogram.is_empty());
        assert_eq!(histogram.total_deltas(), 0);
    }

    #[test]
    fn test_aggregate_empty_sequence() {
        let histogram = aggregate(&[]);
        assert!(histogram.is_empty());
        assert_eq!(histogram.total_deltas(), 0);
        assert_eq!(histogram.mode(), None);
    }

    #[test]
    fn test_aggregate_tolerates_negative_deltas() {
        let histogram = aggregate(&[50, 49, 66, 83]);
        assert_eq!(histogram.count_of(-1), 1);
        assert_eq!(histogram.count_of(17), 2);
        assert_eq!(histogram.buckets()[0].delta_ms, -1);
    }

    #[test]
    fn test_mode_prefers_highest_count() {
        let histogram = aggregate(&[0, 16, 33, 50, 66, 83]);
        assert_eq!(
            histogram.mode(),
            Some(DeltaBucket {
                delta_ms: 17,
                count: 3
            })
        );
    }

    #[test]
    fn test_deltas() {
        assert_eq!(deltas(&[0, 10, 10, 25]), vec![10, 0, 15]);
        assert!(deltas(&[7]).is_empty());
    }
}
