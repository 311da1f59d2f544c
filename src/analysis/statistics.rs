use crate::analysis::histogram::DeltaHistogram;
use crate::timing::Delta;
use hdrhistogram::Histogram;
use thiserror::Error;
use tracing::{debug, warn};

/// Histogram lower bound in milliseconds (zero is still recordable)
pub const HISTOGRAM_LOW_BOUND_MS: u64 = 1;

/// Histogram upper bound in milliseconds
pub const HISTOGRAM_HIGH_BOUND_MS: u64 = 3_600_000;

/// Histogram significant digits for precision
pub const HISTOGRAM_SIGNIFICANT_DIGITS: u8 = 3;

#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error("Failed to create histogram: {0}")]
    Creation(#[from] hdrhistogram::CreationError),

    #[error("Failed to record delta {delta_ms}ms: {source}")]
    Record {
        delta_ms: Delta,
        source: hdrhistogram::RecordError,
    },
}

/// Cadence statistics over a delta histogram using an HDR histogram.
///
/// Percentiles are computed over deltas clamped to
/// `[0, HISTOGRAM_HIGH_BOUND_MS]`; min and max are the real values.
pub struct Statistics {
    hist: Histogram<u64>,
    real_min: Delta,
    real_max: Delta,
    clamped_count: usize,
}

impl Statistics {
    pub fn new(histogram: &DeltaHistogram) -> Result<Self, StatisticsError> {
        debug!(
            total_deltas = histogram.total_deltas(),
            "Creating statistics from delta histogram"
        );
        let mut hist = Histogram::<u64>::new_with_bounds(
            HISTOGRAM_LOW_BOUND_MS,
            HISTOGRAM_HIGH_BOUND_MS,
            HISTOGRAM_SIGNIFICANT_DIGITS,
        )?;

        let mut clamped_count = 0;
        for bucket in histogram.buckets() {
            let clamped = bucket.delta_ms.clamp(0, HISTOGRAM_HIGH_BOUND_MS as Delta);
            if clamped != bucket.delta_ms {
                clamped_count += bucket.count;
            }
            hist.record_n(clamped as u64, bucket.count as u64)
                .map_err(|source| StatisticsError::Record {
                    delta_ms: bucket.delta_ms,
                    source,
                })?;
        }

        // Buckets are sorted, so the extremes are at either end
        let buckets = histogram.buckets();
        let real_min = buckets.first().map(|b| b.delta_ms).unwrap_or(0);
        let real_max = buckets.last().map(|b| b.delta_ms).unwrap_or(0);

        if clamped_count > 0 {
            warn!(
                clamped_count = clamped_count,
                total_count = histogram.total_deltas(),
                "Some deltas were clamped to histogram bounds"
            );
        }

        Ok(Self {
            hist,
            real_min,
            real_max,
            clamped_count,
        })
    }

    /// Mean delta in milliseconds
    pub fn mean(&self) -> f64 {
        self.hist.mean()
    }

    pub fn min(&self) -> Delta {
        self.real_min
    }

    pub fn max(&self) -> Delta {
        self.real_max
    }

    pub fn stdev(&self) -> f64 {
        self.hist.stdev()
    }

    /// Delta at the given quantile (0.0 to 1.0)
    pub fn percentile(&self, quantile: f64) -> u64 {
        self.hist.value_at_quantile(quantile)
    }

    /// Number of deltas that fell outside the histogram bounds
    pub fn clamped_count(&self) -> usize {
        self.clamped_count
    }

    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::histogram::aggregate;

    #[test]
    fn test_statistics_calculation() -> Result<(), StatisticsError> {
        let stats = Statistics::new(&aggregate(&[0, 10, 20, 30, 40, 50]))?;

        assert_eq!(stats.min(), 10);
        assert_eq!(stats.max(), 10);
        assert_eq!(stats.count(), 5);
        assert_eq!(stats.percentile(0.5), 10);
        assert!((stats.mean() - 10.0).abs() < 0.01);
        assert_eq!(stats.clamped_count(), 0);
        Ok(())
    }

    #[test]
    fn test_negative_deltas_are_clamped() -> Result<(), StatisticsError> {
        let stats = Statistics::new(&aggregate(&[10, 9, 25, 42]))?;

        assert_eq!(stats.min(), -1);
        assert_eq!(stats.max(), 17);
        assert_eq!(stats.clamped_count(), 1);
        assert_eq!(stats.count(), 3);
        Ok(())
    }

    #[test]
    fn test_empty_histogram() -> Result<(), StatisticsError> {
        let stats = Statistics::new(&aggregate(&[5]))?;
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.min(), 0);
        assert_eq!(stats.max(), 0);
        Ok(())
    }
}
