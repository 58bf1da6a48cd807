use std::ops::Range;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Number of buckets in every grade histogram.
pub const NUM_BUCKETS: usize = 10;

/// A fixed-width histogram of a grade distribution.
///
/// The observed range `[min, max]` is split into [`NUM_BUCKETS`] buckets of
/// equal width. Each bucket is half-open (`[start, end)`) except the last,
/// which also contains its end so that the maximum value is counted. When all
/// values are identical the bucket width is 1, giving buckets
/// `[min, min + 1)`, `[min + 1, min + 2)`, ... with every value in the first.
///
/// Serializes as an ordered map from bucket label to count, e.g.
/// `{"70.0-73.0": 4, ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// The buckets in ascending order. Empty for an empty dataset.
    pub buckets: Vec<HistogramBucket>,
}

/// A single bucket in a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBucket {
    /// The boundaries of this bucket. The last bucket of a histogram also
    /// contains `range.end`.
    pub range: Range<f64>,
    /// The number of values assigned to this bucket.
    pub count: u64,
}

impl HistogramBucket {
    /// Returns the bucket label: both boundaries formatted to one decimal.
    ///
    /// ```
    /// # use gradestat_stats::histogram::HistogramBucket;
    /// let bucket = HistogramBucket { range: 70.0..75.0, count: 3 };
    /// assert_eq!(bucket.label(), "70.0-75.0");
    /// ```
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:.1}-{:.1}", self.range.start, self.range.end)
    }

    /// Returns the midpoint of the bucket.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        f64::midpoint(self.range.start, self.range.end)
    }

    /// Returns the width of the bucket.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.range.end - self.range.start
    }
}

impl Histogram {
    /// Creates a histogram from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gradestat_stats::histogram::Histogram;
    /// let histogram = Histogram::new([55.0, 100.0, 80.0, 62.5]);
    /// assert_eq!(histogram.buckets.len(), 10);
    /// assert_eq!(histogram.total(), 4);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Creates a histogram from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a.total_cmp(b).is_le()),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Self { buckets: vec![] };
        };

        let mut bucket_width = (max - min) / NUM_BUCKETS as f64;
        if bucket_width == 0.0 || !bucket_width.is_finite() {
            // All values identical
            bucket_width = 1.0;
        }

        let mut buckets = (0..NUM_BUCKETS)
            .map(|idx| {
                let start = min + idx as f64 * bucket_width;
                HistogramBucket {
                    range: start..start + bucket_width,
                    count: 0,
                }
            })
            .collect::<Vec<_>>();

        // The index is derived from the value alone rather than by testing each
        // bucket's boundaries, so rounding in adjacent boundaries can never
        // drop or double-count a value.
        for &val in sorted_values {
            buckets[bucket_index(val, min, bucket_width)].count += 1;
        }

        Self { buckets }
    }

    /// Returns the total number of values counted in the histogram.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Returns `true` if the histogram has no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns the distribution as an ordered mapping from label to count.
    ///
    /// Buckets whose labels coincide after formatting (ranges narrower than
    /// the label precision) are merged into the first such entry.
    ///
    /// ```
    /// # use gradestat_stats::histogram::Histogram;
    /// let histogram = Histogram::new([50.0, 50.04]);
    /// let distribution = histogram.distribution();
    /// assert_eq!(distribution.values().sum::<u64>(), 2);
    /// ```
    #[must_use]
    pub fn distribution(&self) -> IndexMap<String, u64> {
        let mut distribution = IndexMap::with_capacity(self.buckets.len());
        for bucket in &self.buckets {
            *distribution.entry(bucket.label()).or_insert(0) += bucket.count;
        }
        distribution
    }
}

impl Serialize for Histogram {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.distribution().serialize(serializer)
    }
}

/// Index of the bucket containing `val`, clamped into `[0, NUM_BUCKETS - 1]`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bucket_index(val: f64, min: f64, bucket_width: f64) -> usize {
    let position = ((val - min) / bucket_width).floor();
    if position.is_nan() || position < 0.0 {
        return 0;
    }
    (position as usize).min(NUM_BUCKETS - 1)
}
