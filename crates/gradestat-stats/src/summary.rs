use std::{fmt, hash::Hash};

use indexmap::IndexMap;
use serde::Serialize;

use crate::{descriptive::DescriptiveStats, histogram::Histogram};

/// Summary of a grade distribution as reported to chart renderers.
///
/// Combines the descriptive statistics with a fixed-width [`Histogram`].
/// An empty dataset is not an error: it yields a summary whose scalars are
/// all `0` and whose histogram is empty, so consumers always receive a
/// well-formed structure.
///
/// Serializes with camelCase field names and the histogram under
/// `distribution`:
///
/// ```json
/// { "min": 10.0, "max": 40.0, "mean": 25.0, "median": 25.0,
///   "standardDeviation": 11.18, "distribution": { "10.0-13.0": 1, ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation (divisor `N`).
    pub standard_deviation: f64,
    #[serde(rename = "distribution")]
    pub histogram: Histogram,
}

impl StatSummary {
    /// Computes the summary of unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gradestat_stats::summary::StatSummary;
    /// let summary = StatSummary::new([10.0, 20.0, 30.0, 40.0]);
    /// assert_eq!(summary.mean, 25.0);
    /// assert_eq!(summary.median, 25.0);
    /// assert_eq!(summary.histogram.total(), 4);
    ///
    /// let empty = StatSummary::new([]);
    /// assert_eq!(empty, StatSummary::empty());
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

    /// Computes the summary of pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Self {
        let Some(stats) = DescriptiveStats::from_sorted(sorted_values) else {
            return Self::empty();
        };
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            standard_deviation: stats.std_dev,
            histogram: Histogram::from_sorted(sorted_values),
        }
    }

    /// The summary of an empty dataset.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            median: 0.0,
            standard_deviation: 0.0,
            histogram: Histogram { buckets: vec![] },
        }
    }

    /// Number of values the summary was computed from.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.histogram.total()
    }
}

/// Key partitioning grades into groups.
///
/// Grades without a group all collapse into [`GroupKey::Ungrouped`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum GroupKey<K> {
    Group(K),
    Ungrouped,
}

impl<K> GroupKey<K> {
    /// Display name of the ungrouped bucket.
    pub const UNGROUPED_LABEL: &'static str = "No Group";

    #[must_use]
    pub fn as_group(&self) -> Option<&K> {
        match self {
            GroupKey::Group(key) => Some(key),
            GroupKey::Ungrouped => None,
        }
    }
}

impl<K> From<Option<K>> for GroupKey<K> {
    fn from(key: Option<K>) -> Self {
        key.map_or(GroupKey::Ungrouped, GroupKey::Group)
    }
}

impl<K> fmt::Display for GroupKey<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Group(key) => key.fmt(f),
            GroupKey::Ungrouped => f.write_str(Self::UNGROUPED_LABEL),
        }
    }
}

/// Computes one summary per group.
///
/// The result is ordered by the first occurrence of each group key in
/// `values`.
///
/// # Examples
///
/// ```
/// # use gradestat_stats::summary::{grouped_summary, GroupKey};
/// let values = [(10.0, Some("A")), (90.0, Some("B")), (20.0, Some("A")), (50.0, None)];
/// let groups = grouped_summary(values);
/// let keys = groups.keys().cloned().collect::<Vec<_>>();
/// assert_eq!(keys, [GroupKey::Group("A"), GroupKey::Group("B"), GroupKey::Ungrouped]);
/// assert_eq!(groups[&GroupKey::Group("A")].mean, 15.0);
/// ```
#[must_use]
pub fn grouped_summary<I, K>(values: I) -> IndexMap<GroupKey<K>, StatSummary>
where
    I: IntoIterator<Item = (f64, Option<K>)>,
    K: Hash + Eq,
{
    let mut partitions: IndexMap<GroupKey<K>, Vec<f64>> = IndexMap::new();
    for (value, key) in values {
        partitions.entry(key.into()).or_default().push(value);
    }
    partitions
        .into_iter()
        .map(|(key, values)| (key, StatSummary::new(values)))
        .collect()
}
