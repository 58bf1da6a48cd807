//! Grade distribution statistics.
//!
//! This crate computes everything a grade distribution chart needs from a
//! list of grade values:
//!
//! - **Descriptive statistics**: min, max, mean, median and population
//!   standard deviation
//! - **Histogram**: ten equal-width buckets over the observed range
//! - **Summaries**: descriptive statistics plus histogram, overall or per group
//! - **Normal curve**: a Gaussian fitted to the distribution for overlay
//!
//! All computations are pure: inputs are copied before sorting, nothing is
//! cached, and the same input always produces bit-identical output.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`histogram`]: Fixed-width histogram binning
//! - [`summary`]: Combined summaries and per-group partitioning
//! - [`normal_curve`]: Gaussian probability density sampling
//!
//! # Examples
//!
//! ## Summarizing grades
//!
//! ```
//! use gradestat_stats::summary::StatSummary;
//!
//! let summary = StatSummary::new([10.0, 20.0, 30.0, 40.0]);
//! assert_eq!(summary.mean, 25.0);
//! assert_eq!(summary.median, 25.0);
//! assert_eq!(summary.histogram.total(), 4);
//! ```
//!
//! ## Summarizing grades per group
//!
//! ```
//! use gradestat_stats::summary::{GroupKey, grouped_summary};
//!
//! let groups = grouped_summary([(10.0, Some("A")), (90.0, Some("B")), (20.0, Some("A"))]);
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[&GroupKey::Group("A")].median, 15.0);
//! ```
//!
//! ## Sampling a normal curve
//!
//! ```
//! use gradestat_stats::normal_curve::NormalCurve;
//!
//! let curve = NormalCurve::new(70.0, 10.0, 100).unwrap();
//! let points = curve.points().collect::<Vec<_>>();
//! assert_eq!(points.len(), 101);
//! ```

pub use self::{
    histogram::{Histogram, HistogramBucket},
    normal_curve::{NormalCurve, NormalCurveError, NormalCurvePoint, normal_curve},
    summary::{GroupKey, StatSummary, grouped_summary},
};

pub mod descriptive;
pub mod histogram;
pub mod normal_curve;
pub mod summary;
