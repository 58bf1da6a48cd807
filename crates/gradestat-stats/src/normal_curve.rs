//! Gaussian curve fitted to a grade distribution.
//!
//! The curve is sampled over the three-sigma window around the mean, clipped
//! to the valid grade domain, and is used as an overlay on the histogram to
//! compare the observed distribution with a normal one.

use std::{f64::consts::PI, iter::FusedIterator};

use serde::Serialize;

use crate::{histogram::Histogram, summary::StatSummary};

/// Lower bound of the default sampling domain.
pub const DEFAULT_DOMAIN_MIN: f64 = 0.0;
/// Upper bound of the default sampling domain.
pub const DEFAULT_DOMAIN_MAX: f64 = 100.0;

/// Half-width of the sampling window, in standard deviations.
const SIGMA_WINDOW: f64 = 3.0;

#[derive(
    Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum NormalCurveError {
    #[display("invalid argument: sample count must be positive")]
    InvalidArgument,
    #[display("invalid domain: {reason}")]
    InvalidDomain { reason: &'static str },
}

/// A single sampled point of the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalCurvePoint {
    pub x: f64,
    pub y: f64,
}

/// A normal distribution fitted to a mean and standard deviation, together
/// with the window it is sampled over.
///
/// Holds no state between samplings: [`NormalCurve::points`] can be called
/// any number of times and yields the same sequence each time.
///
/// # Examples
///
/// ```
/// # use gradestat_stats::normal_curve::NormalCurve;
/// let curve = NormalCurve::new(70.0, 10.0, 100).unwrap();
/// assert_eq!(curve.points().len(), 101);
/// assert_eq!(curve.x_range(), (40.0, 100.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalCurve {
    mean: f64,
    std_dev: f64,
    x_min: f64,
    x_max: f64,
    sample_count: usize,
}

impl NormalCurve {
    /// Fits a curve sampled over the default grade domain `[0, 100]`.
    pub fn new(mean: f64, std_dev: f64, sample_count: usize) -> Result<Self, NormalCurveError> {
        Self::with_domain(
            mean,
            std_dev,
            sample_count,
            DEFAULT_DOMAIN_MIN,
            DEFAULT_DOMAIN_MAX,
        )
    }

    /// Fits a curve to the mean and standard deviation of a summary.
    pub fn from_summary(
        summary: &StatSummary,
        sample_count: usize,
    ) -> Result<Self, NormalCurveError> {
        Self::new(summary.mean, summary.standard_deviation, sample_count)
    }

    /// Fits a curve sampled over `[max(domain_min, mean - 3σ), min(domain_max, mean + 3σ)]`.
    ///
    /// The window is divided into `sample_count` equal steps, so
    /// `sample_count + 1` points are produced including both endpoints.
    ///
    /// # Errors
    ///
    /// * [`NormalCurveError::InvalidArgument`] if `sample_count` is zero
    /// * [`NormalCurveError::InvalidDomain`] if the standard deviation is not
    ///   positive and finite, the mean is not finite, or the clipped window
    ///   is empty
    pub fn with_domain(
        mean: f64,
        std_dev: f64,
        sample_count: usize,
        domain_min: f64,
        domain_max: f64,
    ) -> Result<Self, NormalCurveError> {
        if sample_count == 0 {
            return Err(NormalCurveError::InvalidArgument);
        }
        if std_dev == 0.0 {
            return Err(NormalCurveError::InvalidDomain {
                reason: "standard deviation is zero",
            });
        }
        if !(std_dev.is_finite() && std_dev > 0.0) {
            return Err(NormalCurveError::InvalidDomain {
                reason: "standard deviation must be positive and finite",
            });
        }
        if !mean.is_finite() {
            return Err(NormalCurveError::InvalidDomain {
                reason: "mean must be finite",
            });
        }

        let x_min = f64::max(domain_min, mean - SIGMA_WINDOW * std_dev);
        let x_max = f64::min(domain_max, mean + SIGMA_WINDOW * std_dev);
        if x_min > x_max {
            return Err(NormalCurveError::InvalidDomain {
                reason: "sampling window lies outside the domain",
            });
        }

        Ok(Self {
            mean,
            std_dev,
            x_min,
            x_max,
            sample_count,
        })
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// The clipped sampling window `(start, end)`.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    /// Evaluates the probability density at `x`.
    ///
    /// ```
    /// # use gradestat_stats::normal_curve::NormalCurve;
    /// let curve = NormalCurve::new(0.0, 1.0, 10).unwrap();
    /// assert!((curve.density(0.0) - 0.398_942_280_401_432_7).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn density(&self, x: f64) -> f64 {
        let exponent = -(x - self.mean).powi(2) / (2.0 * self.std_dev.powi(2));
        (1.0 / (self.std_dev * (2.0 * PI).sqrt())) * exponent.exp()
    }

    /// Returns the sampled points, from the start of the window to its end.
    #[must_use]
    pub fn points(&self) -> NormalCurvePoints {
        NormalCurvePoints {
            curve: *self,
            next: 0,
        }
    }

    /// Expected number of values in each histogram bucket if `histogram`
    /// were drawn from this distribution.
    ///
    /// Each bucket's expectation is approximated by the density at its
    /// midpoint scaled by the bucket width and the histogram's total count.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn expected_counts(&self, histogram: &Histogram) -> Vec<f64> {
        let total = histogram.total() as f64;
        histogram
            .buckets
            .iter()
            .map(|bucket| self.density(bucket.midpoint()) * bucket.width() * total)
            .collect()
    }

    #[expect(clippy::cast_precision_loss)]
    fn x_at(&self, idx: usize) -> f64 {
        if idx == self.sample_count {
            return self.x_max;
        }
        let step = (self.x_max - self.x_min) / self.sample_count as f64;
        self.x_min + idx as f64 * step
    }
}

/// Iterator over the sampled points of a [`NormalCurve`].
#[derive(Debug, Clone)]
pub struct NormalCurvePoints {
    curve: NormalCurve,
    next: usize,
}

impl Iterator for NormalCurvePoints {
    type Item = NormalCurvePoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.curve.sample_count {
            return None;
        }
        let x = self.curve.x_at(self.next);
        self.next += 1;
        Some(NormalCurvePoint {
            x,
            y: self.curve.density(x),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.curve.sample_count + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for NormalCurvePoints {}
impl FusedIterator for NormalCurvePoints {}

/// Samples a normal curve and collects its points.
///
/// # Examples
///
/// ```
/// # use gradestat_stats::normal_curve::normal_curve;
/// let points = normal_curve(70.0, 10.0, 100, 0.0, 100.0).unwrap();
/// assert_eq!(points.len(), 101);
/// assert!(normal_curve(70.0, 0.0, 100, 0.0, 100.0).unwrap_err().is_invalid_domain());
/// ```
pub fn normal_curve(
    mean: f64,
    std_dev: f64,
    sample_count: usize,
    domain_min: f64,
    domain_max: f64,
) -> Result<Vec<NormalCurvePoint>, NormalCurveError> {
    let curve = NormalCurve::with_domain(mean, std_dev, sample_count, domain_min, domain_max)?;
    Ok(curve.points().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_count_includes_both_endpoints() {
        let curve = NormalCurve::new(70.0, 10.0, 100).unwrap();
        let points = curve.points().collect::<Vec<_>>();
        assert_eq!(points.len(), 101);
        assert_eq!(points[0].x, 40.0);
        assert_eq!(points[100].x, 100.0);
    }

    #[test]
    fn test_points_within_clipped_window() {
        let curve = NormalCurve::new(70.0, 10.0, 100).unwrap();
        for point in curve.points() {
            assert!((40.0..=100.0).contains(&point.x), "x = {}", point.x);
            assert!(point.y >= 0.0);
        }
    }

    #[test]
    fn test_window_clipped_at_domain_min() {
        let curve = NormalCurve::new(10.0, 5.0, 10).unwrap();
        assert_eq!(curve.x_range(), (0.0, 25.0));
    }

    #[test]
    fn test_unclipped_window() {
        let curve = NormalCurve::new(50.0, 5.0, 10).unwrap();
        assert_eq!(curve.x_range(), (35.0, 65.0));
    }

    #[test]
    fn test_custom_domain() {
        let curve = NormalCurve::with_domain(5.0, 2.0, 4, 0.0, 10.0).unwrap();
        assert_eq!(curve.x_range(), (0.0, 10.0));
        let xs = curve.points().map(|p| p.x).collect::<Vec<_>>();
        assert_eq!(xs, [0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_symmetric_around_mean() {
        let curve = NormalCurve::new(70.0, 10.0, 100).unwrap();
        for offset in [0.5, 5.0, 10.0, 20.0, 29.0] {
            let left = curve.density(70.0 - offset);
            let right = curve.density(70.0 + offset);
            assert!((left - right).abs() < 1e-15, "offset {offset}");
        }
        let peak = curve
            .points()
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .unwrap();
        assert!((peak.x - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_points_are_restartable() {
        let curve = NormalCurve::new(62.3, 7.7, 50).unwrap();
        let first = curve.points().collect::<Vec<_>>();
        let second = curve.points().collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn test_exact_size() {
        let curve = NormalCurve::new(70.0, 10.0, 3).unwrap();
        let mut points = curve.points();
        assert_eq!(points.len(), 4);
        points.next();
        assert_eq!(points.len(), 3);
        points.by_ref().for_each(drop);
        assert_eq!(points.next(), None);
    }

    #[test]
    fn test_zero_std_dev_is_invalid_domain() {
        let err = NormalCurve::new(70.0, 0.0, 100).unwrap_err();
        assert!(err.is_invalid_domain());
    }

    #[test]
    fn test_negative_or_nan_std_dev_is_invalid_domain() {
        assert!(NormalCurve::new(70.0, -1.0, 100).unwrap_err().is_invalid_domain());
        assert!(NormalCurve::new(70.0, f64::NAN, 100).unwrap_err().is_invalid_domain());
    }

    #[test]
    fn test_zero_sample_count_is_invalid_argument() {
        let err = NormalCurve::new(70.0, 10.0, 0).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(
            err.to_string(),
            "invalid argument: sample count must be positive"
        );
    }

    #[test]
    fn test_window_outside_domain() {
        let err = NormalCurve::new(200.0, 10.0, 10).unwrap_err();
        assert!(err.is_invalid_domain());
    }

    #[test]
    fn test_expected_counts_track_histogram() {
        let values = [60.0, 65.0, 70.0, 70.0, 70.0, 75.0, 80.0];
        let summary = StatSummary::new(values);
        let curve = NormalCurve::from_summary(&summary, 100).unwrap();
        let expected = curve.expected_counts(&summary.histogram);
        assert_eq!(expected.len(), summary.histogram.buckets.len());
        assert!(expected.iter().all(|c| *c >= 0.0));
        let total = expected.iter().sum::<f64>();
        assert!(total > 0.0 && total <= 7.0 + 1e-9, "total = {total}");
    }
}
