use gradestat_stats::{NormalCurvePoint, StatSummary};
use indexmap::IndexMap;
use serde::Serialize;

/// A bare summary together with the number of grades it covers.
///
/// Serializes flat: the summary fields followed by `totalGrades`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    #[serde(flatten)]
    pub summary: StatSummary,
    pub total_grades: usize,
}

impl SummaryReport {
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            summary: StatSummary::new(values.iter().copied()),
            total_grades: values.len(),
        }
    }
}

/// Distribution of all grades of a course, overall and per group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDistribution {
    pub course_name: String,
    pub overall: StatSummary,
    /// Keyed by group name, in order of first appearance
    pub groups: IndexMap<String, StatSummary>,
    pub total_grades: usize,
}

/// Distribution of the grades of one group within a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDistribution {
    pub course_name: String,
    pub group: String,
    pub stats: StatSummary,
    pub total_grades: usize,
}

/// Normal curve fitted to the grades of a course.
///
/// `expected_counts` maps each histogram bucket label of the course
/// distribution to the number of grades the fitted curve predicts for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalCurveReport {
    pub course_name: String,
    pub mean: f64,
    pub standard_deviation: f64,
    pub normal_curve: Vec<NormalCurvePoint>,
    pub expected_counts: IndexMap<String, f64>,
}
