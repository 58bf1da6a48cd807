//! Guards evaluated on grade payloads before anything is stored.
//!
//! Validation is kept out of the statistics engine: once a value has been
//! accepted here it is trusted by every computation downstream.

use serde::{Deserialize, Serialize};

/// A grade score known to lie in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct GradeValue(f64);

impl GradeValue {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    /// Checks that `value` is a finite number within `[0, 100]`.
    ///
    /// ```
    /// # use gradestat_records::validation::GradeValue;
    /// assert_eq!(GradeValue::new(85.5).unwrap().get(), 85.5);
    /// assert!(GradeValue::new(100.5).is_err());
    /// assert!(GradeValue::new(f64::NAN).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { value });
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for GradeValue {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(
    Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum ValidationError {
    #[display("grade value must be a finite number, got {value}")]
    NotFinite { value: f64 },
    #[display("grade value {value} is outside the range [0, 100]")]
    OutOfRange { value: f64 },
    #[display("{field} must not be empty")]
    EmptyId { field: &'static str },
}

fn require_id(field: &'static str, id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyId { field });
    }
    Ok(())
}

/// Payload for recording a new grade.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrade {
    pub value: f64,
    pub student_id: String,
    pub course_id: String,
    #[serde(default)]
    pub group_id: Option<String>,
}

impl NewGrade {
    pub fn validate(&self) -> Result<GradeValue, ValidationError> {
        let value = GradeValue::new(self.value)?;
        require_id("studentId", &self.student_id)?;
        require_id("courseId", &self.course_id)?;
        if let Some(group_id) = &self.group_id {
            require_id("groupId", group_id)?;
        }
        Ok(value)
    }
}

/// Change to the group of an existing grade.
#[derive(Default, Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum GroupChange {
    #[default]
    Keep,
    Clear,
    Set(String),
}

/// Payload for updating an existing grade. Absent fields are left unchanged.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct GradeUpdate {
    pub value: Option<f64>,
    pub group: GroupChange,
}

impl GradeUpdate {
    pub fn validate(&self) -> Result<Option<GradeValue>, ValidationError> {
        if let GroupChange::Set(group_id) = &self.group {
            require_id("groupId", group_id)?;
        }
        self.value.map(GradeValue::new).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_grade(value: f64) -> NewGrade {
        NewGrade {
            value,
            student_id: "s1".to_owned(),
            course_id: "c1".to_owned(),
            group_id: None,
        }
    }

    #[test]
    fn test_grade_value_bounds_are_inclusive() {
        assert!(GradeValue::new(0.0).is_ok());
        assert!(GradeValue::new(100.0).is_ok());
        assert!(GradeValue::new(-0.1).unwrap_err().is_out_of_range());
        assert!(GradeValue::new(f64::INFINITY).unwrap_err().is_not_finite());
    }

    #[test]
    fn test_new_grade_validation() {
        assert_eq!(new_grade(85.5).validate().unwrap().get(), 85.5);
        assert!(new_grade(101.0).validate().is_err());

        let mut grade = new_grade(50.0);
        grade.course_id = "  ".to_owned();
        assert_eq!(
            grade.validate().unwrap_err(),
            ValidationError::EmptyId { field: "courseId" }
        );

        let mut grade = new_grade(50.0);
        grade.group_id = Some(String::new());
        assert_eq!(
            grade.validate().unwrap_err().to_string(),
            "groupId must not be empty"
        );
    }

    #[test]
    fn test_new_grade_from_json() {
        let grade: NewGrade =
            serde_json::from_str(r#"{"value": 85.5, "studentId": "s1", "courseId": "c1"}"#)
                .unwrap();
        assert_eq!(grade, new_grade(85.5));
    }

    #[test]
    fn test_grade_update_validation() {
        assert_eq!(GradeUpdate::default().validate().unwrap(), None);
        let update = GradeUpdate {
            value: Some(120.0),
            group: GroupChange::Keep,
        };
        assert!(update.validate().is_err());
        let update = GradeUpdate {
            value: None,
            group: GroupChange::Set(String::new()),
        };
        assert!(update.validate().unwrap_err().is_empty_id());
    }
}
