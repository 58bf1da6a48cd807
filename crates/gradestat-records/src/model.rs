//! Records stored for courses, groups, users and grades.
//!
//! # Serialization
//!
//! All types serialize with camelCase field names. A whole store is saved as a
//! [`Dataset`]:
//!
//! ```json
//! {
//!   "users": [{ "id": "u1", "email": "a@example.com", "name": "Ada", "role": "admin" }],
//!   "groups": [{ "id": "g1", "name": "Group A" }],
//!   "courses": [{ "id": "c1", "name": "Mathematics", "isPublic": true, "acceptingGrades": true, "groupIds": ["g1"] }],
//!   "grades": [{ "id": "x1", "value": 85.5, "studentId": "u1", "courseId": "c1", "groupId": "g1",
//!                "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z" }]
//! }
//! ```

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Generates a random 128-bit record id formatted as 32 hex digits.
pub fn random_id<R>(rng: &mut R) -> String
where
    R: Rng,
{
    format!("{:032x}", rng.random::<u128>())
}

/// Access level of a user.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display("admin")]
    Admin,
    #[default]
    #[display("student")]
    Student,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    /// Courses the user is enrolled in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enrolled_course_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the grade distribution may be exposed to anyone
    #[serde(default)]
    pub is_public: bool,
    /// Whether grades may still be recorded, changed or removed
    #[serde(default = "default_accepting_grades")]
    pub accepting_grades: bool,
    #[serde(default)]
    pub group_ids: Vec<String>,
}

fn default_accepting_grades() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub value: f64,
    pub student_id: String,
    pub course_id: String,
    #[serde(default)]
    pub group_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full contents of a grade store.
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub grades: Vec<Grade>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_defaults() {
        let course: Course = serde_json::from_str(r#"{"id": "c1", "name": "History"}"#).unwrap();
        assert!(!course.is_public);
        assert!(course.accepting_grades);
        assert!(course.group_ids.is_empty());
    }

    #[test]
    fn test_role_round_trip_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        let user: User =
            serde_json::from_str(r#"{"id": "u1", "email": "s@example.com", "name": "S"}"#).unwrap();
        assert_eq!(user.role, Role::Student);
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_grade_uses_camel_case() {
        let json = r#"{
            "id": "x1", "value": 85.5, "studentId": "u1", "courseId": "c1",
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-02T00:00:00Z"
        }"#;
        let grade: Grade = serde_json::from_str(json).unwrap();
        assert_eq!(grade.group_id, None);
        assert_eq!(grade.value, 85.5);
        let value = serde_json::to_value(&grade).unwrap();
        assert_eq!(value["studentId"], "u1");
        assert!(value.get("student_id").is_none());
    }
}
