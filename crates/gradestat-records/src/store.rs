//! Persistence of grade records.
//!
//! [`GradeStore`] is the seam between the reporting logic and wherever the
//! records actually live. [`MemoryStore`] keeps a whole [`Dataset`] in memory
//! and is what the command-line tool loads from and saves to a JSON file.

use crate::model::{Course, Dataset, Grade, Group, User};

/// Lookup and mutation of stored records.
pub trait GradeStore {
    fn course(&self, id: &str) -> Option<&Course>;
    fn group(&self, id: &str) -> Option<&Group>;
    fn user(&self, id: &str) -> Option<&User>;
    fn grade(&self, id: &str) -> Option<&Grade>;

    /// Grades recorded for a course, in insertion order.
    ///
    /// With `group_id`, only grades of that group are returned.
    fn course_grades(&self, course_id: &str, group_id: Option<&str>) -> Vec<&Grade>;

    fn insert_grade(&mut self, grade: Grade);
    fn grade_mut(&mut self, id: &str) -> Option<&mut Grade>;
    fn remove_grade(&mut self, id: &str) -> Option<Grade>;
}

/// A [`GradeStore`] over an in-memory [`Dataset`].
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    dataset: Dataset,
}

impl MemoryStore {
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }
}

impl From<Dataset> for MemoryStore {
    fn from(dataset: Dataset) -> Self {
        Self::new(dataset)
    }
}

impl GradeStore for MemoryStore {
    fn course(&self, id: &str) -> Option<&Course> {
        self.dataset.courses.iter().find(|c| c.id == id)
    }

    fn group(&self, id: &str) -> Option<&Group> {
        self.dataset.groups.iter().find(|g| g.id == id)
    }

    fn user(&self, id: &str) -> Option<&User> {
        self.dataset.users.iter().find(|u| u.id == id)
    }

    fn grade(&self, id: &str) -> Option<&Grade> {
        self.dataset.grades.iter().find(|g| g.id == id)
    }

    fn course_grades(&self, course_id: &str, group_id: Option<&str>) -> Vec<&Grade> {
        self.dataset
            .grades
            .iter()
            .filter(|g| g.course_id == course_id)
            .filter(|g| group_id.is_none_or(|id| g.group_id.as_deref() == Some(id)))
            .collect()
    }

    fn insert_grade(&mut self, grade: Grade) {
        self.dataset.grades.push(grade);
    }

    fn grade_mut(&mut self, id: &str) -> Option<&mut Grade> {
        self.dataset.grades.iter_mut().find(|g| g.id == id)
    }

    fn remove_grade(&mut self, id: &str) -> Option<Grade> {
        let idx = self.dataset.grades.iter().position(|g| g.id == id)?;
        Some(self.dataset.grades.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    fn grade(id: &str, course_id: &str, group_id: Option<&str>) -> Grade {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Grade {
            id: id.to_owned(),
            value: 50.0,
            student_id: "s1".to_owned(),
            course_id: course_id.to_owned(),
            group_id: group_id.map(str::to_owned),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_course_grades_filters_by_course_and_group() {
        let mut store = MemoryStore::default();
        store.insert_grade(grade("x1", "c1", Some("g1")));
        store.insert_grade(grade("x2", "c2", Some("g1")));
        store.insert_grade(grade("x3", "c1", None));
        store.insert_grade(grade("x4", "c1", Some("g2")));

        let ids = |grades: Vec<&Grade>| grades.iter().map(|g| g.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(store.course_grades("c1", None)), ["x1", "x3", "x4"]);
        assert_eq!(ids(store.course_grades("c1", Some("g1"))), ["x1"]);
        assert!(store.course_grades("c3", None).is_empty());
    }

    #[test]
    fn test_remove_grade() {
        let mut store = MemoryStore::default();
        store.insert_grade(grade("x1", "c1", None));
        assert_eq!(store.remove_grade("x1").map(|g| g.id), Some("x1".to_owned()));
        assert!(store.remove_grade("x1").is_none());
        assert!(store.into_dataset().grades.is_empty());
    }
}
