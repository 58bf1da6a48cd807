//! Demo dataset generation.
//!
//! Produces one admin, a number of students, four groups and four courses,
//! then enrolls every student in two or three random courses and records one
//! grade per enrollment. Grades are drawn from a bell-shaped distribution
//! around 75 so that the distribution reports have something to show.

use chrono::{DateTime, Utc};
use rand::{Rng, seq::SliceRandom as _};

use crate::model::{self, Course, Dataset, Grade, Group, Role, User};

pub const DEFAULT_NUM_STUDENTS: usize = 50;

const GROUP_NAMES: [&str; 4] = ["Group A", "Group B", "Group C", "Group D"];

struct CourseTemplate {
    name: &'static str,
    description: &'static str,
    is_public: bool,
}

const COURSE_TEMPLATES: [CourseTemplate; 4] = [
    CourseTemplate {
        name: "Mathematics",
        description: "Advanced mathematics course",
        is_public: true,
    },
    CourseTemplate {
        name: "Physics",
        description: "Introduction to physics",
        is_public: true,
    },
    CourseTemplate {
        name: "Computer Science",
        description: "Programming fundamentals",
        is_public: true,
    },
    CourseTemplate {
        name: "History",
        description: "World history course",
        is_public: false,
    },
];

const GRADE_CENTER: f64 = 75.0;
const GRADE_SPREAD: f64 = 15.0;
const COURSES_PER_STUDENT: std::ops::RangeInclusive<usize> = 2..=3;

/// Builds a demo dataset with `num_students` students.
///
/// All records are stamped with `now`. The same `rng` state always produces
/// the same dataset.
pub fn seed_dataset<R>(num_students: usize, now: DateTime<Utc>, rng: &mut R) -> Dataset
where
    R: Rng,
{
    let mut users = Vec::with_capacity(num_students + 1);
    users.push(User {
        id: model::random_id(rng),
        email: "admin@example.com".to_owned(),
        name: "Admin User".to_owned(),
        role: Role::Admin,
        enrolled_course_ids: vec![],
    });

    let groups = GROUP_NAMES
        .iter()
        .map(|name| Group {
            id: model::random_id(rng),
            name: (*name).to_owned(),
            description: Some(format!("Students in {name}")),
        })
        .collect::<Vec<_>>();
    let group_ids = groups.iter().map(|g| g.id.clone()).collect::<Vec<_>>();

    let courses = COURSE_TEMPLATES
        .iter()
        .map(|template| Course {
            id: model::random_id(rng),
            name: template.name.to_owned(),
            description: Some(template.description.to_owned()),
            is_public: template.is_public,
            accepting_grades: true,
            group_ids: group_ids.clone(),
        })
        .collect::<Vec<_>>();

    let mut grades = vec![];
    for i in 1..=num_students {
        let student_id = model::random_id(rng);

        let mut course_order = (0..courses.len()).collect::<Vec<_>>();
        course_order.shuffle(rng);
        let num_courses = rng.random_range(COURSES_PER_STUDENT);
        let enrolled = &course_order[..num_courses];

        for &course_idx in enrolled {
            let group = &groups[rng.random_range(0..groups.len())];
            grades.push(Grade {
                id: model::random_id(rng),
                value: sample_grade(rng),
                student_id: student_id.clone(),
                course_id: courses[course_idx].id.clone(),
                group_id: Some(group.id.clone()),
                created_at: now,
                updated_at: now,
            });
        }

        users.push(User {
            id: student_id,
            email: format!("student{i}@example.com"),
            name: format!("Student {i}"),
            role: Role::Student,
            enrolled_course_ids: enrolled
                .iter()
                .map(|&idx| courses[idx].id.clone())
                .collect(),
        });
    }

    tracing::info!(
        users = users.len(),
        courses = courses.len(),
        grades = grades.len(),
        "seeded dataset"
    );

    Dataset {
        users,
        groups,
        courses,
        grades,
    }
}

/// Draws a grade around 75 from the sum of four uniforms, clamped to
/// `[0, 100]` and rounded to one decimal.
fn sample_grade<R>(rng: &mut R) -> f64
where
    R: Rng,
{
    let sum = (0..4).map(|_| rng.random::<f64>()).sum::<f64>();
    let value = GRADE_CENTER + (sum - 2.0) * GRADE_SPREAD;
    (value.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_seed_shape() {
        let mut rng = Pcg32::seed_from_u64(42);
        let dataset = seed_dataset(DEFAULT_NUM_STUDENTS, now(), &mut rng);

        assert_eq!(dataset.users.len(), DEFAULT_NUM_STUDENTS + 1);
        assert_eq!(
            dataset.users.iter().filter(|u| u.role.is_admin()).count(),
            1
        );
        assert_eq!(dataset.groups.len(), 4);
        assert_eq!(dataset.courses.len(), 4);
        let private = dataset
            .courses
            .iter()
            .filter(|c| !c.is_public)
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(private, ["History"]);

        let enrollments = dataset
            .users
            .iter()
            .map(|u| u.enrolled_course_ids.len())
            .sum::<usize>();
        assert_eq!(dataset.grades.len(), enrollments);
        for user in dataset.users.iter().filter(|u| u.role.is_student()) {
            assert!(COURSES_PER_STUDENT.contains(&user.enrolled_course_ids.len()));
        }
    }

    #[test]
    fn test_seed_grades_are_valid() {
        let mut rng = Pcg32::seed_from_u64(7);
        let dataset = seed_dataset(200, now(), &mut rng);
        for grade in &dataset.grades {
            assert!((0.0..=100.0).contains(&grade.value));
            let tenths = grade.value * 10.0;
            assert!((tenths - tenths.round()).abs() < 1e-9);
            assert!(grade.group_id.is_some());
            assert_eq!(grade.created_at, now());
        }
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = seed_dataset(10, now(), &mut Pcg32::seed_from_u64(1));
        let b = seed_dataset(10, now(), &mut Pcg32::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_grade_centers_around_75() {
        let mut rng = Pcg32::seed_from_u64(3);
        let values = (0..2000).map(|_| sample_grade(&mut rng)).collect::<Vec<_>>();
        #[expect(clippy::cast_precision_loss)]
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        assert!((mean - GRADE_CENTER).abs() < 2.0, "mean = {mean}");
    }
}
