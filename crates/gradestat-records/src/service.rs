//! Grade recording and distribution reports over a [`GradeStore`].
//!
//! This is where access rules live: distributions are only exposed for
//! public courses, grades can only change while a course accepts grades, and
//! students may only remove their own grades. The statistics themselves are
//! delegated to [`gradestat_stats`].

use chrono::Utc;
use gradestat_stats::{
    GroupKey, NormalCurve, NormalCurveError, StatSummary, grouped_summary,
};
use indexmap::IndexMap;
use rand::{SeedableRng as _, rngs::StdRng};

use crate::{
    model::{self, Course, Grade},
    report::{CourseDistribution, GroupDistribution, NormalCurveReport},
    store::GradeStore,
    validation::{GradeUpdate, GroupChange, NewGrade, ValidationError},
};

/// Number of steps a normal curve is sampled with unless asked otherwise.
pub const DEFAULT_CURVE_POINTS: usize = 100;

#[derive(
    Debug, derive_more::Display, derive_more::Error, derive_more::From, derive_more::IsVariant,
)]
pub enum ServiceError {
    #[display("course with ID {id} not found")]
    CourseNotFound { id: String },
    #[display("group with ID {id} not found")]
    GroupNotFound { id: String },
    #[display("user with ID {id} not found")]
    UserNotFound { id: String },
    #[display("grade with ID {id} not found")]
    GradeNotFound { id: String },
    #[display("course {name} is not public")]
    CourseNotPublic { name: String },
    #[display("course {name} is not accepting grades")]
    NotAcceptingGrades { name: String },
    #[display("only admins can remove grades of other students")]
    NotOwner,
    #[display("no grades found for this course")]
    NoGrades,
    #[display("invalid grade: {_0}")]
    #[from]
    Validation(ValidationError),
    #[display("no distribution available: {_0}")]
    #[from]
    Curve(NormalCurveError),
}

/// Records grades and builds distribution reports.
#[derive(Debug)]
pub struct GradeService<S> {
    store: S,
    rng: StdRng,
}

impl<S> GradeService<S>
where
    S: GradeStore,
{
    /// Creates a service over `store`.
    ///
    /// Ids of new grades are drawn from a generator seeded from the OS's
    /// random data source.
    pub fn new(store: S) -> Self {
        Self {
            store,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Validates and stores a new grade.
    pub fn record_grade(&mut self, new_grade: NewGrade) -> Result<Grade, ServiceError> {
        let value = new_grade.validate()?;

        if self.store.user(&new_grade.student_id).is_none() {
            return Err(ServiceError::UserNotFound {
                id: new_grade.student_id,
            });
        }
        let course = self.course(&new_grade.course_id)?;
        ensure_accepting_grades(course)?;
        if let Some(group_id) = &new_grade.group_id {
            self.ensure_group(group_id)?;
        }

        let now = Utc::now();
        let grade = Grade {
            id: model::random_id(&mut self.rng),
            value: value.get(),
            student_id: new_grade.student_id,
            course_id: new_grade.course_id,
            group_id: new_grade.group_id,
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(
            grade_id = %grade.id,
            course_id = %grade.course_id,
            value = grade.value,
            "recorded grade"
        );
        self.store.insert_grade(grade.clone());
        Ok(grade)
    }

    /// Applies `update` to the grade with the given id.
    pub fn update_grade(&mut self, id: &str, update: GradeUpdate) -> Result<Grade, ServiceError> {
        let value = update.validate()?;

        let grade = self.grade(id)?;
        let course = self.course(&grade.course_id)?;
        ensure_accepting_grades(course)?;
        if let GroupChange::Set(group_id) = &update.group {
            self.ensure_group(group_id)?;
        }

        let grade = self
            .store
            .grade_mut(id)
            .ok_or_else(|| ServiceError::GradeNotFound { id: id.to_owned() })?;
        if let Some(value) = value {
            grade.value = value.get();
        }
        match update.group {
            GroupChange::Keep => {}
            GroupChange::Clear => grade.group_id = None,
            GroupChange::Set(group_id) => grade.group_id = Some(group_id),
        }
        grade.updated_at = Utc::now();
        tracing::debug!(grade_id = %grade.id, value = grade.value, "updated grade");
        Ok(grade.clone())
    }

    /// Removes a grade on behalf of the user `actor_id`.
    pub fn remove_grade(&mut self, id: &str, actor_id: &str) -> Result<Grade, ServiceError> {
        let grade = self.grade(id)?;
        let actor = self
            .store
            .user(actor_id)
            .ok_or_else(|| ServiceError::UserNotFound {
                id: actor_id.to_owned(),
            })?;
        let role = actor.role;
        if !role.is_admin() && grade.student_id != actor.id {
            return Err(ServiceError::NotOwner);
        }
        let course = self.course(&grade.course_id)?;
        ensure_accepting_grades(course)?;

        let removed = self
            .store
            .remove_grade(id)
            .ok_or_else(|| ServiceError::GradeNotFound { id: id.to_owned() })?;
        tracing::debug!(grade_id = %removed.id, actor_id, %role, "removed grade");
        Ok(removed)
    }

    /// Distribution of a public course, overall and per group.
    ///
    /// Groups are keyed by name; grades without a group are reported under
    /// `"No Group"`. Partitions are formed by name, so a group that is itself
    /// named `"No Group"` shares its entry with the ungrouped grades.
    pub fn course_distribution(&self, course_id: &str) -> Result<CourseDistribution, ServiceError> {
        let course = self.public_course(course_id)?;
        let grades = self.store.course_grades(course_id, None);

        let overall = StatSummary::new(grades.iter().map(|g| g.value));
        let named = grades.iter().map(|g| {
            let name = self
                .group_name(g)
                .unwrap_or_else(|| UNGROUPED_LABEL.to_owned());
            (g.value, Some(name))
        });
        let groups = grouped_summary(named)
            .into_iter()
            .map(|(key, summary)| (key.to_string(), summary))
            .collect();

        Ok(CourseDistribution {
            course_name: course.name.clone(),
            overall,
            groups,
            total_grades: grades.len(),
        })
    }

    /// Distribution of one group within a public course.
    pub fn group_distribution(
        &self,
        course_id: &str,
        group_id: &str,
    ) -> Result<GroupDistribution, ServiceError> {
        let course = self.public_course(course_id)?;
        let group = self.ensure_group(group_id)?;
        let grades = self.store.course_grades(course_id, Some(group_id));

        Ok(GroupDistribution {
            course_name: course.name.clone(),
            group: group.name.clone(),
            stats: StatSummary::new(grades.iter().map(|g| g.value)),
            total_grades: grades.len(),
        })
    }

    /// Normal curve fitted to the grades of a public course, sampled with
    /// `points` steps (`points + 1` points).
    pub fn normal_curve(
        &self,
        course_id: &str,
        points: usize,
    ) -> Result<NormalCurveReport, ServiceError> {
        let course = self.public_course(course_id)?;
        let grades = self.store.course_grades(course_id, None);
        if grades.is_empty() {
            return Err(ServiceError::NoGrades);
        }
        let summary = StatSummary::new(grades.iter().map(|g| g.value));
        let curve = NormalCurve::from_summary(&summary, points)?;

        let mut expected_counts = IndexMap::new();
        let buckets = &summary.histogram.buckets;
        for (bucket, count) in buckets.iter().zip(curve.expected_counts(&summary.histogram)) {
            *expected_counts.entry(bucket.label()).or_insert(0.0) += count;
        }

        Ok(NormalCurveReport {
            course_name: course.name.clone(),
            mean: summary.mean,
            standard_deviation: summary.standard_deviation,
            normal_curve: curve.points().collect(),
            expected_counts,
        })
    }

    fn course(&self, id: &str) -> Result<&Course, ServiceError> {
        self.store
            .course(id)
            .ok_or_else(|| ServiceError::CourseNotFound { id: id.to_owned() })
    }

    fn public_course(&self, id: &str) -> Result<&Course, ServiceError> {
        let course = self.course(id)?;
        if !course.is_public {
            return Err(ServiceError::CourseNotPublic {
                name: course.name.clone(),
            });
        }
        Ok(course)
    }

    fn grade(&self, id: &str) -> Result<&Grade, ServiceError> {
        self.store
            .grade(id)
            .ok_or_else(|| ServiceError::GradeNotFound { id: id.to_owned() })
    }

    fn ensure_group(&self, id: &str) -> Result<&model::Group, ServiceError> {
        self.store
            .group(id)
            .ok_or_else(|| ServiceError::GroupNotFound { id: id.to_owned() })
    }

    fn group_name(&self, grade: &Grade) -> Option<String> {
        let group_id = grade.group_id.as_deref()?;
        let group = self.store.group(group_id);
        if group.is_none() {
            tracing::warn!(
                grade_id = %grade.id,
                group_id,
                "grade refers to unknown group, reporting it as ungrouped"
            );
        }
        group.map(|g| g.name.clone())
    }
}

fn ensure_accepting_grades(course: &Course) -> Result<(), ServiceError> {
    if !course.accepting_grades {
        return Err(ServiceError::NotAcceptingGrades {
            name: course.name.clone(),
        });
    }
    Ok(())
}

/// Label used for grades without a group in course distributions.
pub const UNGROUPED_LABEL: &str = GroupKey::<String>::UNGROUPED_LABEL;
