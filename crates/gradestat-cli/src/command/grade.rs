use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use gradestat_records::{
    model::Grade,
    service::{GradeService, ServiceError},
    store::MemoryStore,
    validation::{GradeUpdate, GroupChange, NewGrade},
};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct RecordGradeArg {
    /// Path to the dataset JSON file (updated in place)
    pub(crate) data: PathBuf,
    /// Student ID
    #[arg(long)]
    pub(crate) student: String,
    /// Course ID
    #[arg(long)]
    pub(crate) course: String,
    /// Grade value in [0, 100]
    #[arg(long)]
    pub(crate) value: f64,
    /// Group ID
    #[arg(long)]
    pub(crate) group: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct UpdateGradeArg {
    /// Path to the dataset JSON file (updated in place)
    pub(crate) data: PathBuf,
    /// Grade ID
    #[arg(long)]
    pub(crate) grade: String,
    /// New grade value in [0, 100]
    #[arg(long)]
    pub(crate) value: Option<f64>,
    /// Move the grade to this group
    #[arg(long, conflicts_with = "clear_group")]
    pub(crate) group: Option<String>,
    /// Remove the grade from its group
    #[arg(long)]
    pub(crate) clear_group: bool,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct RemoveGradeArg {
    /// Path to the dataset JSON file (updated in place)
    pub(crate) data: PathBuf,
    /// Grade ID
    #[arg(long)]
    pub(crate) grade: String,
    /// ID of the user performing the removal
    #[arg(long)]
    pub(crate) actor: String,
}

impl UpdateGradeArg {
    fn to_update(&self) -> GradeUpdate {
        let group = match (&self.group, self.clear_group) {
            (Some(group_id), _) => GroupChange::Set(group_id.clone()),
            (None, true) => GroupChange::Clear,
            (None, false) => GroupChange::Keep,
        };
        GradeUpdate {
            value: self.value,
            group,
        }
    }
}

/// Loads the dataset, applies `op` and writes the dataset back on success.
fn modify_dataset<F>(path: &Path, op: F) -> anyhow::Result<Grade>
where
    F: FnOnce(&mut GradeService<MemoryStore>) -> Result<Grade, ServiceError>,
{
    let dataset = util::read_dataset_file(path)?;
    let mut service = GradeService::new(MemoryStore::new(dataset));
    let grade = op(&mut service)?;
    util::write_dataset_file(service.into_store().dataset(), path)?;
    Ok(grade)
}

pub(crate) fn run_record(arg: &RecordGradeArg) -> anyhow::Result<()> {
    let new_grade = NewGrade {
        value: arg.value,
        student_id: arg.student.clone(),
        course_id: arg.course.clone(),
        group_id: arg.group.clone(),
    };
    let grade = modify_dataset(&arg.data, |service| service.record_grade(new_grade))
        .with_context(|| format!("Failed to record grade in course {}", arg.course))?;

    tracing::info!(grade_id = %grade.id, value = grade.value, "grade recorded");
    Output::stdout().write_json(&grade)
}

pub(crate) fn run_update(arg: &UpdateGradeArg) -> anyhow::Result<()> {
    let update = arg.to_update();
    let grade = modify_dataset(&arg.data, |service| service.update_grade(&arg.grade, update))
        .with_context(|| format!("Failed to update grade {}", arg.grade))?;

    tracing::info!(grade_id = %grade.id, value = grade.value, "grade updated");
    Output::stdout().write_json(&grade)
}

pub(crate) fn run_remove(arg: &RemoveGradeArg) -> anyhow::Result<()> {
    let grade = modify_dataset(&arg.data, |service| {
        service.remove_grade(&arg.grade, &arg.actor)
    })
    .with_context(|| format!("Failed to remove grade {}", arg.grade))?;

    tracing::info!(grade_id = %grade.id, "grade removed");
    Output::stdout().write_json(&grade)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use gradestat_records::model::{Course, Dataset, Role, User};

    use super::*;

    fn write_dataset(dir: &Path) -> PathBuf {
        let dataset = Dataset {
            users: vec![User {
                id: "s1".to_owned(),
                email: "s1@example.com".to_owned(),
                name: "Student 1".to_owned(),
                role: Role::Student,
                enrolled_course_ids: vec!["math".to_owned()],
            }],
            courses: vec![Course {
                id: "math".to_owned(),
                name: "Mathematics".to_owned(),
                description: None,
                is_public: true,
                accepting_grades: true,
                group_ids: vec![],
            }],
            ..Dataset::default()
        };
        let path = dir.join("data.json");
        fs::write(&path, serde_json::to_string(&dataset).unwrap()).unwrap();
        path
    }

    fn new_grade(value: f64) -> NewGrade {
        NewGrade {
            value,
            student_id: "s1".to_owned(),
            course_id: "math".to_owned(),
            group_id: None,
        }
    }

    #[test]
    fn test_modify_dataset_saves_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path());

        let grade = modify_dataset(&path, |service| service.record_grade(new_grade(72.5))).unwrap();

        let saved = util::read_dataset_file(&path).unwrap();
        assert_eq!(saved.grades, [grade]);
        assert_eq!(saved.grades[0].value, 72.5);
    }

    #[test]
    fn test_modify_dataset_keeps_file_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path());
        let before = fs::read_to_string(&path).unwrap();

        let err = modify_dataset(&path, |service| service.record_grade(new_grade(120.0)))
            .unwrap_err();
        assert!(err.downcast_ref::<ServiceError>().is_some_and(ServiceError::is_validation));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    fn update_arg(group: Option<&str>, clear_group: bool) -> UpdateGradeArg {
        UpdateGradeArg {
            data: PathBuf::from("data.json"),
            grade: "g1".to_owned(),
            value: Some(80.0),
            group: group.map(str::to_owned),
            clear_group,
        }
    }

    #[test]
    fn test_to_update_group_change() {
        assert_eq!(update_arg(None, false).to_update().group, GroupChange::Keep);
        assert_eq!(update_arg(None, true).to_update().group, GroupChange::Clear);
        assert_eq!(
            update_arg(Some("ga"), false).to_update().group,
            GroupChange::Set("ga".to_owned())
        );
        assert_eq!(update_arg(None, false).to_update().value, Some(80.0));
    }
}
