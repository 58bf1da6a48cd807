use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Args;
use gradestat_records::{service::GradeService, store::MemoryStore};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct DistributionArg {
    /// Path to the dataset JSON file
    pub(crate) data: PathBuf,
    /// Course ID
    #[arg(long)]
    pub(crate) course: String,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct GroupDistributionArg {
    /// Path to the dataset JSON file
    pub(crate) data: PathBuf,
    /// Course ID
    #[arg(long)]
    pub(crate) course: String,
    /// Group ID
    #[arg(long)]
    pub(crate) group: String,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct NormalCurveArg {
    /// Path to the dataset JSON file
    pub(crate) data: PathBuf,
    /// Course ID
    #[arg(long)]
    pub(crate) course: String,
    /// Number of steps to sample the curve with (one more point is produced)
    #[arg(long, default_value = "100")]
    pub(crate) points: NonZeroUsize,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn load_service(data: &Path) -> anyhow::Result<GradeService<MemoryStore>> {
    let dataset = util::read_dataset_file(data)?;
    Ok(GradeService::new(MemoryStore::new(dataset)))
}

pub(crate) fn run_distribution(arg: &DistributionArg) -> anyhow::Result<()> {
    let service = load_service(&arg.data)?;
    let report = service
        .course_distribution(&arg.course)
        .with_context(|| format!("Failed to compute distribution of course {}", arg.course))?;

    tracing::info!(
        course = %report.course_name,
        total_grades = report.total_grades,
        groups = report.groups.len(),
        mean = report.overall.mean,
        "computed course distribution"
    );
    Output::save_json(&report, arg.output.as_deref())
}

pub(crate) fn run_group_distribution(arg: &GroupDistributionArg) -> anyhow::Result<()> {
    let service = load_service(&arg.data)?;
    let report = service
        .group_distribution(&arg.course, &arg.group)
        .with_context(|| {
            format!(
                "Failed to compute distribution of group {} in course {}",
                arg.group, arg.course
            )
        })?;

    tracing::info!(
        course = %report.course_name,
        group = %report.group,
        total_grades = report.total_grades,
        "computed group distribution"
    );
    Output::save_json(&report, arg.output.as_deref())
}

pub(crate) fn run_normal_curve(arg: &NormalCurveArg) -> anyhow::Result<()> {
    let service = load_service(&arg.data)?;
    let report = service
        .normal_curve(&arg.course, arg.points.get())
        .with_context(|| format!("Failed to compute normal curve of course {}", arg.course))?;

    tracing::info!(
        course = %report.course_name,
        mean = report.mean,
        standard_deviation = report.standard_deviation,
        points = report.normal_curve.len(),
        "computed normal curve"
    );
    Output::save_json(&report, arg.output.as_deref())
}
