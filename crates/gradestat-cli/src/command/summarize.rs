use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use gradestat_records::{report::SummaryReport, validation::GradeValue};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummarizeArg {
    /// JSON file holding an array of grade values (stdin if omitted)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let values = util::read_values(arg.input.as_deref())?;
    let report = summarize(&values)?;
    tracing::info!(
        total_grades = report.total_grades,
        mean = report.summary.mean,
        "summarized grade values"
    );
    Output::save_json(&report, arg.output.as_deref())
}

fn summarize(values: &[f64]) -> anyhow::Result<SummaryReport> {
    for (i, value) in values.iter().enumerate() {
        GradeValue::new(*value).with_context(|| format!("Invalid grade value at index {i}"))?;
    }
    Ok(SummaryReport::from_values(values))
}
