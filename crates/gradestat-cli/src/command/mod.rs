use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{
    grade::{RecordGradeArg, RemoveGradeArg, UpdateGradeArg},
    report::{DistributionArg, GroupDistributionArg, NormalCurveArg},
    seed::SeedArg,
    summarize::SummarizeArg,
};

mod grade;
mod report;
mod seed;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    /// What to do
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Grade distribution of a course, overall and per group
    Distribution(#[clap(flatten)] DistributionArg),
    /// Grade distribution of one group within a course
    GroupDistribution(#[clap(flatten)] GroupDistributionArg),
    /// Normal curve fitted to the grades of a course
    NormalCurve(#[clap(flatten)] NormalCurveArg),
    /// Summarize a JSON array of grade values
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Record a new grade in a dataset file
    RecordGrade(#[clap(flatten)] RecordGradeArg),
    /// Change the value or group of a grade in a dataset file
    UpdateGrade(#[clap(flatten)] UpdateGradeArg),
    /// Remove a grade from a dataset file
    RemoveGrade(#[clap(flatten)] RemoveGradeArg),
    /// Generate a demo dataset
    Seed(#[clap(flatten)] SeedArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);

    match args.mode {
        Mode::Distribution(arg) => report::run_distribution(&arg)?,
        Mode::GroupDistribution(arg) => report::run_group_distribution(&arg)?,
        Mode::NormalCurve(arg) => report::run_normal_curve(&arg)?,
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::RecordGrade(arg) => grade::run_record(&arg)?,
        Mode::UpdateGrade(arg) => grade::run_update(&arg)?,
        Mode::RemoveGrade(arg) => grade::run_remove(&arg)?,
        Mode::Seed(arg) => seed::run(&arg)?,
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "gradestat=debug"
    } else {
        "gradestat=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_normal_curve_points_default() {
        let args =
            CommandArgs::try_parse_from(["gradestat", "normal-curve", "data.json", "--course", "c1"])
                .unwrap();
        let Mode::NormalCurve(arg) = args.mode else {
            panic!("unexpected mode");
        };
        assert_eq!(arg.points.get(), 100);
    }

    #[test]
    fn test_zero_points_rejected() {
        let result = CommandArgs::try_parse_from([
            "gradestat",
            "normal-curve",
            "data.json",
            "--course",
            "c1",
            "--points",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_group_flags_conflict() {
        let result = CommandArgs::try_parse_from([
            "gradestat",
            "update-grade",
            "data.json",
            "--grade",
            "g1",
            "--group",
            "ga",
            "--clear-group",
        ]);
        assert!(result.is_err());
    }
}
