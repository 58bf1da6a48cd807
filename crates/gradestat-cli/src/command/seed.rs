use std::path::PathBuf;

use chrono::Utc;
use gradestat_records::seed::{self, DEFAULT_NUM_STUDENTS};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SeedArg {
    /// Number of students to generate
    #[arg(long, default_value_t = DEFAULT_NUM_STUDENTS)]
    students: usize,
    /// Random seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SeedArg) -> anyhow::Result<()> {
    let mut rng = match arg.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_os_rng(),
    };
    let dataset = seed::seed_dataset(arg.students, Utc::now(), &mut rng);
    Output::save_json(&dataset, arg.output.as_deref())
}
