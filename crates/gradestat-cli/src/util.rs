use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use gradestat_records::model::Dataset;
use tempfile::NamedTempFile;

/// Destination for JSON output.
///
/// File output goes to a temporary file next to the target and replaces the
/// target only once everything has been written.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<NamedTempFile>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty JSON to `output_path`, or to stdout if `None`.
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let output = match output_path {
            Some(path) => Output::create(path)?,
            None => Output::stdout(),
        };
        output.write_json(value)
    }

    pub fn stdout() -> Self {
        Output::Stdout(io::stdout().lock())
    }

    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let temp = NamedTempFile::new_in(dir).with_context(|| {
            format!("Failed to create temporary file in {}", dir.display())
        })?;
        Ok(Output::File {
            writer: BufWriter::new(temp),
            path: path.to_owned(),
        })
    }

    fn target(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Output::Stdout(writer) => writer,
            Output::File { writer, .. } => writer,
        }
    }

    /// Writes `value` followed by a newline, then flushes or moves the file
    /// into place.
    pub fn write_json<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let target = self.target();
        serde_json::to_writer_pretty(self.writer(), value)
            .with_context(|| format!("Failed to write JSON to {target}"))?;
        writeln!(self.writer()).with_context(|| format!("Failed to write to {target}"))?;

        match self {
            Output::Stdout(mut writer) => {
                writer.flush().context("Failed to flush stdout")?;
            }
            Output::File { writer, path } => {
                let temp = writer
                    .into_inner()
                    .map_err(io::IntoInnerError::into_error)
                    .with_context(|| format!("Failed to flush output for {target}"))?;
                temp.persist(&path)
                    .with_context(|| format!("Failed to replace {target}"))?;
            }
        }
        Ok(())
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Read a dataset (users, groups, courses and grades) from a JSON file
pub fn read_dataset_file<P>(path: P) -> anyhow::Result<Dataset>
where
    P: AsRef<Path>,
{
    let dataset: Dataset = read_json_file("dataset", &path)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        courses = dataset.courses.len(),
        grades = dataset.grades.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Replace a dataset JSON file
pub fn write_dataset_file<P>(dataset: &Dataset, path: P) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    Output::create(path)?.write_json(dataset)?;
    tracing::debug!(path = %path.display(), grades = dataset.grades.len(), "saved dataset");
    Ok(())
}

/// Read a JSON array of numbers from a file, or from stdin when no path is given
pub fn read_values(path: Option<&Path>) -> anyhow::Result<Vec<f64>> {
    match path {
        Some(path) => read_json_file("values", path),
        None => serde_json::from_reader(io::stdin().lock())
            .context("Failed to parse values JSON from stdin"),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use gradestat_records::model::Course;

    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            courses: vec![Course {
                id: "math".to_owned(),
                name: "Mathematics".to_owned(),
                description: None,
                is_public: true,
                accepting_grades: true,
                group_ids: vec![],
            }],
            ..Dataset::default()
        }
    }

    #[test]
    fn test_write_dataset_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "stale").unwrap();

        write_dataset_file(&dataset(), &path).unwrap();

        assert_eq!(read_dataset_file(&path).unwrap(), dataset());
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temporary file left behind");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("data.json");
        assert!(write_dataset_file(&dataset(), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_read_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.json");
        fs::write(&path, "[10, 20.5, 30]").unwrap();
        assert_eq!(read_values(Some(&path)).unwrap(), [10.0, 20.5, 30.0]);

        fs::write(&path, r#"{"values": []}"#).unwrap();
        assert!(read_values(Some(&path)).is_err());
    }
}
