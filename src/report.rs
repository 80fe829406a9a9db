//! Regression report file
//!
//! The report holds the raw build output followed by two blank lines and a
//! metadata block:
//!
//! ```text
//! runner: Alice
//! date: 2011-03-14
//! git_branch: master
//! boost_version: 1_45
//! commit: 0f1e2d3
//! duration: 812.402
//! ```

use crate::error::ReportError;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the report, created in the working directory
pub const REPORT_FILE: &str = "cpp_netlib_regression.txt";

/// Metadata keys, in the order they are written
pub const METADATA_KEYS: [&str; 6] = [
    "runner",
    "date",
    "git_branch",
    "boost_version",
    "commit",
    "duration",
];

/// Facts about a regression run appended after the build output
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetadata {
    pub runner: String,
    pub date: NaiveDate,
    pub branch: String,
    pub boost_version: String,
    pub commit: String,
    pub duration: Duration,
}

impl RunMetadata {
    /// Returns the `(key, value)` pairs in report order
    pub fn entries(&self) -> [(&'static str, String); 6] {
        [
            ("runner", self.runner.clone()),
            ("date", self.date.format("%Y-%m-%d").to_string()),
            ("git_branch", self.branch.clone()),
            ("boost_version", self.boost_version.clone()),
            ("commit", self.commit.clone()),
            ("duration", format!("{:.3}", self.duration.as_secs_f64())),
        ]
    }
}

/// Report file open for the duration of a run
#[derive(Debug)]
pub struct Report {
    path: PathBuf,
    file: File,
}

impl Report {
    /// Create the report, truncating any previous one
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let path = path.into();
        let file = File::create(&path).map_err(|source| ReportError::CreateFailed {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, file })
    }

    /// Get the report path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file handle build output is written to
    pub fn output(&self) -> &File {
        &self.file
    }

    /// Append two blank lines and the metadata block
    pub fn write_metadata(&mut self, metadata: &RunMetadata) -> Result<(), ReportError> {
        write_block(BufWriter::new(&self.file), metadata)
            .map_err(|e| ReportError::write_failed(&self.path, e))
    }
}

fn write_block(mut writer: impl Write, metadata: &RunMetadata) -> std::io::Result<()> {
    writer.write_all(b"\n\n")?;
    for (key, value) in metadata.entries() {
        writeln!(writer, "{}: {}", key, value)?;
    }
    writer.flush()
}
