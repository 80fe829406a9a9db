//! Regression orchestrator for coordinating the whole run
//!
//! This module provides:
//! - Workflow coordination: check environment → download → unpack → build → report
//! - An explicit working directory instead of changing the process cwd
//! - Progress and log output for every stage
//!
//! The run is strictly linear and only the download yields to the runtime.
//! The first failing stage aborts it; the report may then hold partial build
//! output and no metadata block.

use crate::build::{BuildCommand, BuildRunner, SystemBuildRunner};
use crate::domain::ProxyCredentials;
use crate::environment::{EnvironmentProbe, MINIMUM_VERSION};
use crate::error::AppError;
use crate::package::PackageFormat;
use crate::progress::Progress;
use crate::report::{Report, RunMetadata, REPORT_FILE};
use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Instant;
use tracing::info;

/// Stages of a regression run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunStage {
    Start,
    EnvChecked,
    Downloaded,
    Unpacked,
    Built,
    ReportWritten,
    Done,
}

impl RunStage {
    /// Returns the stage that follows this one
    pub fn next(self) -> Self {
        match self {
            RunStage::Start => RunStage::EnvChecked,
            RunStage::EnvChecked => RunStage::Downloaded,
            RunStage::Downloaded => RunStage::Unpacked,
            RunStage::Unpacked => RunStage::Built,
            RunStage::Built => RunStage::ReportWritten,
            RunStage::ReportWritten | RunStage::Done => RunStage::Done,
        }
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Start => "start",
            RunStage::EnvChecked => "environment checked",
            RunStage::Downloaded => "downloaded",
            RunStage::Unpacked => "unpacked",
            RunStage::Built => "built",
            RunStage::ReportWritten => "report written",
            RunStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Parameters of a single regression run
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Name identifying the person running the tests
    pub runner: String,
    /// Branch to download
    pub branch: String,
    /// Credentials for the zipball download
    pub proxy: Option<ProxyCredentials>,
    /// Build tool path, `bjam` from PATH when absent
    pub build_tool: Option<String>,
    /// `--user-config` file passed to the build tool
    pub user_config: Option<PathBuf>,
}

impl RunRequest {
    /// Create a request with only the required fields
    pub fn new(runner: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            runner: runner.into(),
            branch: branch.into(),
            proxy: None,
            build_tool: None,
            user_config: None,
        }
    }
}

/// Result of a completed run
#[derive(Debug)]
pub struct RunOutcome {
    /// Path of the report file
    pub report_path: PathBuf,
    /// Directory the package was unpacked into
    pub source_dir: PathBuf,
    /// Metadata appended to the report
    pub metadata: RunMetadata,
    /// Exit status of the build tool
    pub build_status: ExitStatus,
}

/// Orchestrator for coordinating the regression workflow
pub struct Orchestrator {
    /// Package format selected on the command line
    package: Box<dyn PackageFormat>,
    /// Probe for the Boost installation
    probe: EnvironmentProbe,
    /// Runner for the build tool
    build_runner: Box<dyn BuildRunner>,
    /// Directory holding the report, the package and its extraction
    work_dir: PathBuf,
    /// Oldest accepted Boost version
    minimum_version: String,
    /// Whether to show progress spinners
    show_progress: bool,
}

impl Orchestrator {
    /// Create a new orchestrator running the system build tool
    pub fn new(
        package: Box<dyn PackageFormat>,
        probe: EnvironmentProbe,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            package,
            probe,
            build_runner: Box::new(SystemBuildRunner::new()),
            work_dir: work_dir.into(),
            minimum_version: MINIMUM_VERSION.to_string(),
            show_progress: false,
        }
    }

    /// Replace the build runner (for testing)
    pub fn with_build_runner(mut self, build_runner: Box<dyn BuildRunner>) -> Self {
        self.build_runner = build_runner;
        self
    }

    /// Set the oldest accepted Boost version
    pub fn with_minimum_version(mut self, minimum_version: impl Into<String>) -> Self {
        self.minimum_version = minimum_version.into();
        self
    }

    /// Enable or disable progress spinners
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Get the working directory
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Path of the report written by [`Orchestrator::run`]
    pub fn report_path(&self) -> PathBuf {
        self.work_dir.join(REPORT_FILE)
    }

    /// Run the regression workflow
    pub async fn run(&self, request: &RunRequest) -> Result<RunOutcome, AppError> {
        let mut progress = Progress::new(self.show_progress);
        let mut stage = RunStage::Start;

        // The report is closed when it goes out of scope, on every path.
        let mut report = Report::create(self.report_path())?;

        progress.spinner("Checking Boost installation...");
        let environment = self.probe.check_minimum(&self.minimum_version)?;
        stage = self.advance(stage);
        info!(%environment, "using Boost");

        progress.spinner(&format!(
            "Downloading {} package for branch {}...",
            self.package.kind(),
            request.branch
        ));
        let download = self
            .package
            .download(&request.branch, request.proxy.as_ref(), &self.work_dir)
            .await?;
        stage = self.advance(stage);

        // Extraction and the build below are blocking calls; they hold this
        // worker thread until they return.
        progress.spinner(&format!("Unpacking {}...", download.filename));
        let source_dir = self.package.unpack(&download.filename, &self.work_dir)?;
        stage = self.advance(stage);

        let command =
            BuildCommand::resolve(request.build_tool.as_deref(), request.user_config.as_deref())?;

        progress.spinner(&format!("Running {}...", command));
        let start = Instant::now();
        let build_status = self
            .build_runner
            .build(report.output(), &command, &source_dir)?;
        let duration = start.elapsed();
        stage = self.advance(stage);
        progress.finish_and_clear();

        let metadata = RunMetadata {
            runner: request.runner.clone(),
            date: Local::now().date_naive(),
            branch: request.branch.clone(),
            boost_version: environment.version,
            commit: download.commit,
            duration,
        };
        report.write_metadata(&metadata)?;
        stage = self.advance(stage);
        self.advance(stage);

        Ok(RunOutcome {
            report_path: report.path().to_path_buf(),
            source_dir,
            metadata,
            build_status,
        })
    }

    fn advance(&self, stage: RunStage) -> RunStage {
        let next = stage.next();
        info!(stage = %next, "regression stage reached");
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_sequence() {
        let mut stage = RunStage::Start;
        let mut seen = vec![stage];
        while stage != RunStage::Done {
            stage = stage.next();
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                RunStage::Start,
                RunStage::EnvChecked,
                RunStage::Downloaded,
                RunStage::Unpacked,
                RunStage::Built,
                RunStage::ReportWritten,
                RunStage::Done,
            ]
        );
        assert_eq!(RunStage::Done.next(), RunStage::Done);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(RunStage::EnvChecked.to_string(), "environment checked");
        assert_eq!(RunStage::ReportWritten.to_string(), "report written");
    }

    #[test]
    fn test_run_request_new() {
        let request = RunRequest::new("Alice", "master");
        assert_eq!(request.runner, "Alice");
        assert_eq!(request.branch, "master");
        assert!(request.proxy.is_none());
        assert!(request.build_tool.is_none());
        assert!(request.user_config.is_none());
    }
}
