//! Build tool invocation
//!
//! This module provides:
//! - Resolution of the build command line (`bjam` and its user config)
//! - Execution of the build with stdout and stderr sent to the report

use crate::error::BuildError;
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

/// Build tool used when no path is given
pub const DEFAULT_BUILD_TOOL: &str = "bjam";

/// Command line of the build tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    line: String,
}

impl BuildCommand {
    /// Create a command from a raw command line
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// Resolve the command from an optional tool path and user config file
    pub fn resolve(tool: Option<&str>, user_config: Option<&Path>) -> Result<Self, BuildError> {
        let mut line = tool.unwrap_or(DEFAULT_BUILD_TOOL).to_string();

        if let Some(config) = user_config {
            let flag = format!("--user-config={}", config.display());
            line.push(' ');
            if flag.contains(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '\\')) {
                let quoted = shlex::try_quote(&flag)
                    .map_err(|_| BuildError::InvalidCommand { command: flag.clone() })?;
                line.push_str(&quoted);
            } else {
                line.push_str(&flag);
            }
        }

        Ok(Self { line })
    }

    /// Get the command line
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// Split the command line into program and arguments
    pub fn words(&self) -> Result<(String, Vec<String>), BuildError> {
        let invalid = || BuildError::InvalidCommand {
            command: self.line.clone(),
        };
        let mut words = shlex::split(&self.line).ok_or_else(invalid)?;
        if words.is_empty() {
            return Err(invalid());
        }
        let program = words.remove(0);
        Ok((program, words))
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Trait for running the build tool
pub trait BuildRunner: Send + Sync {
    /// Run `command` in `working_dir`, writing stdout and stderr to `output`.
    ///
    /// Blocks until the tool exits. A non-zero exit status is returned, not
    /// treated as an error.
    fn build(
        &self,
        output: &File,
        command: &BuildCommand,
        working_dir: &Path,
    ) -> Result<ExitStatus, BuildError>;
}

/// Default build runner that executes real commands
#[derive(Debug, Default)]
pub struct SystemBuildRunner;

impl SystemBuildRunner {
    /// Create a new system build runner
    pub fn new() -> Self {
        Self
    }
}

impl BuildRunner for SystemBuildRunner {
    fn build(
        &self,
        output: &File,
        command: &BuildCommand,
        working_dir: &Path,
    ) -> Result<ExitStatus, BuildError> {
        let (program, args) = command.words()?;
        let stdout = output
            .try_clone()
            .map_err(|source| BuildError::Redirect { source })?;
        let stderr = output
            .try_clone()
            .map_err(|source| BuildError::Redirect { source })?;

        debug!(%program, ?args, dir = %working_dir.display(), "starting build");
        let status = Command::new(&program)
            .args(&args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status()
            .map_err(|e| BuildError::spawn_failed(command.as_str(), e))?;

        if status.success() {
            info!(%command, "build finished");
        } else {
            warn!(%command, %status, "build finished with a failure status");
        }
        Ok(status)
    }
}
