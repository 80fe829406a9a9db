//! Application error types using thiserror
//!
//! Error hierarchy:
//! - PreconditionError: missing or too-old installation, bad environment
//! - FetchError: package download failures
//! - ExtractError: archive and extraction directory failures
//! - BuildError: build tool invocation failures
//! - ReportError: report file failures
//! - ConfigError: invalid command line configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Environment precondition errors
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// Package download errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Archive extraction errors
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Build tool errors
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Report file errors
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while checking the installed dependency
#[derive(Error, Debug)]
pub enum PreconditionError {
    /// Installation root variable is not set
    #[error("environment variable {variable} is not set")]
    MissingEnvironment { variable: String },

    /// Installation root does not exist
    #[error("installation root does not exist: {path}")]
    RootNotFound { path: PathBuf },

    /// Version file could not be read
    #[error("failed to read version file {path}: {source}")]
    VersionFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Version file has no version declaration
    #[error("no '{token}' declaration found in {path}")]
    VersionNotFound { path: PathBuf, token: String },

    /// Installed version is older than the minimum
    #[error("installed version {found} is older than the minimum supported version {minimum}")]
    VersionTooOld { found: String, minimum: String },
}

/// Errors related to downloading a package
#[derive(Error, Debug)]
pub enum FetchError {
    /// URL could not be built or parsed
    #[error("invalid download URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Request could not be completed
    #[error("failed to download {url}: {message}")]
    Network { url: String, message: String },

    /// Server answered with an error status
    #[error("download of {url} failed with HTTP {status}")]
    Status { url: String, status: u16 },

    /// Resolved URL has no usable file name
    #[error("cannot derive a package file name from {url}")]
    NoFileName { url: String },

    /// Downloaded archive could not be written
    #[error("failed to write package file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to unpacking a package
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Archive could not be opened
    #[error("failed to open package {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stale extraction directory could not be removed
    #[error("failed to remove previous extraction {path}: {source}")]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Archive is corrupt or an entry could not be written
    #[error("failed to unpack {path}: {message}")]
    UnpackFailed { path: PathBuf, message: String },

    /// Archive did not produce the expected directory
    #[error("package {archive} did not contain the directory {expected}")]
    MissingRoot { archive: PathBuf, expected: PathBuf },
}

/// Errors related to the build tool invocation
#[derive(Error, Debug)]
pub enum BuildError {
    /// Command string is empty or cannot be split into words
    #[error("invalid build command '{command}'")]
    InvalidCommand { command: String },

    /// Report handle could not be shared with the subprocess
    #[error("failed to redirect build output: {source}")]
    Redirect {
        #[source]
        source: std::io::Error,
    },

    /// Tool could not be started or waited on
    #[error("failed to run build command '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to the report file
#[derive(Error, Debug)]
pub enum ReportError {
    /// Report file could not be created
    #[error("failed to create report {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report file could not be written
    #[error("failed to write report {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Working directory is unusable
    #[error("invalid working directory '{path}': {message}")]
    InvalidWorkDir { path: PathBuf, message: String },
}

impl PreconditionError {
    /// Creates a new MissingEnvironment error
    pub fn missing_environment(variable: impl Into<String>) -> Self {
        PreconditionError::MissingEnvironment {
            variable: variable.into(),
        }
    }

    /// Creates a new VersionNotFound error
    pub fn version_not_found(path: impl Into<PathBuf>, token: impl Into<String>) -> Self {
        PreconditionError::VersionNotFound {
            path: path.into(),
            token: token.into(),
        }
    }

    /// Creates a new VersionTooOld error
    pub fn version_too_old(found: impl Into<String>, minimum: impl Into<String>) -> Self {
        PreconditionError::VersionTooOld {
            found: found.into(),
            minimum: minimum.into(),
        }
    }
}

impl FetchError {
    /// Creates a new Network error
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidUrl error
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new Status error
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        FetchError::Status {
            url: url.into(),
            status,
        }
    }
}

impl ExtractError {
    /// Creates a new UnpackFailed error
    pub fn unpack_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ExtractError::UnpackFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl BuildError {
    /// Creates a new SpawnFailed error
    pub fn spawn_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        BuildError::SpawnFailed {
            command: command.into(),
            source,
        }
    }
}

impl ReportError {
    /// Creates a new WriteFailed error
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}
