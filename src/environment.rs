//! Boost installation probe
//!
//! Finds the Boost installation named by `BOOST_ROOT` and reads the library
//! version from `boost/version.hpp`:
//!
//! ```text
//! #define BOOST_LIB_VERSION "1_47"
//! ```

use crate::domain::EnvironmentInfo;
use crate::error::PreconditionError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the Boost installation root
pub const BOOST_ROOT_VAR: &str = "BOOST_ROOT";

/// Version header, relative to the installation root
pub const VERSION_FILE: &str = "boost/version.hpp";

/// Line prefix of the version declaration
pub const VERSION_TOKEN: &str = "#define BOOST_LIB_VERSION";

/// Oldest Boost version the library builds against
pub const MINIMUM_VERSION: &str = "1_40";

/// Probe for the installed Boost distribution
#[derive(Debug, Clone)]
pub struct EnvironmentProbe {
    root: Option<PathBuf>,
}

impl EnvironmentProbe {
    /// Create a probe for an explicit root (`None` means the variable is unset)
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Locate the installation and read its version
    pub fn check_installation(&self) -> Result<EnvironmentInfo, PreconditionError> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| PreconditionError::missing_environment(BOOST_ROOT_VAR))?;

        if !root.is_dir() {
            return Err(PreconditionError::RootNotFound { path: root.clone() });
        }

        let version_file = root.join(VERSION_FILE);
        let version = read_version(&version_file)?;
        debug!(root = %root.display(), %version, "found Boost installation");

        Ok(EnvironmentInfo::new(root.clone(), version))
    }

    /// Locate the installation and require at least `minimum`
    pub fn check_minimum(&self, minimum: &str) -> Result<EnvironmentInfo, PreconditionError> {
        let info = self.check_installation()?;
        if !info.meets_minimum(minimum) {
            return Err(PreconditionError::version_too_old(&info.version, minimum));
        }
        Ok(info)
    }
}

/// Read the version declared in a version header
fn read_version(path: &Path) -> Result<String, PreconditionError> {
    let unreadable = |source| PreconditionError::VersionFileUnreadable {
        path: path.to_path_buf(),
        source,
    };

    // Headers are not guaranteed to be UTF-8; only the matching line is decoded.
    let reader = BufReader::new(File::open(path).map_err(unreadable)?);
    for line in reader.split(b'\n') {
        let line = line.map_err(unreadable)?;
        if line.starts_with(VERSION_TOKEN.as_bytes()) {
            let line = String::from_utf8_lossy(&line);
            return parse_quoted(&line)
                .map(str::to_string)
                .ok_or_else(|| PreconditionError::version_not_found(path, VERSION_TOKEN));
        }
    }

    Err(PreconditionError::version_not_found(path, VERSION_TOKEN))
}

/// Returns the text between the first and last double quote of a line
pub fn parse_quoted(line: &str) -> Option<&str> {
    let begin = line.find('"')?;
    let end = line.rfind('"')?;
    if end <= begin {
        return None;
    }
    Some(&line[begin + 1..end])
}
