//! Installed Boost distribution information

use std::fmt;
use std::path::PathBuf;

/// Boost installation found through the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentInfo {
    /// Installation root (`BOOST_ROOT`)
    pub root: PathBuf,
    /// Library version as declared in `boost/version.hpp`, e.g. `1_47`
    pub version: String,
}

impl EnvironmentInfo {
    /// Creates a new environment info
    pub fn new(root: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            version: version.into(),
        }
    }

    /// Returns true if the version is at least `minimum`.
    ///
    /// Versions are compared as plain strings.
    pub fn meets_minimum(&self, minimum: &str) -> bool {
        self.version.as_str() >= minimum
    }
}

impl fmt::Display for EnvironmentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Boost {} at {}", self.version, self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meets_minimum() {
        assert!(EnvironmentInfo::new("/opt/boost", "1_47").meets_minimum("1_40"));
        assert!(EnvironmentInfo::new("/opt/boost", "1_40").meets_minimum("1_40"));
        assert!(!EnvironmentInfo::new("/opt/boost", "1_39").meets_minimum("1_40"));
    }

    #[test]
    fn test_meets_minimum_is_lexicographic() {
        assert!(EnvironmentInfo::new("/opt/boost", "1_5").meets_minimum("1_40"));
        assert!(!EnvironmentInfo::new("/opt/boost", "1_100").meets_minimum("1_40"));
    }

    #[test]
    fn test_display() {
        let info = EnvironmentInfo::new("/opt/boost", "1_47");
        assert_eq!(format!("{}", info), "Boost 1_47 at /opt/boost");
    }
}
