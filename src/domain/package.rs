//! Package kinds and download naming rules

use clap::ValueEnum;
use std::fmt;

/// Archive format of a repository snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PackageKind {
    /// Gzipped tarball (`<repo>/tarball/<branch>`)
    Tar,
    /// Zip file (`<repo>/zipball/<branch>`)
    Zip,
}

impl PackageKind {
    /// Returns the repository endpoint serving this package kind
    pub fn endpoint(&self) -> &'static str {
        match self {
            PackageKind::Tar => "tarball",
            PackageKind::Zip => "zipball",
        }
    }

    /// Returns the name used on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            PackageKind::Tar => "tar",
            PackageKind::Zip => "zip",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cli_name())
    }
}

/// Basic authentication credentials used for the download
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
}

impl ProxyCredentials {
    /// Creates credentials from a user name and password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds credentials only when both halves are present
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) => Some(Self { username, password }),
            _ => None,
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A package written to disk by a fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    /// File name of the package, taken from the resolved URL
    pub filename: String,
    /// Commit id encoded in the file name
    pub commit: String,
}

impl DownloadResult {
    /// Creates a download result, deriving the commit id from the file name
    pub fn from_filename(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let commit = commit_id(&filename).to_string();
        Self { filename, commit }
    }
}

/// Removes the last extension from a file name.
///
/// Leading dots do not start an extension, so `.hidden` is returned as is.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => &name[..idx],
        _ => name,
    }
}

/// Returns the directory a package unpacks into: its name minus two extensions
pub fn package_root(filename: &str) -> &str {
    strip_extension(strip_extension(filename))
}

/// Returns the commit id of a package: the last `-` separated token of its root
pub fn commit_id(filename: &str) -> &str {
    package_root(filename).rsplit('-').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(PackageKind::Tar.endpoint(), "tarball");
        assert_eq!(PackageKind::Zip.endpoint(), "zipball");
    }

    #[test]
    fn test_display_trait() {
        assert_eq!(format!("{}", PackageKind::Tar), "tar");
        assert_eq!(format!("{}", PackageKind::Zip), "zip");
    }

    #[test]
    fn test_value_enum_parsing() {
        assert_eq!(
            PackageKind::from_str("tar", false).unwrap(),
            PackageKind::Tar
        );
        assert_eq!(
            PackageKind::from_str("zip", false).unwrap(),
            PackageKind::Zip
        );
        assert!(PackageKind::from_str("rar", false).is_err());
    }

    #[test]
    fn test_proxy_from_parts_requires_both() {
        assert_eq!(
            ProxyCredentials::from_parts(Some("u".into()), Some("p".into())),
            Some(ProxyCredentials::new("u", "p"))
        );
        assert!(ProxyCredentials::from_parts(Some("u".into()), None).is_none());
        assert!(ProxyCredentials::from_parts(None, Some("p".into())).is_none());
        assert!(ProxyCredentials::from_parts(None, None).is_none());
    }

    #[test]
    fn test_proxy_debug_hides_password() {
        let debug = format!("{:?}", ProxyCredentials::new("alice", "s3cret"));
        assert!(debug.contains("alice"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("lib-abc.tar.gz"), "lib-abc.tar");
        assert_eq!(strip_extension("lib-abc.tar"), "lib-abc");
        assert_eq!(strip_extension("lib-abc"), "lib-abc");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("..hidden"), "..hidden");
        assert_eq!(strip_extension("name."), "name");
    }

    #[test]
    fn test_package_root_strips_two_extensions() {
        assert_eq!(
            package_root("mikhailberis-cpp-netlib-0f1e2d3.tar.gz"),
            "mikhailberis-cpp-netlib-0f1e2d3"
        );
        assert_eq!(
            package_root("mikhailberis-cpp-netlib-0f1e2d3.zip"),
            "mikhailberis-cpp-netlib-0f1e2d3"
        );
    }

    #[test]
    fn test_package_root_second_strip_can_eat_a_dotted_name() {
        // A single-extension name with a dot in it loses the dotted tail too.
        assert_eq!(package_root("lib-1.2-abc.zip"), "lib-1");
    }

    #[test]
    fn test_commit_id() {
        assert_eq!(commit_id("lib-abc123.tar.gz"), "abc123");
        assert_eq!(commit_id("lib-abc123.zip"), "abc123");
        assert_eq!(commit_id("a-b-c-d.tar.gz"), "d");
        assert_eq!(commit_id("nodash.tar.gz"), "nodash");
    }

    #[test]
    fn test_download_result_from_filename() {
        let result = DownloadResult::from_filename("name-deadbeef.tar.gz");
        assert_eq!(result.filename, "name-deadbeef.tar.gz");
        assert_eq!(result.commit, "deadbeef");
    }
}
