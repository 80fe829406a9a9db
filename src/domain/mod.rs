//! Core domain models for netlib-regress
//!
//! This module contains the values passed between the workflow steps:
//! - Package kinds (tarball or zipball)
//! - Proxy credentials for the zipball download
//! - Download results with the commit id taken from the package name
//! - Information about the installed Boost distribution

mod environment;
mod package;

pub use environment::EnvironmentInfo;
pub use package::{
    commit_id, package_root, strip_extension, DownloadResult, PackageKind, ProxyCredentials,
};
