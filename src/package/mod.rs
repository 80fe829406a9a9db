//! Package fetchers and extractors
//!
//! A repository snapshot is served either as a tarball or as a zipball.
//! Both formats implement [`PackageFormat`]:
//! - `download` fetches `<repo>/<endpoint>/<branch>` and saves the body under
//!   the file name of the resolved URL
//! - `unpack` replaces any previous extraction and returns the new directory

mod client;
mod tarball;
mod zipball;

pub use client::{DownloadRequest, HttpClient};
pub use tarball::TarballPackage;
pub use zipball::ZipballPackage;

use crate::domain::{package_root, DownloadResult, PackageKind, ProxyCredentials};
use crate::error::{ExtractError, FetchError};
use async_trait::async_trait;
use reqwest::{Response, Url};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Repository the regression packages are taken from
pub const DEFAULT_REPO_ROOT: &str = "http://github.com/mikhailberis/cpp-netlib/";

/// Trait for package formats
#[async_trait]
pub trait PackageFormat: Send + Sync {
    /// Get the package kind this format handles
    fn kind(&self) -> PackageKind;

    /// Download the package for `branch` into `dest_dir`
    async fn download(
        &self,
        branch: &str,
        proxy: Option<&ProxyCredentials>,
        dest_dir: &Path,
    ) -> Result<DownloadResult, FetchError>;

    /// Extract every entry of `archive` into `dest_dir`
    fn extract_all(&self, archive: &Path, dest_dir: &Path) -> Result<(), ExtractError>;

    /// Unpack a downloaded package into a fresh directory under `work_dir`.
    ///
    /// Returns the directory named after the package minus its two extensions.
    fn unpack(&self, filename: &str, work_dir: &Path) -> Result<PathBuf, ExtractError> {
        let archive = work_dir.join(filename);
        let root = work_dir.join(package_root(filename));

        if root.exists() {
            debug!(path = %root.display(), "removing previous extraction");
            fs::remove_dir_all(&root).map_err(|source| ExtractError::CleanupFailed {
                path: root.clone(),
                source,
            })?;
        }

        self.extract_all(&archive, work_dir)?;

        if !root.is_dir() {
            return Err(ExtractError::MissingRoot {
                archive,
                expected: root,
            });
        }

        info!(path = %root.display(), "unpacked {} package", self.kind());
        Ok(root)
    }
}

/// Create the package format for the given kind
pub fn create_package(
    kind: PackageKind,
    client: HttpClient,
    repo_root: &str,
) -> Box<dyn PackageFormat> {
    match kind {
        PackageKind::Tar => Box::new(TarballPackage::new(client, repo_root)),
        PackageKind::Zip => Box::new(ZipballPackage::new(client, repo_root)),
    }
}

/// Build `<repo_root>/<endpoint>/<branch>`
pub fn package_url(repo_root: &str, kind: PackageKind, branch: &str) -> Result<Url, FetchError> {
    let base = if repo_root.ends_with('/') {
        repo_root.to_string()
    } else {
        format!("{}/", repo_root)
    };
    let base = Url::parse(&base).map_err(|e| FetchError::invalid_url(repo_root, e.to_string()))?;

    let relative = format!("{}/{}", kind.endpoint(), branch);
    base.join(&relative)
        .map_err(|e| FetchError::invalid_url(format!("{}{}", base, relative), e.to_string()))
}

/// Returns the last path segment of a resolved URL, if it can name a file
pub fn file_name_from_url(url: &Url) -> Option<&str> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

/// Save a successful response under the name of its resolved URL
pub(crate) async fn save_response(
    response: Response,
    dest_dir: &Path,
) -> Result<DownloadResult, FetchError> {
    let resolved = response.url().clone();
    let filename = file_name_from_url(&resolved)
        .ok_or_else(|| FetchError::NoFileName {
            url: resolved.to_string(),
        })?
        .to_string();

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::network(resolved.as_str(), e.to_string()))?;

    let path = dest_dir.join(&filename);
    fs::write(&path, &body).map_err(|source| FetchError::WriteFailed {
        path: path.clone(),
        source,
    })?;

    let result = DownloadResult::from_filename(filename);
    info!(
        file = %result.filename,
        commit = %result.commit,
        bytes = body.len(),
        "downloaded package"
    );
    Ok(result)
}
