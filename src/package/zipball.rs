//! Zipball package format
//!
//! Downloads `<repo>/zipball/<branch>` with `Content-Type: application/zip`,
//! authenticating with the proxy credentials when they are given.

use crate::domain::{DownloadResult, PackageKind, ProxyCredentials};
use crate::error::{ExtractError, FetchError};
use crate::package::{package_url, save_response, DownloadRequest, HttpClient, PackageFormat};
use async_trait::async_trait;
use std::fs::File;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Content type sent with zipball requests
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Zipball package format
pub struct ZipballPackage {
    client: HttpClient,
    repo_root: String,
}

impl ZipballPackage {
    /// Create a zipball format downloading from `repo_root`
    pub fn new(client: HttpClient, repo_root: impl Into<String>) -> Self {
        Self {
            client,
            repo_root: repo_root.into(),
        }
    }
}

#[async_trait]
impl PackageFormat for ZipballPackage {
    fn kind(&self) -> PackageKind {
        PackageKind::Zip
    }

    async fn download(
        &self,
        branch: &str,
        proxy: Option<&ProxyCredentials>,
        dest_dir: &Path,
    ) -> Result<DownloadResult, FetchError> {
        let url = package_url(&self.repo_root, PackageKind::Zip, branch)?;
        if let Some(proxy) = proxy {
            debug!(user = %proxy.username, %url, "using basic authentication");
        }

        let request = DownloadRequest::new(url)
            .with_content_type(ZIP_CONTENT_TYPE)
            .with_credentials(proxy);
        let response = self.client.get(request).await?;
        save_response(response, dest_dir).await
    }

    fn extract_all(&self, archive: &Path, dest_dir: &Path) -> Result<(), ExtractError> {
        let file = File::open(archive).map_err(|source| ExtractError::OpenFailed {
            path: archive.to_path_buf(),
            source,
        })?;

        let mut zip = ZipArchive::new(file)
            .map_err(|e| ExtractError::unpack_failed(archive, e.to_string()))?;
        zip.extract(dest_dir)
            .map_err(|e| ExtractError::unpack_failed(archive, e.to_string()))
    }
}
