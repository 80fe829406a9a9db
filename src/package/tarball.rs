//! Tarball package format
//!
//! Downloads `<repo>/tarball/<branch>`. The body is usually gzip compressed;
//! plain tar archives are unpacked as well.

use crate::domain::{DownloadResult, PackageKind, ProxyCredentials};
use crate::error::{ExtractError, FetchError};
use crate::package::{package_url, save_response, DownloadRequest, HttpClient, PackageFormat};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// First two bytes of a gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Tarball package format
pub struct TarballPackage {
    client: HttpClient,
    repo_root: String,
}

impl TarballPackage {
    /// Create a tarball format downloading from `repo_root`
    pub fn new(client: HttpClient, repo_root: impl Into<String>) -> Self {
        Self {
            client,
            repo_root: repo_root.into(),
        }
    }
}

#[async_trait]
impl PackageFormat for TarballPackage {
    fn kind(&self) -> PackageKind {
        PackageKind::Tar
    }

    async fn download(
        &self,
        branch: &str,
        proxy: Option<&ProxyCredentials>,
        dest_dir: &Path,
    ) -> Result<DownloadResult, FetchError> {
        if proxy.is_some() {
            debug!("proxy credentials are not used for tarball downloads");
        }

        let url = package_url(&self.repo_root, PackageKind::Tar, branch)?;
        let response = self.client.get(DownloadRequest::new(url)).await?;
        save_response(response, dest_dir).await
    }

    fn extract_all(&self, archive: &Path, dest_dir: &Path) -> Result<(), ExtractError> {
        let mut file = File::open(archive).map_err(|source| ExtractError::OpenFailed {
            path: archive.to_path_buf(),
            source,
        })?;

        let gzipped = is_gzip(&mut file)
            .map_err(|e| ExtractError::unpack_failed(archive, e.to_string()))?;
        let reader: Box<dyn Read> = if gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        tar::Archive::new(reader)
            .unpack(dest_dir)
            .map_err(|e| ExtractError::unpack_failed(archive, e.to_string()))
    }
}

/// Check for the gzip magic and rewind
fn is_gzip(file: &mut File) -> std::io::Result<bool> {
    let mut magic = [0u8; 2];
    let gzipped = match file.read_exact(&mut magic) {
        Ok(()) => magic == GZIP_MAGIC,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(e),
    };
    file.seek(SeekFrom::Start(0))?;
    Ok(gzipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;
    use std::io::Write;

    fn tar_bytes(root: &str) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let contents = b"project netlib ;\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{}/Jamroot", root), &contents[..])
            .unwrap();
        builder.into_inner().unwrap()
    }

    fn package() -> TarballPackage {
        TarballPackage::new(HttpClient::new().unwrap(), "http://localhost/")
    }

    #[test]
    fn test_unpack_gzipped_tarball() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes("lib-abc123")).unwrap();
        fs::write(dir.path().join("lib-abc123.tar.gz"), encoder.finish().unwrap()).unwrap();

        let root = package().unpack("lib-abc123.tar.gz", dir.path()).unwrap();
        assert_eq!(root, dir.path().join("lib-abc123"));
        assert!(root.join("Jamroot").is_file());
    }

    #[test]
    fn test_unpack_plain_tarball() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lib-abc123.tar.x"), tar_bytes("lib-abc123")).unwrap();

        let root = package().unpack("lib-abc123.tar.x", dir.path()).unwrap();
        assert!(root.join("Jamroot").is_file());
    }

    #[test]
    fn test_unpack_corrupt_archive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lib-abc123.tar.gz"), [0x1f, 0x8b, 0x00, 0x01]).unwrap();

        let err = package()
            .unpack("lib-abc123.tar.gz", dir.path())
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnpackFailed { .. }));
    }

    #[test]
    fn test_unpack_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let err = package()
            .unpack("lib-abc123.tar.gz", dir.path())
            .unwrap_err();
        assert!(matches!(err, ExtractError::OpenFailed { .. }));
    }

    #[test]
    fn test_unpack_unexpected_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lib-abc123.tar"), tar_bytes("other")).unwrap();

        let err = package().unpack("lib-abc123.tar", dir.path()).unwrap_err();
        assert!(matches!(err, ExtractError::MissingRoot { .. }));
    }
}
