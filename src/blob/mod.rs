//! Opaque blob storage for uploaded documents.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::errors::StoreError;

/// A time-limited capability URL for reading one blob.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Abstraction over blob backends capable of storing document files and
/// issuing time-limited read URLs.
pub trait BlobStore: Send + Sync {
    fn simpan(&self, path: &str, bytes: &[u8]) -> Result<(), StoreError>;
    fn baca(&self, path: &str) -> Result<Vec<u8>, StoreError>;
    fn hapus(&self, path: &str) -> Result<(), StoreError>;
    fn signed_url(&self, path: &str, masa_berlaku_detik: u64) -> Result<SignedUrl, StoreError>;
}

/// Storage key for a document blob:
/// `santri/{santri_id}/{document_type}/{timestamp}.{ext}`.
pub fn path_dokumen(
    santri_id: Uuid,
    jenis_dokumen: &str,
    nama_file: &str,
    timestamp_millis: i64,
) -> String {
    let ext = nama_file.rsplit_once('.').map(|(_, e)| e).unwrap_or("bin");
    format!("santri/{santri_id}/{jenis_dokumen}/{timestamp_millis}.{ext}")
}

/// Filesystem-backed blob store rooted at one directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        if path.split('/').any(|segment| segment == "..") {
            return Err(StoreError::Persistence(format!(
                "blob path `{path}` escapes the store root"
            )));
        }
        Ok(self.root.join(path))
    }
}

impl BlobStore for FsBlobStore {
    fn simpan(&self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = full.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(tmp, full)?;
        Ok(())
    }

    fn baca(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let full = self.resolve(path)?;
        Ok(fs::read(full)?)
    }

    fn hapus(&self, path: &str) -> Result<(), StoreError> {
        let full = self.resolve(path)?;
        fs::remove_file(full)?;
        Ok(())
    }

    fn signed_url(&self, path: &str, masa_berlaku_detik: u64) -> Result<SignedUrl, StoreError> {
        let full = self.resolve(path)?;
        if !full.exists() {
            return Err(StoreError::Persistence(format!(
                "blob `{path}` not found"
            )));
        }
        let expires_at = Utc::now() + Duration::seconds(masa_berlaku_detik as i64);
        let token = Uuid::new_v4().simple().to_string();
        Ok(SignedUrl {
            url: format!(
                "file://{}?token={}&expires={}",
                full.display(),
                token,
                expires_at.timestamp()
            ),
            expires_at,
        })
    }
}

impl FsBlobStore {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn store_read_remove_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp.path().to_path_buf()).unwrap();
        let path = path_dokumen(Uuid::new_v4(), "Pas Foto", "foto.jpg", 1_700_000_000_000);
        assert!(path.ends_with(".jpg"));

        store.simpan(&path, b"fake-jpeg").unwrap();
        assert_eq!(store.baca(&path).unwrap(), b"fake-jpeg");
        store.hapus(&path).unwrap();
        assert!(store.baca(&path).is_err());
    }

    #[test]
    fn signed_url_carries_the_expiry() {
        let temp = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp.path().to_path_buf()).unwrap();
        store.simpan("santri/a/b/1.pdf", b"pdf").unwrap();

        let signed = store.signed_url("santri/a/b/1.pdf", 3600).unwrap();
        assert!(signed.url.contains("token="));
        assert!(signed.expires_at > Utc::now());
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let temp = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp.path().to_path_buf()).unwrap();
        assert!(store.simpan("../outside.bin", b"x").is_err());
    }
}
