//! Snapshot persistence: a storage trait, the JSON backend, and a manager
//! facade coordinating the loaded dataset.

pub mod json_backend;
pub mod manager;

pub use json_backend::JsonStorage;
pub use manager::DatasetManager;

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::Dataset;
use crate::errors::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Abstraction over persistence backends capable of storing dataset
/// snapshots and their backups.
pub trait StorageBackend: Send + Sync {
    fn save(&self, dataset: &Dataset, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Dataset>;
    fn list_datasets(&self) -> Result<Vec<String>>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, dataset: &Dataset, name: &str, note: Option<&str>) -> Result<()>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Dataset>;
}

pub struct PathResolver;

impl PathResolver {
    pub fn base_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("santri_core")
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn dataset_dir_in(base: &Path) -> PathBuf {
        base.join("datasets")
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join("backups")
    }

    pub fn blob_dir_in(base: &Path) -> PathBuf {
        base.join("blobs")
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join("config.json")
    }

    pub fn state_file_in(base: &Path) -> PathBuf {
        base.join("state.json")
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}
