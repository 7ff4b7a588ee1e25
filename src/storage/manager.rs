use crate::domain::Dataset;
use crate::errors::StoreError;

use super::{Result, StorageBackend};

/// Facade that coordinates the loaded dataset snapshot and its persistence.
/// Every service mutation happens on `current`; one `save` call writes the
/// whole snapshot back atomically.
pub struct DatasetManager {
    pub current: Option<Dataset>,
    current_name: Option<String>,
    storage: Box<dyn StorageBackend>,
}

impl DatasetManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn load(&mut self, name: &str) -> Result<()> {
        let dataset = self.storage.load(name)?;
        self.current = Some(dataset);
        self.current_name = Some(name.to_string());
        Ok(())
    }

    pub fn save(&mut self) -> Result<()> {
        let dataset = self
            .current
            .as_ref()
            .ok_or_else(|| StoreError::Persistence("no dataset loaded".into()))?;
        let name = self
            .current_name
            .as_deref()
            .ok_or_else(|| StoreError::Persistence("current dataset is unnamed".into()))?;
        self.storage.save(dataset, name)
    }

    pub fn save_as(&mut self, name: &str) -> Result<()> {
        let dataset = self
            .current
            .as_ref()
            .ok_or_else(|| StoreError::Persistence("no dataset loaded".into()))?;
        self.storage.save(dataset, name)?;
        self.current_name = Some(name.to_string());
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> Result<()> {
        let dataset = self
            .current
            .as_ref()
            .ok_or_else(|| StoreError::Persistence("no dataset loaded".into()))?;
        let name = self
            .current_name
            .as_deref()
            .ok_or_else(|| StoreError::Persistence("current dataset is unnamed".into()))?;
        self.storage.backup(dataset, name, note)
    }

    pub fn restore(&mut self, name: &str, backup_name: &str) -> Result<()> {
        let dataset = self.storage.restore(name, backup_name)?;
        self.current = Some(dataset);
        self.current_name = Some(name.to_string());
        Ok(())
    }

    pub fn set_current(&mut self, dataset: Dataset, name: Option<String>) {
        self.current = Some(dataset);
        self.current_name = name;
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.current_name = None;
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_named_roundtrip() {
        let temp = tempdir().unwrap();
        let store = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();
        let mut manager = DatasetManager::new(Box::new(store));

        manager.set_current(Dataset::new("Demo"), None);
        manager.save_as("demo").expect("save dataset");

        manager.clear();
        manager.load("demo").expect("load dataset");
        assert_eq!(manager.current.as_ref().map(|d| d.name.as_str()), Some("Demo"));
        assert_eq!(manager.current_name(), Some("demo"));
    }

    #[test]
    fn save_without_a_dataset_fails() {
        let temp = tempdir().unwrap();
        let store = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();
        let mut manager = DatasetManager::new(Box::new(store));
        assert!(manager.save().is_err());
    }
}
