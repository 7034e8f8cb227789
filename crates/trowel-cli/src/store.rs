use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use log::debug;
use trowel_engine::{Persistence, StoreError};

/// [`Persistence`] backed by a flat JSON object, rewritten on every write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl JsonFileStore {
    /// Opens a save file, starting empty if it does not exist yet.
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse save file: {}", path.display()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read save file: {}", path.display()));
            }
        };
        debug!("loaded {} saved values from {}", values.len(), path.display());
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.values).map_err(io::Error::other)?;
        fs::write(&self.path, text)
    }

    fn store_error(&self, e: &io::Error) -> StoreError {
        StoreError::new(format!("{}: {e}", self.path.display()))
    }
}

impl Persistence for JsonFileStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        self.save().map_err(|e| self.store_error(&e))
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.values.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.store_error(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = env::temp_dir()
            .join(format!("trowel-store-{}", std::process::id()))
            .join(format!("{name}.json"));
        _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let path = temp_path("missing");
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_int("UnlockLevel"), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_int("UnlockLevel", 3).unwrap();
        store.set_int("AudioLevel", 40).unwrap();
        store.set_int("UnlockLevel", 5).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_int("UnlockLevel"), Some(5));
        assert_eq!(reopened.get_int("AudioLevel"), Some(40));
    }

    #[test]
    fn test_delete_all_removes_file() {
        let path = temp_path("delete");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_int("AudioLevel", 10).unwrap();
        assert!(path.exists());

        store.delete_all().unwrap();
        assert!(!path.exists());
        assert_eq!(store.get_int("AudioLevel"), None);
        store.delete_all().unwrap();
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2").unwrap();
        assert!(JsonFileStore::open(&path).is_err());
    }
}
