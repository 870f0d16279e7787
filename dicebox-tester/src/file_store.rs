use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use dicebox_core::KeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value store kept as one JSON object on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl JsonFileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileStoreError> {
        let path = path.as_ref().to_path_buf();
        let items = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(FileStoreError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        Ok(Self {
            path,
            items: Rc::new(RefCell::new(items)),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), FileStoreError> {
        let data = serde_json::to_vec_pretty(&*self.items.borrow())?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| FileStoreError::Io {
            path: self.path.display().to_string(),
            source,
        };
        fs::write(&tmp, data).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    type Error = FileStoreError;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        if self.items.borrow_mut().remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "dicebox-store-{label}-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn missing_file_opens_empty_and_writes_on_set() {
        let path = temp_path("fresh");
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_item("streakCount").unwrap(), None);
        assert!(!path.exists());

        store.set_item("streakCount", "3").unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_item("streakCount").unwrap().as_deref(), Some("3"));

        reopened.remove_item("streakCount").unwrap();
        let again = JsonFileStore::open(&path).unwrap();
        assert_eq!(again.get_item("streakCount").unwrap(), None);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_non_object_files() {
        let path = temp_path("bad");
        fs::write(&path, "[1,2,3]").unwrap();
        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, FileStoreError::Json(_)));
        let _ = fs::remove_file(path);
    }
}
