use crate::error::AppError;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "store.json";
const STORE_ENV_VAR: &str = "STUDYMATE_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntries {
    schema_version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Key-value store backed by a single JSON file.
///
/// Every call re-reads the file, so two handles on the same path see each
/// other's writes but do not coordinate: concurrent writers are last-write-wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self::new(store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, AppError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|err| AppError::io(format!("{}: {}", self.path.display(), err)))?;
        let stored: StoredEntries = serde_json::from_str(&content).map_err(|err| {
            AppError::invalid_data(format!("invalid JSON in {}: {}", self.path.display(), err))
        })?;

        if stored.schema_version != SCHEMA_VERSION {
            return Err(AppError::invalid_data("schema_version mismatch"));
        }

        Ok(stored.entries)
    }

    fn write_entries(&self, entries: BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredEntries {
            schema_version: SCHEMA_VERSION,
            entries,
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|err| AppError::io(format!("{}: {}", self.path.display(), err)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)?;
        }

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(entries)?;
        }
        Ok(())
    }
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("studymate").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("studymate")
            .join(STORE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonFileStore, SCHEMA_VERSION};
    use crate::storage::KeyValueStore;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("studymate-{nanos}-{file_name}"))
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let store = JsonFileStore::new(temp_path("missing.json"));
        assert_eq!(store.get("tasks").unwrap(), None);
    }

    #[test]
    fn set_get_remove_round_trip() {
        let path = temp_path("kv.json");
        let mut store = JsonFileStore::new(&path);

        store.set("userName", "Ada").unwrap();
        store.set("tasks", "[]").unwrap();
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("userName").unwrap().as_deref(), Some("Ada"));

        store.remove("userName").unwrap();
        let name = reopened.get("userName").unwrap();
        let tasks = reopened.get("tasks").unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(name, None);
        assert_eq!(tasks.as_deref(), Some("[]"));
    }

    #[test]
    fn nested_parent_directories_are_created() {
        let dir = temp_path("nested");
        let path = dir.join("deeper").join("store.json");
        let mut store = JsonFileStore::new(&path);

        store.set("userEmail", "ada@example.com").unwrap();
        let exists = path.exists();
        fs::remove_dir_all(&dir).ok();

        assert!(exists);
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let path = temp_path("bad-schema.json");
        let bad = format!(
            "{{\n  \"schema_version\": {},\n  \"entries\": {{}}\n}}",
            SCHEMA_VERSION + 1
        );
        fs::write(&path, bad).unwrap();

        let err = JsonFileStore::new(&path).get("tasks").unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn rejects_malformed_file() {
        let path = temp_path("garbage.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).get("tasks").unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }
}
