use crate::models::{ConfigDocument, ConfigValue};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// File name of the persisted configuration inside the plugin's data folder.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Fatal initialization error: the persisted store could not be created,
/// read, or written, or the bundled packaging is malformed.
///
/// Distinct from [`crate::validation::ConfigValidationError`], which reports
/// problems with the *content* of an otherwise readable user file.
#[derive(Debug, Error)]
pub enum ConfigInitError {
    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: serde_yaml_ng::Error,
    },

    #[error("failed to serialize config document: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),

    #[error("failed to parse bundled config: {0}")]
    SchemaParse(#[source] serde_yaml_ng::Error),

    #[error("bundled config is missing its config-version field")]
    SchemaVersionMissing,
}

/// Persisted key/value document store for the plugin's one configuration file.
///
/// Holds the currently loaded [`ConfigDocument`] in memory and the bundled
/// default bytes used to seed the file on first run. All I/O is performed per
/// call; no file handles are held across operations.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: Utf8PathBuf,
    defaults: Vec<u8>,
    doc: ConfigDocument,
}

impl ConfigStore {
    /// Create a store rooted in the given data directory, creating the
    /// directory if it does not exist.
    ///
    /// # Arguments
    /// * `data_dir` - The plugin's data folder (host-provided)
    /// * `defaults` - Raw bytes of the bundled default config document
    pub fn new<P: AsRef<Utf8Path>>(
        data_dir: P,
        defaults: impl Into<Vec<u8>>,
    ) -> Result<Self, ConfigInitError> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).map_err(|source| ConfigInitError::CreateDir {
                path: data_dir.clone(),
                source,
            })?;
        }

        Ok(Self {
            path: data_dir.join(CONFIG_FILE_NAME),
            defaults: defaults.into(),
            doc: ConfigDocument::new(),
        })
    }

    /// Write the bundled default document verbatim if no persisted file
    /// exists yet. A no-op when the file is already present.
    pub fn ensure_defaults_written(&self) -> Result<(), ConfigInitError> {
        if self.path.exists() {
            return Ok(());
        }

        fs::write(&self.path, &self.defaults).map_err(|source| ConfigInitError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!("Wrote default config to {}", self.path);
        Ok(())
    }

    /// Read the persisted document into memory, replacing any loaded state.
    pub fn load(&mut self) -> Result<(), ConfigInitError> {
        let contents =
            fs::read_to_string(&self.path).map_err(|source| ConfigInitError::Read {
                path: self.path.clone(),
                source,
            })?;

        self.doc = serde_yaml_ng::from_str(&contents).map_err(|source| ConfigInitError::Parse {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!("Loaded config from {}", self.path);
        Ok(())
    }

    /// Insert every key present in `schema` but absent here. Existing keys
    /// are never overwritten, so user customization survives the merge.
    pub fn set_defaults(&mut self, schema: &ConfigDocument) {
        for (key, value) in schema {
            if !self.doc.contains_key(key) {
                self.doc.insert(key.clone(), value.clone());
            }
        }
    }

    /// Set a single field on the in-memory document.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.doc.insert(key.into(), value.into());
    }

    /// Get a single field from the in-memory document.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.doc.get(key)
    }

    /// The whole in-memory document.
    pub fn get_all(&self) -> &ConfigDocument {
        &self.doc
    }

    /// Replace the whole in-memory document.
    pub fn set_all(&mut self, doc: ConfigDocument) {
        self.doc = doc;
    }

    /// Serialize the in-memory document back to persisted storage.
    pub fn save(&self) -> Result<(), ConfigInitError> {
        let yaml = serde_yaml_ng::to_string(&self.doc).map_err(ConfigInitError::Serialize)?;

        fs::write(&self.path, yaml).map_err(|source| ConfigInitError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!("Saved config to {}", self.path);
        Ok(())
    }

    /// Discard in-memory state and re-read the persisted document.
    pub fn reload(&mut self) -> Result<(), ConfigInitError> {
        self.doc.clear();
        self.load()
    }

    /// Path of the persisted configuration file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Raw bytes of the bundled default document this store was created with.
    pub fn defaults(&self) -> &[u8] {
        &self.defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    const DEFAULTS: &str = "config-version: 2\nlang: default\ngreeting: hello\n";

    fn create_test_store() -> (ConfigStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let store = ConfigStore::new(&data_dir, DEFAULTS.as_bytes()).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_data_directory_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf())
            .unwrap()
            .join("plugin_data");
        assert!(!data_dir.exists());

        let _store = ConfigStore::new(&data_dir, DEFAULTS.as_bytes()).unwrap();
        assert!(data_dir.exists());
    }

    #[test]
    fn test_ensure_defaults_written_is_idempotent() {
        let (mut store, _temp_dir) = create_test_store();

        store.ensure_defaults_written().unwrap();
        let first = fs::read_to_string(store.path()).unwrap();
        assert_eq!(first, DEFAULTS);

        // Second call must not clobber a user-edited file.
        fs::write(store.path(), "config-version: 2\nlang: eng\n").unwrap();
        store.ensure_defaults_written().unwrap();
        let second = fs::read_to_string(store.path()).unwrap();
        assert_eq!(second, "config-version: 2\nlang: eng\n");

        store.load().unwrap();
        assert_eq!(store.get("lang"), Some(&ConfigValue::from("eng")));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let (mut store, _temp_dir) = create_test_store();
        let result = store.load();
        assert!(matches!(result, Err(ConfigInitError::Read { .. })));
    }

    #[test]
    fn test_load_invalid_yaml_is_an_error() {
        let (mut store, _temp_dir) = create_test_store();
        fs::write(store.path(), "invalid: yaml: content: {{").unwrap();
        let result = store.load();
        assert!(matches!(result, Err(ConfigInitError::Parse { .. })));
    }

    #[test]
    fn test_set_defaults_never_overwrites_existing_keys() {
        let (mut store, _temp_dir) = create_test_store();
        store.ensure_defaults_written().unwrap();
        store.load().unwrap();
        store.set("greeting", "customized");

        let mut schema = ConfigDocument::new();
        schema.insert("greeting".to_string(), ConfigValue::from("hello"));
        schema.insert("farewell".to_string(), ConfigValue::from("goodbye"));
        store.set_defaults(&schema);

        assert_eq!(store.get("greeting"), Some(&ConfigValue::from("customized")));
        assert_eq!(store.get("farewell"), Some(&ConfigValue::from("goodbye")));
    }

    #[test]
    fn test_set_defaults_skips_keys_with_equal_values() {
        let (mut store, _temp_dir) = create_test_store();
        store.set("greeting", "hello");

        let mut schema = ConfigDocument::new();
        schema.insert("greeting".to_string(), ConfigValue::from("hello"));
        store.set_defaults(&schema);

        // Identical value, but still the user's entry, not the schema's.
        assert_eq!(store.get_all().len(), 1);
        assert_eq!(store.get("greeting"), Some(&ConfigValue::from("hello")));
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let (mut store, _temp_dir) = create_test_store();
        store.ensure_defaults_written().unwrap();
        store.load().unwrap();

        store.set("config-version", 9_i64);
        store.set("new-key", "new-value");
        store.save().unwrap();

        store.reload().unwrap();
        assert_eq!(store.get("config-version"), Some(&ConfigValue::Int(9)));
        assert_eq!(store.get("new-key"), Some(&ConfigValue::from("new-value")));
    }

    #[test]
    fn test_reload_discards_unsaved_changes() {
        let (mut store, _temp_dir) = create_test_store();
        store.ensure_defaults_written().unwrap();
        store.load().unwrap();

        store.set("greeting", "unsaved");
        store.reload().unwrap();
        assert_eq!(store.get("greeting"), Some(&ConfigValue::from("hello")));
    }
}
