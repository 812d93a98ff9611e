//! Atomic file operations with ACID guarantees.
//!
//! Provides a thin layer for safe concurrent access to the small JSON and
//! TOML files Frigo keeps under its config directory.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use frigo_core::error::{FrigoError, Result};

/// Serialization format used by an [`AtomicFile`].
pub trait FileFormat {
    fn serialize<T: Serialize>(value: &T) -> Result<String>;
    fn deserialize<T: DeserializeOwned>(content: &str) -> Result<T>;
}

/// Pretty-printed JSON.
pub struct JsonFormat;

impl FileFormat for JsonFormat {
    fn serialize<T: Serialize>(value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn deserialize<T: DeserializeOwned>(content: &str) -> Result<T> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Pretty-printed TOML.
pub struct TomlFormat;

impl FileFormat for TomlFormat {
    fn serialize<T: Serialize>(value: &T) -> Result<String> {
        Ok(toml::to_string_pretty(value)?)
    }

    fn deserialize<T: DeserializeOwned>(content: &str) -> Result<T> {
        Ok(toml::from_str(content)?)
    }
}

/// A handle to an atomically updated file.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Consistency**: Schema validation on load/save
/// - **Isolation**: File locking prevents concurrent modifications
/// - **Durability**: Explicit fsync before rename
pub struct AtomicFile<T, F: FileFormat> {
    path: PathBuf,
    /// Unix permission bits applied after every save, for secret-bearing
    /// files.
    mode: Option<u32>,
    _phantom: PhantomData<(T, F)>,
}

/// An atomically updated JSON file.
pub type AtomicJsonFile<T> = AtomicFile<T, JsonFormat>;

/// An atomically updated TOML file.
pub type AtomicTomlFile<T> = AtomicFile<T, TomlFormat>;

impl<T, F> AtomicFile<T, F>
where
    T: Serialize + DeserializeOwned,
    F: FileFormat,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            mode: None,
            _phantom: PhantomData,
        }
    }

    /// Applies the given Unix permission bits after every save.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// A missing or empty file yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(F::deserialize(&content)?))
    }

    /// Saves data atomically via a temporary file and rename.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let serialized = F::serialize(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(serialized.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        #[cfg(unix)]
        if let Some(mode) = self.mode {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(mode))?;
        }

        Ok(())
    }

    /// Performs a transactional update under an exclusive file lock.
    ///
    /// The update function receives the current data (or `default_value` when
    /// the file does not exist) and its changes are written back atomically.
    pub fn update<U>(&self, default_value: T, f: U) -> Result<()>
    where
        U: FnOnce(&mut T) -> Result<()>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)
    }

    /// Removes the file. Missing files are not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| FrigoError::io("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| FrigoError::io("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| FrigoError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped.
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestConfig {
        name: String,
        count: u32,
    }

    #[test]
    fn test_json_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestConfig>::new(temp_dir.path().join("test.json"));

        let config = TestConfig {
            name: "test".to_string(),
            count: 42,
        };
        file.save(&config).unwrap();

        assert_eq!(file.load().unwrap().unwrap(), config);
    }

    #[test]
    fn test_toml_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<TestConfig>::new(temp_dir.path().join("test.toml"));

        let config = TestConfig {
            name: "test".to_string(),
            count: 7,
        };
        file.save(&config).unwrap();

        assert_eq!(file.load().unwrap().unwrap(), config);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestConfig>::new(temp_dir.path().join("missing.json"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_update() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestConfig>::new(temp_dir.path().join("test.json"));

        let default_config = TestConfig {
            name: "default".to_string(),
            count: 0,
        };

        file.update(default_config.clone(), |config| {
            config.count += 10;
            Ok(())
        })
        .unwrap();
        file.update(default_config, |config| {
            config.count += 5;
            Ok(())
        })
        .unwrap();

        assert_eq!(file.load().unwrap().unwrap().count, 15);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");
        let file = AtomicJsonFile::<TestConfig>::new(path.clone());

        file.save(&TestConfig {
            name: "test".to_string(),
            count: 42,
        })
        .unwrap();

        assert!(!temp_dir.path().join(".test.json.tmp").exists());
        assert!(path.exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestConfig>::new(temp_dir.path().join("test.json"));

        file.save(&TestConfig {
            name: "test".to_string(),
            count: 1,
        })
        .unwrap();
        file.remove().unwrap();
        file.remove().unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_mode_applied_on_save() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        let file = AtomicJsonFile::<TestConfig>::new(path.clone()).with_mode(0o600);

        file.save(&TestConfig {
            name: "s".to_string(),
            count: 0,
        })
        .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
