//! Local key-value storage the scenario store is mirrored into.
//!
//! `FileStorage` keeps one file per key under a data directory and replaces
//! it atomically on every write.

use crate::error::{ScenarioPadError, ScenarioPadResult};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> ScenarioPadResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> ScenarioPadResult<()>;
    fn remove_item(&mut self, key: &str) -> ScenarioPadResult<()>;
}

/// Keys become file names, so they are restricted to a safe charset.
pub fn validate_key(key: &str) -> ScenarioPadResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ScenarioPadError::invalid_storage_key(key))
    }
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> ScenarioPadResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> ScenarioPadResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ScenarioPadError::storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> ScenarioPadResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| {
            ScenarioPadError::storage(format!("failed to replace {}: {}", path.display(), e.error))
        })?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> ScenarioPadResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: std::collections::HashMap<String, String>,
    writes: usize,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set_item` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

#[cfg(test)]
impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> ScenarioPadResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> ScenarioPadResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> ScenarioPadResult<()> {
        self.items.remove(key);
        Ok(())
    }
}
