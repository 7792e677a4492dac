//! Durable key-value storage
//!
//! `FileStorage` keeps one file per key under `.geocoin/`. Each value is
//! written to a sibling temp file and renamed into place, so a reader sees
//! either the old value or the new one.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::paths::{session_dir, storage_file};

pub trait KvStorage {
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// `None` when nothing is stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Removing an absent key is not an error
    fn remove_item(&mut self, key: &str) -> Result<()>;

    fn clear(&mut self) -> Result<()>;
}

/// Storage backed by the `.geocoin/` directory under a root
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: session_dir(root),
        }
    }

    #[cfg(test)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).context("Failed to create .geocoin directory")?;
        }
        Ok(())
    }
}

impl KvStorage for FileStorage {
    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = storage_file(&self.dir, key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).with_context(|| format!("Failed to write {:?}", staging))?;
        fs::rename(&staging, &path).with_context(|| format!("Failed to replace {:?}", path))
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = storage_file(&self.dir, key);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        Ok(Some(content))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let path = storage_file(&self.dir, key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir).context("Failed to remove .geocoin directory")?;
        }
        Ok(())
    }
}

/// In-process storage for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KvStorage for MemoryStorage {
    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.items.clear();
        Ok(())
    }
}

/// Memory storage whose writes to one key always fail
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct FailingStorage {
    pub inner: MemoryStorage,
    pub fail_on: String,
}

#[cfg(test)]
impl FailingStorage {
    pub fn new(fail_on: &str) -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_on: fail_on.to_string(),
        }
    }
}

#[cfg(test)]
impl KvStorage for FailingStorage {
    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if key == self.fail_on {
            anyhow::bail!("disk full while writing {}", key);
        }
        self.inner.set_item(key, value)
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.inner.remove_item(key)
    }

    fn clear(&mut self) -> Result<()> {
        self.inner.clear()
    }
}
