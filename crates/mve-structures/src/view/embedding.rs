//! Opaque payloads stored next to a view's metadata.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use mve_core::{MveError, Result};

const EMBEDDING_EXT: &str = "blob";

/// A named payload. `data` is `None` until first read.
pub(crate) struct Embedding {
    pub name: String,
    pub data: Option<Vec<u8>>,
    pub dirty: bool,
}

impl Embedding {
    /// An embedding known from metadata but not read yet.
    pub fn unloaded(name: String) -> Self {
        Self {
            name,
            data: None,
            dirty: false,
        }
    }

    pub fn file_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.{EMBEDDING_EXT}"))
    }

    /// Reads the payload from `dir` unless it is already in memory.
    pub fn ensure_loaded(&mut self, dir: &Path) -> Result<()> {
        if self.data.is_none() {
            let path = Self::file_path(dir, &self.name);
            let bytes = fs::read(&path).map_err(|e| MveError::io(&path, e))?;
            log::trace!("read embedding '{}' ({} bytes)", path.display(), bytes.len());
            self.data = Some(bytes);
        }
        Ok(())
    }

    pub fn write(&self, dir: &Path) -> Result<()> {
        let path = Self::file_path(dir, &self.name);
        let data = self.data.as_deref().unwrap_or_default();
        fs::write(&path, data).map_err(|e| MveError::write(&path, e))
    }

    pub fn mem_usage(&self) -> usize {
        self.name.len() + self.data.as_ref().map_or(0, Vec::len)
    }
}

impl fmt::Debug for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Embedding")
            .field("name", &self.name)
            .field("loaded_bytes", &self.data.as_ref().map(Vec::len))
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Checks that `name` can be used as an embedding file stem.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(MveError::InvalidName(name.to_string()))
    }
}
