//! View: a directory-backed record of one captured viewpoint.

mod embedding;
mod meta;

use std::fs;
use std::path::{Path, PathBuf};

use mve_core::{CameraInfo, MveError, Result};

use embedding::{validate_name, Embedding};
use meta::{read_meta, write_meta, PersistedCamera, ViewMeta};

pub use meta::META_FILE;

/// A single view of a scene.
///
/// Metadata (id, name, camera) is read when the view is loaded; embedding
/// payloads are read on first access. Every mutator marks the view dirty, and
/// only a successful save clears it.
#[derive(Debug)]
pub struct View {
    id: u32,
    name: String,
    camera: Option<CameraInfo>,
    directory: Option<PathBuf>,
    embeddings: Vec<Embedding>,
    /// Embeddings removed since the last save whose files must be deleted.
    removed: Vec<String>,
    dirty: bool,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    /// Creates an empty view that is not bound to a directory.
    ///
    /// The view is dirty until it is first saved with [`View::save_view_as`].
    pub fn new() -> Self {
        Self {
            id: 0,
            name: String::new(),
            camera: None,
            directory: None,
            embeddings: Vec::new(),
            removed: Vec::new(),
            dirty: true,
        }
    }

    /// Loads a view from an existing view directory.
    pub fn load(directory: impl AsRef<Path>) -> Result<Self> {
        let directory = directory.as_ref();
        let metadata = fs::metadata(directory).map_err(|e| MveError::io(directory, e))?;
        if !metadata.is_dir() {
            return Err(MveError::NotADirectory(directory.to_path_buf()));
        }

        let meta = read_meta(directory)?;
        for name in &meta.embeddings {
            validate_name(name)?;
        }
        log::debug!(
            "loaded view {} '{}' from '{}'",
            meta.id,
            meta.name,
            directory.display()
        );

        Ok(Self {
            id: meta.id,
            name: meta.name,
            camera: meta.camera.map(CameraInfo::from),
            directory: Some(directory.to_path_buf()),
            embeddings: meta.embeddings.into_iter().map(Embedding::unloaded).collect(),
            removed: Vec::new(),
            dirty: false,
        })
    }

    /// Returns the view id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Sets the view id.
    pub fn set_id(&mut self, id: u32) {
        self.id = id;
        self.dirty = true;
    }

    /// Returns the view name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the view name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.dirty = true;
    }

    /// Returns the camera calibration of this view, if any.
    #[must_use]
    pub fn camera(&self) -> Option<&CameraInfo> {
        self.camera.as_ref()
    }

    /// Sets the camera calibration of this view.
    pub fn set_camera(&mut self, camera: CameraInfo) {
        self.camera = Some(camera);
        self.dirty = true;
    }

    /// Returns the directory this view is bound to.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Returns whether the view differs from its persisted state.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether an embedding with the given name exists.
    #[must_use]
    pub fn has_embedding(&self, name: &str) -> bool {
        self.embeddings.iter().any(|e| e.name == name)
    }

    /// Returns the embedding names in insertion order.
    pub fn embedding_names(&self) -> impl Iterator<Item = &str> {
        self.embeddings.iter().map(|e| e.name.as_str())
    }

    /// Returns the payload of an embedding, reading it from disk on first access.
    ///
    /// Returns `Ok(None)` if the view has no embedding with that name.
    pub fn get_blob(&mut self, name: &str) -> Result<Option<&[u8]>> {
        let Some(index) = self.embeddings.iter().position(|e| e.name == name) else {
            return Ok(None);
        };
        let embedding = &mut self.embeddings[index];
        if embedding.data.is_none() {
            let dir = self.directory.as_deref().ok_or(MveError::ViewUnbound(self.id))?;
            embedding.ensure_loaded(dir)?;
        }
        Ok(embedding.data.as_deref())
    }

    /// Adds or replaces an embedding payload.
    pub fn set_blob(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        validate_name(name)?;
        if let Some(embedding) = self.embeddings.iter_mut().find(|e| e.name == name) {
            embedding.data = Some(data);
            embedding.dirty = true;
        } else {
            self.embeddings.push(Embedding {
                name: name.to_string(),
                data: Some(data),
                dirty: true,
            });
        }
        self.removed.retain(|r| r != name);
        self.dirty = true;
        Ok(())
    }

    /// Removes an embedding. Its file is deleted on the next save.
    ///
    /// Returns `false` if there was no embedding with that name.
    pub fn remove_embedding(&mut self, name: &str) -> bool {
        let Some(index) = self.embeddings.iter().position(|e| e.name == name) else {
            return false;
        };
        self.embeddings.remove(index);
        if self.directory.is_some() {
            self.removed.push(name.to_string());
        }
        self.dirty = true;
        true
    }

    /// Drops payloads that are loaded and unchanged; they are re-read on demand.
    ///
    /// Returns the number of released payloads.
    pub fn cache_cleanup(&mut self) -> usize {
        if self.directory.is_none() {
            return 0;
        }
        let mut released = 0;
        for embedding in &mut self.embeddings {
            if !embedding.dirty && embedding.data.take().is_some() {
                released += 1;
            }
        }
        released
    }

    /// Returns the approximate number of bytes held in memory by this view.
    #[must_use]
    pub fn mem_usage(&self) -> usize {
        self.name.len() + self.embeddings.iter().map(Embedding::mem_usage).sum::<usize>()
    }

    /// Persists the view to its bound directory.
    pub fn save_view(&mut self) -> Result<()> {
        let directory = self
            .directory
            .clone()
            .ok_or(MveError::ViewUnbound(self.id))?;
        self.write_to(&directory)
    }

    /// Binds the view to `directory`, creating it if needed, and persists it.
    ///
    /// When the view moves to a new directory, every embedding is written
    /// there; payloads that were never read are loaded from the old
    /// directory first.
    pub fn save_view_as(&mut self, directory: impl AsRef<Path>) -> Result<()> {
        let directory = directory.as_ref();
        if self.directory.as_deref() != Some(directory) {
            if let Some(old) = self.directory.as_deref() {
                for embedding in &mut self.embeddings {
                    embedding.ensure_loaded(old)?;
                }
            }
            for embedding in &mut self.embeddings {
                embedding.dirty = true;
            }
            self.removed.clear();
            self.directory = Some(directory.to_path_buf());
            self.dirty = true;
        }
        self.write_to(directory)
    }

    fn write_to(&mut self, directory: &Path) -> Result<()> {
        fs::create_dir_all(directory).map_err(|e| MveError::write(directory, e))?;

        for embedding in self.embeddings.iter_mut().filter(|e| e.dirty) {
            embedding.write(directory)?;
            embedding.dirty = false;
        }

        for name in &self.removed {
            let path = Embedding::file_path(directory, name);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(MveError::write(&path, e)),
            }
        }
        self.removed.clear();

        let meta = ViewMeta {
            id: self.id,
            name: self.name.clone(),
            camera: self.camera.as_ref().map(PersistedCamera::from),
            embeddings: self.embeddings.iter().map(|e| e.name.clone()).collect(),
        };
        write_meta(directory, &meta)?;

        self.dirty = false;
        log::debug!("saved view {} to '{}'", self.id, directory.display());
        Ok(())
    }
}
