//! Scene: the aggregate of one bundle and the views of a scene directory.

use std::fs;
use std::path::{Path, PathBuf};

use mve_core::{MveError, Options, Result, ViewErrorPolicy, BUNDLE_FILE, VIEWS_DIR};
use mve_structures::{load_mve_bundle, save_mve_bundle, Bundle, View};

/// A scene directory opened for reading and selective saving.
///
/// The scene exclusively owns its views and its cached bundle. Views are
/// discovered when the scene is opened; the bundle is read on first access.
/// Dirtiness is never cached at the scene level: [`Scene::is_dirty`] asks the
/// bundle flag and every view each time.
#[derive(Debug)]
pub struct Scene {
    path: PathBuf,
    views: Vec<View>,
    bundle: Option<Bundle>,
    bundle_dirty: bool,
    options: Options,
}

impl Scene {
    /// Opens the scene at `path` with default options.
    ///
    /// Fails with [`MveError::NotFound`] or [`MveError::NotADirectory`] if
    /// `path` is not a directory, and with [`MveError::StructureInvalid`] if
    /// its `views` subdirectory is missing. A missing bundle file is not an
    /// error until the bundle is requested.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with_options(path, Options::default())
    }

    /// Opens the scene at `path` with the given options.
    pub fn create_with_options(path: impl AsRef<Path>, options: Options) -> Result<Self> {
        let path = path.as_ref();
        let views = discover_views(path, &options)?;
        let bundle = if options.load_bundle_on_create {
            Some(load_mve_bundle(path.join(BUNDLE_FILE))?)
        } else {
            None
        };

        Ok(Self {
            path: path.to_path_buf(),
            views,
            bundle,
            bundle_dirty: false,
            options,
        })
    }

    /// Replaces this scene with the one at `path`.
    ///
    /// Validation and discovery happen before anything is changed, so on
    /// error the scene keeps its previous path, views, and bundle.
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let views = discover_views(path, &self.options)?;
        let bundle = if self.options.load_bundle_on_create {
            Some(load_mve_bundle(path.join(BUNDLE_FILE))?)
        } else {
            None
        };

        if self.is_dirty() {
            log::warn!(
                "discarding unsaved changes of '{}' while loading '{}'",
                self.path.display(),
                path.display()
            );
        }
        self.path = path.to_path_buf();
        self.views = views;
        self.bundle = bundle;
        self.bundle_dirty = false;
        Ok(())
    }

    /// Returns the scene directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the options the scene was opened with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the views in discovery order.
    #[must_use]
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Returns the views for in-place mutation.
    ///
    /// Views pushed here must be bound with [`View::save_view_as`] before
    /// [`Scene::save_views`] can persist them.
    pub fn views_mut(&mut self) -> &mut Vec<View> {
        &mut self.views
    }

    /// Returns the first view with the given id.
    #[must_use]
    pub fn view_by_id(&self, id: u32) -> Option<&View> {
        self.views.iter().find(|v| v.id() == id)
    }

    /// Returns the first view with the given id for mutation.
    pub fn view_by_id_mut(&mut self, id: u32) -> Option<&mut View> {
        self.views.iter_mut().find(|v| v.id() == id)
    }

    /// Returns the path of the bundle file.
    #[must_use]
    pub fn bundle_path(&self) -> PathBuf {
        self.path.join(BUNDLE_FILE)
    }

    /// Returns the bundle, reading it from disk on first access.
    ///
    /// Fails with [`MveError::NotFound`] if no bundle is cached and the
    /// bundle file does not exist. Failures are not cached.
    pub fn bundle(&mut self) -> Result<&Bundle> {
        let bundle = match self.bundle.take() {
            Some(bundle) => bundle,
            None => {
                let path = self.bundle_path();
                log::debug!("loading bundle from '{}'", path.display());
                load_mve_bundle(&path)?
            }
        };
        Ok(self.bundle.insert(bundle))
    }

    /// Returns the cached bundle without touching the disk.
    #[must_use]
    pub fn cached_bundle(&self) -> Option<&Bundle> {
        self.bundle.as_ref()
    }

    /// Replaces the bundle and marks it dirty.
    pub fn set_bundle(&mut self, bundle: Bundle) {
        self.bundle = Some(bundle);
        self.bundle_dirty = true;
    }

    /// Discards the in-memory bundle; the next access reads it from disk.
    pub fn reset_bundle(&mut self) {
        self.bundle = None;
        self.bundle_dirty = false;
    }

    /// Returns whether the bundle was replaced and not saved yet.
    #[must_use]
    pub fn is_bundle_dirty(&self) -> bool {
        self.bundle_dirty
    }

    /// Returns whether the bundle or any view differs from disk.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.bundle_dirty || self.views.iter().any(View::is_dirty)
    }

    /// Saves the bundle if it is dirty, then every dirty view.
    ///
    /// Both steps are attempted even if the first fails; the first error is
    /// returned and only the entities that were written are marked clean.
    pub fn save_scene(&mut self) -> Result<()> {
        let bundle_result = if self.bundle_dirty {
            self.save_bundle()
        } else {
            Ok(())
        };
        let views_result = self.save_views();
        bundle_result.and(views_result)
    }

    /// Writes the bundle file, reading the bundle first if none is cached.
    pub fn save_bundle(&mut self) -> Result<()> {
        let path = self.bundle_path();
        let bundle = self.bundle()?;
        save_mve_bundle(bundle, &path)?;
        self.bundle_dirty = false;
        log::info!("saved bundle '{}'", path.display());
        Ok(())
    }

    /// Saves every dirty view; clean views are not touched.
    ///
    /// All dirty views are attempted. Each view is marked clean only if its
    /// own write succeeded, and the first error is returned.
    pub fn save_views(&mut self) -> Result<()> {
        self.save_matching_views(View::is_dirty)
    }

    /// Saves every view regardless of its dirty state.
    pub fn rewrite_all_views(&mut self) -> Result<()> {
        self.save_matching_views(|_| true)
    }

    fn save_matching_views(&mut self, filter: impl Fn(&View) -> bool) -> Result<()> {
        let mut first_error = None;
        let mut saved = 0usize;
        for view in self.views.iter_mut().filter(|v| filter(v)) {
            match view.save_view() {
                Ok(()) => saved += 1,
                Err(e) => {
                    log::warn!("failed to save view {}: {e}", view.id());
                    first_error.get_or_insert(e);
                }
            }
        }
        log::info!("saved {saved} views of '{}'", self.path.display());
        first_error.map_or(Ok(()), Err)
    }

    /// Releases embedding payloads that are loaded but unchanged.
    ///
    /// Returns the number of released payloads.
    pub fn cache_cleanup(&mut self) -> usize {
        let released: usize = self.views.iter_mut().map(View::cache_cleanup).sum();
        log::debug!("released {released} cached embeddings");
        released
    }

    /// Returns the approximate memory held by all views.
    #[must_use]
    pub fn views_mem_usage(&self) -> usize {
        self.views.iter().map(View::mem_usage).sum()
    }

    /// Returns the approximate memory held by the cached bundle.
    #[must_use]
    pub fn bundle_mem_usage(&self) -> usize {
        self.bundle.as_ref().map_or(0, Bundle::byte_size)
    }
}

/// Validates the scene layout and loads one view per entry of `views/`.
fn discover_views(path: &Path, options: &Options) -> Result<Vec<View>> {
    let metadata = fs::metadata(path).map_err(|e| MveError::io(path, e))?;
    if !metadata.is_dir() {
        return Err(MveError::NotADirectory(path.to_path_buf()));
    }

    let views_dir = path.join(VIEWS_DIR);
    match fs::metadata(&views_dir) {
        Ok(m) if m.is_dir() => {}
        Ok(_) => return Err(MveError::structure(&views_dir, "not a directory")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MveError::structure(path, "missing views directory"));
        }
        Err(e) => return Err(MveError::io(&views_dir, e)),
    }

    let entries = fs::read_dir(&views_dir).map_err(|e| MveError::io(&views_dir, e))?;
    let mut views = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MveError::io(&views_dir, e))?;
        let entry_path = entry.path();
        match View::load(&entry_path) {
            Ok(view) => views.push(view),
            Err(e) => match options.view_errors {
                ViewErrorPolicy::Fail => return Err(e),
                ViewErrorPolicy::Skip => {
                    log::warn!("skipping view '{}': {e}", entry_path.display());
                }
            },
        }
    }

    if options.sort_views_by_id {
        views.sort_by_key(View::id);
    }
    log::info!("opened scene '{}' with {} views", path.display(), views.len());
    Ok(views)
}
