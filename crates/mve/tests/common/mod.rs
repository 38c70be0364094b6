//! Scene fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use mve::{save_mve_bundle, Bundle, CameraInfo, Scene, Vec3, View, BUNDLE_FILE, VIEWS_DIR};
use tempfile::TempDir;

/// A scene directory that is removed when dropped.
pub struct SceneDir {
    _root: TempDir,
    pub path: PathBuf,
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a scene directory with `view_count` views named `view<i>` with id
/// `i`, and a bundle file if `bundle` is given.
pub fn create_scene_on_disk(view_count: u32, bundle: Option<&Bundle>) -> SceneDir {
    init_logging();
    let root = tempfile::tempdir().expect("failed to create temp dir");
    let path = root.path().join("test_scene");
    let views_dir = path.join(VIEWS_DIR);
    fs::create_dir_all(&views_dir).expect("failed to create views dir");

    for i in 0..view_count {
        let mut view = View::new();
        view.set_name(format!("view{i}"));
        view.set_id(i);
        view.save_view_as(views_dir.join(format!("view_{i:04}.mve")))
            .expect("failed to save view");
    }

    if let Some(bundle) = bundle {
        save_mve_bundle(bundle, path.join(BUNDLE_FILE)).expect("failed to save bundle");
    }

    SceneDir { _root: root, path }
}

/// Creates a directory holding only a bundle file, without `views/`.
pub fn create_directory_without_views(bundle: &Bundle) -> SceneDir {
    let root = tempfile::tempdir().expect("failed to create temp dir");
    let path = root.path().join("no_views");
    fs::create_dir(&path).expect("failed to create dir");
    save_mve_bundle(bundle, path.join(BUNDLE_FILE)).expect("failed to save bundle");
    SceneDir { _root: root, path }
}

/// Returns a path inside a fresh temp dir that does not exist.
pub fn missing_directory() -> SceneDir {
    let root = tempfile::tempdir().expect("failed to create temp dir");
    let path = root.path().join("does_not_exist");
    SceneDir { _root: root, path }
}

pub fn make_dirty(view: &mut View) {
    let name = format!("{}a", view.name());
    view.set_name(name);
    assert!(view.is_dirty());
}

pub fn make_a_clean_view_dirty(scene: &mut Scene) {
    let view = scene
        .views_mut()
        .iter_mut()
        .find(|v| !v.is_dirty())
        .expect("no clean view left");
    make_dirty(view);
}

pub fn load_views_directly_from(scene_directory: &Path) -> Vec<View> {
    fs::read_dir(scene_directory.join(VIEWS_DIR))
        .expect("failed to list views")
        .map(|entry| View::load(entry.expect("bad entry").path()).expect("failed to load view"))
        .collect()
}

pub fn load_bundle_directly_from(scene_directory: &Path) -> Bundle {
    mve::load_mve_bundle(scene_directory.join(BUNDLE_FILE)).expect("failed to load bundle")
}

/// Builds a bundle with `camera_count` cameras; every third camera is not
/// reconstructed.
pub fn make_bundle(camera_count: u32) -> Bundle {
    let mut bundle = Bundle::new();
    for i in 1..=camera_count {
        let f = i as f32;
        let camera = CameraInfo {
            flen: if i % 3 == 1 { 0.0 } else { 1.0 + 2.0 / f },
            paspect: 0.5 + 1.0 / f,
            trans: Vec3::new(f - 10.0, 1.0 / f, 10.0 - f),
            ..CameraInfo::default()
        };
        bundle.cameras_mut().push(camera);
    }
    bundle
}

/// Matches two view lists by id and name, ignoring order.
pub fn views_match(lhs: &[View], rhs: &[View]) -> bool {
    lhs.len() == rhs.len()
        && lhs.iter().all(|left| {
            rhs.iter()
                .find(|right| right.id() == left.id())
                .is_some_and(|right| right.name() == left.name())
        })
}
