//! mve-rs: scene persistence for multi-view reconstruction projects.
//!
//! A scene directory holds one directory per captured view and a single
//! bundle file with camera calibrations and sparse feature tracks:
//!
//! ```text
//! scene_root/
//!     views/
//!         view_0000.mve/
//!         view_0001.mve/
//!     synth_0.out
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use mve::*;
//!
//! fn main() -> Result<()> {
//!     let mut scene = Scene::create("/data/scene")?;
//!
//!     if let Some(view) = scene.views_mut().first_mut() {
//!         let renamed = format!("{}-checked", view.name());
//!         view.set_name(renamed);
//!     }
//!     assert!(scene.is_dirty());
//!
//!     // Writes only the views that changed.
//!     scene.save_views()?;
//!     assert!(!scene.is_dirty());
//!     Ok(())
//! }
//! ```
//!
//! # Dirty tracking
//!
//! - A [`View`] is dirty after any setter until it is saved.
//! - The bundle is dirty after [`Scene::set_bundle`] until it is saved or reset.
//! - [`Scene::is_dirty`] is recomputed from both on every call.

// Error cases are documented on MveError
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod scene;

// Re-export core types
pub use mve_core::{
    camera::CameraInfo,
    error::{ErrorKind, MveError, Result},
    matching::{cameras_match, float_match},
    options::{Options, ViewErrorPolicy},
    Mat3, Mat4, Vec2, Vec3, BUNDLE_FILE, VIEWS_DIR,
};

// Re-export structures
pub use mve_structures::{
    bundle_io::{load_mve_bundle, read_mve_bundle, save_mve_bundle, write_mve_bundle},
    Bundle, Feature2D, Feature3D, View,
};

pub use scene::Scene;

/// Initializes logging from the `RUST_LOG` environment variable.
///
/// Calling this more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
