//! Core abstractions for mve-rs.
//!
//! This crate provides the fundamental types shared by the scene crates:
//! - [`MveError`] and the [`Result`] alias used by every fallible operation
//! - [`CameraInfo`] calibration records stored in bundles and views
//! - Scene [`Options`] and float matching helpers

// Error cases are documented on MveError
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Calibration math converts between image sizes and floats
#![allow(clippy::cast_precision_loss)]

pub mod camera;
pub mod error;
pub mod matching;
pub mod options;

pub use camera::CameraInfo;
pub use error::{ErrorKind, MveError, Result};
pub use matching::{cameras_match, float_match};
pub use options::{Options, ViewErrorPolicy};

// Re-export glam types for convenience
pub use glam::{Mat3, Mat4, Vec2, Vec3};

/// Name of the required views subdirectory of a scene.
pub const VIEWS_DIR: &str = "views";

/// Name of the bundle file in a scene root.
pub const BUNDLE_FILE: &str = "synth_0.out";
