//! Persisted structure implementations for mve-rs.
//!
//! This crate provides the records a scene is made of:
//! - [`Bundle`]: camera calibrations and sparse feature tracks
//! - [`bundle_io`]: the text codec for bundle files
//! - [`View`]: a directory-backed record with lazily loaded embeddings

// Error cases are documented on MveError
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod bundle;
pub mod bundle_io;
pub mod view;

pub use bundle::{Bundle, Feature2D, Feature3D};
pub use bundle_io::{load_mve_bundle, read_mve_bundle, save_mve_bundle, write_mve_bundle};
pub use view::View;
