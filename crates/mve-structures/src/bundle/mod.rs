//! Bundle: camera calibrations and sparse feature tracks of a scene.

mod feature;

use std::mem::size_of;

use mve_core::{cameras_match, CameraInfo, MveError, Result};

pub use feature::{Feature2D, Feature3D};

/// Camera calibrations and feature tracks shared by all views of a scene.
///
/// Cameras are index-aligned with the `view_id` of [`Feature2D`]
/// observations. A bundle carries no dirty flag; the owning scene tracks
/// whether the cached instance was replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    cameras: Vec<CameraInfo>,
    features: Vec<Feature3D>,
}

impl Bundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bundle from existing lists.
    pub fn from_parts(cameras: Vec<CameraInfo>, features: Vec<Feature3D>) -> Self {
        Self { cameras, features }
    }

    /// Returns the cameras.
    #[must_use]
    pub fn cameras(&self) -> &[CameraInfo] {
        &self.cameras
    }

    /// Returns the cameras for appending or editing.
    pub fn cameras_mut(&mut self) -> &mut Vec<CameraInfo> {
        &mut self.cameras
    }

    /// Returns the feature tracks.
    #[must_use]
    pub fn features(&self) -> &[Feature3D] {
        &self.features
    }

    /// Returns the feature tracks for appending or editing.
    pub fn features_mut(&mut self) -> &mut Vec<Feature3D> {
        &mut self.features
    }

    /// Returns the number of cameras.
    #[must_use]
    pub fn num_cameras(&self) -> usize {
        self.cameras.len()
    }

    /// Returns the number of feature tracks.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// Returns the number of reconstructed cameras.
    #[must_use]
    pub fn num_valid_cameras(&self) -> usize {
        self.cameras.iter().filter(|c| c.is_valid()).count()
    }

    /// Returns an estimate of the heap memory held by this bundle.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        let refs: usize = self
            .features
            .iter()
            .map(|f| f.refs.capacity() * size_of::<Feature2D>())
            .sum();
        self.cameras.capacity() * size_of::<CameraInfo>()
            + self.features.capacity() * size_of::<Feature3D>()
            + refs
    }

    /// Invalidates a camera and drops every observation made by it.
    ///
    /// The camera keeps its slot so indices of the other cameras stay valid.
    pub fn delete_camera(&mut self, index: usize) -> Result<()> {
        let len = self.cameras.len();
        let camera = self
            .cameras
            .get_mut(index)
            .ok_or(MveError::IndexOutOfRange { index, len })?;
        *camera = CameraInfo::default();

        let view_id = i32::try_from(index).map_err(|_| MveError::IndexOutOfRange { index, len })?;
        let mut removed = 0;
        for feature in &mut self.features {
            let before = feature.refs.len();
            feature.refs.retain(|r| r.view_id != view_id);
            removed += before - feature.refs.len();
        }
        log::debug!("deleted camera {index}, dropped {removed} observations");
        Ok(())
    }

    /// Removes tracks observed by fewer than two views, keeping order.
    ///
    /// Returns the number of removed tracks.
    pub fn clean_features(&mut self) -> usize {
        let before = self.features.len();
        self.features.retain(|f| f.refs.len() >= 2);
        before - self.features.len()
    }

    /// Returns whether both bundles hold matching cameras and the same
    /// number of feature tracks.
    ///
    /// Cameras are compared by index with [`mve_core::float_match`] tolerance.
    #[must_use]
    pub fn matches(&self, other: &Bundle) -> bool {
        self.cameras.len() == other.cameras.len()
            && self.features.len() == other.features.len()
            && self
                .cameras
                .iter()
                .zip(&other.cameras)
                .all(|(a, b)| cameras_match(a, b))
    }
}
