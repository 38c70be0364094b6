//! Sparse feature tracks.

use glam::{Vec2, Vec3};

/// Observation of a track in one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature2D {
    /// Id of the observing view (index into the bundle's camera list).
    pub view_id: i32,
    /// Index of the feature within that view.
    pub feature_id: i32,
    /// Image position of the observation.
    pub pos: Vec2,
}

impl Feature2D {
    /// Creates a new observation.
    pub fn new(view_id: i32, feature_id: i32, pos: Vec2) -> Self {
        Self {
            view_id,
            feature_id,
            pos,
        }
    }
}

/// A reconstructed 3-D point and the views that observe it.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature3D {
    /// World position.
    pub pos: Vec3,
    /// RGB color in `[0, 1]`.
    pub color: Vec3,
    /// Observations, in insertion order.
    pub refs: Vec<Feature2D>,
}

impl Default for Feature3D {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            color: Vec3::ONE,
            refs: Vec::new(),
        }
    }
}

impl Feature3D {
    /// Creates a track without observations.
    pub fn new(pos: Vec3, color: Vec3) -> Self {
        Self {
            pos,
            color,
            refs: Vec::new(),
        }
    }

    /// Returns whether any observation references `view_id`.
    pub fn contains_view_id(&self, view_id: i32) -> bool {
        self.refs.iter().any(|r| r.view_id == view_id)
    }
}
