//! Camera calibration records (intrinsics and extrinsics).

use glam::{Mat3, Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Calibration of one reconstructed camera.
///
/// Focal length and principal point are normalized to the image size. The
/// rotation maps world to camera coordinates, so a world point `x` has camera
/// coordinates `rot * x + trans`.
///
/// A focal length of zero or less marks a camera that was not reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Normalized focal length.
    pub flen: f32,
    /// Normalized principal point.
    pub ppoint: Vec2,
    /// Pixel aspect ratio (height / width of a pixel).
    pub paspect: f32,
    /// Radial distortion coefficients.
    pub dist: Vec2,
    /// World to camera translation.
    pub trans: Vec3,
    /// World to camera rotation.
    pub rot: Mat3,
}

impl Default for CameraInfo {
    fn default() -> Self {
        Self {
            flen: 0.0,
            ppoint: Vec2::new(0.5, 0.5),
            paspect: 1.0,
            dist: Vec2::ZERO,
            trans: Vec3::ZERO,
            rot: Mat3::IDENTITY,
        }
    }
}

impl CameraInfo {
    /// Returns whether this camera was reconstructed.
    pub fn is_valid(&self) -> bool {
        self.flen > 0.0
    }

    /// Returns the rotation as nine values in row-major order.
    pub fn rotation_rows(&self) -> [f32; 9] {
        self.rot.transpose().to_cols_array()
    }

    /// Sets the rotation from nine values in row-major order.
    pub fn set_rotation_rows(&mut self, rows: &[f32; 9]) {
        self.rot = Mat3::from_cols_array(rows).transpose();
    }

    /// Returns the camera center in world coordinates.
    pub fn camera_position(&self) -> Vec3 {
        -(self.rot.transpose() * self.trans)
    }

    /// Returns the viewing direction in world coordinates.
    pub fn viewing_direction(&self) -> Vec3 {
        self.rot.row(2)
    }

    /// Returns the world to camera transform.
    pub fn world_to_cam(&self) -> Mat4 {
        Mat4::from_cols(
            self.rot.x_axis.extend(0.0),
            self.rot.y_axis.extend(0.0),
            self.rot.z_axis.extend(0.0),
            self.trans.extend(1.0),
        )
    }

    /// Returns the camera to world transform.
    pub fn cam_to_world(&self) -> Mat4 {
        let rot_t = self.rot.transpose();
        let center = -(rot_t * self.trans);
        Mat4::from_cols(
            rot_t.x_axis.extend(0.0),
            rot_t.y_axis.extend(0.0),
            rot_t.z_axis.extend(0.0),
            center.extend(1.0),
        )
    }

    /// Returns the pixel-space calibration matrix for an image of the given size.
    pub fn calibration(&self, width: u32, height: u32) -> Mat3 {
        let dim = width.max(height) as f32;
        let ax = self.flen * dim;
        let ay = ax / self.paspect;
        let px = self.ppoint.x * width as f32;
        let py = self.ppoint.y * height as f32;
        Mat3::from_cols(
            Vec3::new(ax, 0.0, 0.0),
            Vec3::new(0.0, ay, 0.0),
            Vec3::new(px, py, 1.0),
        )
    }
}
