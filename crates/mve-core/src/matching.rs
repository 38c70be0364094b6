//! Tolerant float comparison for persisted calibration data.

use crate::camera::CameraInfo;

/// Relative tolerance used when matching persisted floats.
pub const MATCH_EPSILON: f32 = 1e-5;

/// Returns whether `actual` matches `expected` within [`MATCH_EPSILON`].
///
/// The tolerance is relative to `expected`, falling back to an absolute
/// tolerance when `expected` is exactly zero.
#[allow(clippy::float_cmp)]
pub fn float_match(actual: f32, expected: f32) -> bool {
    if expected == 0.0 {
        actual.abs() < MATCH_EPSILON
    } else {
        (actual / expected - 1.0).abs() < MATCH_EPSILON
    }
}

fn all_match(actual: &[f32], expected: &[f32]) -> bool {
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected)
            .all(|(&a, &e)| float_match(a, e))
}

/// Returns whether every calibration field of two cameras matches.
pub fn cameras_match(actual: &CameraInfo, expected: &CameraInfo) -> bool {
    float_match(actual.flen, expected.flen)
        && float_match(actual.paspect, expected.paspect)
        && all_match(&actual.ppoint.to_array(), &expected.ppoint.to_array())
        && all_match(&actual.dist.to_array(), &expected.dist.to_array())
        && all_match(&actual.trans.to_array(), &expected.trans.to_array())
        && all_match(&actual.rotation_rows(), &expected.rotation_rows())
}
