//! Joint angle calculation from three 2-D keypoints.
//!
//! The angle is the difference between the direction of the proximal segment
//! (hip→knee) and the distal segment (knee→ankle), in degrees. With the hip
//! directly above the knee and the ankle directly below, both segments point
//! the same way and the angle is 0; as the leg folds the angle grows.

use crate::types::Keypoint;

/// Direction of the segment from `from` to `to`, in radians.
fn segment_direction(from: &Keypoint, to: &Keypoint) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Knee angle in degrees from hip, knee and ankle keypoints.
///
/// `(atan2(knee - hip) - atan2(ankle - knee)) * 180/π`. The value is not
/// wrapped, so it lies in (-360, 360); thresholds are compared against it
/// directly.
pub fn knee_angle(hip: &Keypoint, knee: &Keypoint, ankle: &Keypoint) -> f32 {
    let thigh = segment_direction(hip, knee);
    let shin = segment_direction(knee, ankle);
    (thigh - shin).to_degrees()
}
