use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Wrap an angle into `[0, TAU)`.
pub fn normalize_heading(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Ground-plane pose of a character: position plus heading about +Y.
///
/// Heading 0 faces +Z. Positive headings turn left (counter-clockwise seen
/// from above), matching a right-handed Y-up world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub heading: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            heading: 0.0,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            heading: normalize_heading(heading),
        }
    }

    /// Unit vector the character walks along.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }

    /// Rotate about +Y by `delta` radians.
    pub fn rotate(&mut self, delta: f32) {
        self.heading = normalize_heading(self.heading + delta);
    }

    /// Move along the current forward vector.
    pub fn translate_forward(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    /// Rotation quaternion for renderers that want a full orientation.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn pose_default_faces_positive_z() {
        let p = Pose::default();
        assert_eq!(p.position, Vec3::ZERO);
        assert!((p.forward() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn rotate_wraps_into_range() {
        let mut p = Pose::default();
        p.rotate(-FRAC_PI_2);
        assert!((p.heading - 3.0 * FRAC_PI_2).abs() < 1e-5);
        p.rotate(PI);
        assert!((p.heading - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn positive_heading_turns_left() {
        let mut p = Pose::default();
        p.rotate(FRAC_PI_2);
        // quarter turn left from +Z faces +X
        assert!((p.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn translate_forward_then_back_restores_position() {
        let mut p = Pose::new(Vec3::new(1.0, 0.0, -2.0), 0.7);
        let start = p.position;
        p.translate_forward(0.3);
        assert!((p.position - start).length() > 0.29);
        p.translate_forward(-0.3);
        assert!((p.position - start).length() < 1e-5);
    }

    #[test]
    fn rotation_matches_forward() {
        let p = Pose::new(Vec3::ZERO, 1.2);
        let via_quat = p.rotation() * Vec3::Z;
        assert!((via_quat - p.forward()).length() < 1e-5);
    }
}
