use glam::{Mat4, Vec3};
use mazewalk_common::Pose;

use crate::config::CameraConfig;

/// Orbit-style camera that keeps the character in view.
///
/// While locked the look-at target tracks the character and the camera is
/// pulled in whenever it drifts past `max_distance`. Unlocked, the target
/// stays put and the distance cap is relaxed. Camera motion lives outside
/// the character controller and never affects it.
pub struct FollowCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    max_distance: f32,
    locked: bool,
    config: CameraConfig,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl FollowCamera {
    pub fn new(config: CameraConfig) -> Self {
        let max_distance = if config.locked {
            config.locked_max_distance
        } else {
            config.unlocked_max_distance
        };
        Self {
            position: Vec3::new(0.0, 10.0, 20.0),
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
            aspect: 2.0,
            near: 0.1,
            far: 100.0,
            max_distance,
            locked: config.locked,
            config,
        }
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn zoom_in(&mut self) {
        if self.max_distance > self.config.min_zoom_distance {
            self.max_distance -= 1.0;
        }
    }

    pub fn zoom_out(&mut self) {
        self.max_distance += 1.0;
    }

    pub fn toggle_lock(&mut self) {
        self.locked = !self.locked;
        self.max_distance = if self.locked {
            self.config.locked_max_distance
        } else {
            self.config.unlocked_max_distance
        };
    }

    /// Track the character for this frame.
    pub fn follow(&mut self, pose: &Pose) {
        if self.locked {
            self.target = pose.position + Vec3::Y * self.config.target_height;
        }
        let offset = self.position - self.target;
        let dist = offset.length();
        if dist > self.max_distance && dist > f32::EPSILON {
            self.position = self.target + offset * (self.max_distance / dist);
        }
    }

    /// Place the camera at the configured offset from a freshly spawned character.
    pub fn reseat(&mut self, pose: &Pose) {
        self.position = pose.position + self.config.spawn_offset;
        self.target = pose.position + Vec3::Y * self.config.target_height;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = FollowCamera::default();
        assert!(cam.is_locked());
        assert_eq!(cam.max_distance(), 5.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn zoom_in_stops_at_floor() {
        let mut cam = FollowCamera::default();
        for _ in 0..10 {
            cam.zoom_in();
        }
        assert_eq!(cam.max_distance(), 1.0);
        cam.zoom_out();
        assert_eq!(cam.max_distance(), 2.0);
    }

    #[test]
    fn toggle_lock_switches_distance_cap() {
        let mut cam = FollowCamera::default();
        cam.zoom_out();
        cam.toggle_lock();
        assert!(!cam.is_locked());
        assert_eq!(cam.max_distance(), 100.0);
        cam.toggle_lock();
        assert_eq!(cam.max_distance(), 5.0);
    }

    #[test]
    fn locked_follow_tracks_and_clamps() {
        let mut cam = FollowCamera::default();
        let pose = Pose::new(Vec3::new(-19.0, 0.0, -19.0), 0.0);
        cam.follow(&pose);
        assert_eq!(cam.target, Vec3::new(-19.0, 1.0, -19.0));
        assert!((cam.distance() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn unlocked_follow_keeps_target() {
        let mut cam = FollowCamera::default();
        cam.toggle_lock();
        let before = cam.target;
        cam.follow(&Pose::new(Vec3::new(3.0, 0.0, 3.0), 0.0));
        assert_eq!(cam.target, before);
    }

    #[test]
    fn reseat_uses_spawn_offset() {
        let mut cam = FollowCamera::default();
        let pose = Pose::new(Vec3::new(1000.0, 0.0, 1000.0), 0.0);
        cam.reseat(&pose);
        assert_eq!(cam.position, Vec3::new(1003.0, 5.0, 1003.0));
        assert_eq!(cam.target, Vec3::new(1000.0, 1.0, 1000.0));
    }
}
