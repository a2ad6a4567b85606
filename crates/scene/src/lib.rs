//! Scene assembly: builds the maze and its obstacles, places the character,
//! and drives everything from a single per-frame `update`.
//!
//! # Invariants
//! - One `update` per rendered frame, on the render thread.
//! - Key events reach the controller only as actions.
//! - The obstacle set is fixed once the scene is built.

mod camera;
mod config;
mod frame;
mod scene;

pub use camera::FollowCamera;
pub use config::{CameraConfig, ConfigError, MazeConfig, PropBox, SceneConfig, SpawnPoint};
pub use frame::FrameTimer;
pub use scene::{Scene, SceneSummary};

use mazewalk_maze::MazeError;
use mazewalk_motion::MotionError;

/// Errors from building a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("maze error: {0}")]
    Maze(#[from] MazeError),
    #[error("motion error: {0}")]
    Motion(#[from] MotionError),
}

pub fn crate_info() -> &'static str {
    "mazewalk-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
