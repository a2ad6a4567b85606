//! Shared types for the mazewalk workspace.
//!
//! # Invariants
//! - Headings are radians about +Y, normalized into `[0, TAU)`.
//! - Obstacle sets are read-only once built.

pub mod geometry;
pub mod types;

pub use geometry::{Aabb, BoundingSphere, ObstacleSet, Obstacles};
pub use types::Pose;

pub fn crate_info() -> &'static str {
    "mazewalk-common v0.1.0"
}
