//! Character motion: locomotion phases, clip playback, and collision-gated
//! translation, advanced once per frame.
//!
//! # Invariants
//! - All state changes flow through intent setters, `update`, or `teleport`.
//! - Clip completion is evaluated inside `update`, never by callbacks.
//! - A rejected move restores the exact pre-move position; spent allowance
//!   is not refunded.

pub mod clip;
pub mod controller;

pub use clip::{
    AnimationClip, ClipEvent, ClipPlayer, ClipRole, ClipSet, LocomotionClips, PlayMode,
    WALK_CYCLE_SECONDS, default_clips,
};
pub use controller::{
    CharacterMotionController, CharacterState, InputIntent, LocomotionPhase, MotionConfig,
    MotionEvent,
};

/// Errors from building a motion controller.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub fn crate_info() -> &'static str {
    "mazewalk-motion v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("motion"));
    }
}
