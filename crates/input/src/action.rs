use serde::{Deserialize, Serialize};

/// A high-level action produced from a key edge.
///
/// Intent actions carry the held state; the rest are one-shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Walk forward while true.
    MoveForward(bool),
    TurnLeft(bool),
    TurnRight(bool),
    /// Pull the follow camera closer.
    ZoomIn,
    ZoomOut,
    /// Toggle whether the camera tracks the character.
    ToggleCameraLock,
    /// Advance the wall shader variant.
    CycleShader,
    /// Teleport to the next spawn point.
    CycleSpawn,
    /// Unbound key, or a one-shot control being released.
    Noop,
}

/// What a key is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    MoveForward,
    TurnLeft,
    TurnRight,
    ZoomIn,
    ZoomOut,
    ToggleCameraLock,
    CycleShader,
    CycleSpawn,
}

impl Control {
    /// Held controls follow the key state; the others trigger on key down.
    pub fn is_held(self) -> bool {
        matches!(self, Self::MoveForward | Self::TurnLeft | Self::TurnRight)
    }

    pub fn action(self, pressed: bool) -> Action {
        match self {
            Self::MoveForward => Action::MoveForward(pressed),
            Self::TurnLeft => Action::TurnLeft(pressed),
            Self::TurnRight => Action::TurnRight(pressed),
            _ if !pressed => Action::Noop,
            Self::ZoomIn => Action::ZoomIn,
            Self::ZoomOut => Action::ZoomOut,
            Self::ToggleCameraLock => Action::ToggleCameraLock,
            Self::CycleShader => Action::CycleShader,
            Self::CycleSpawn => Action::CycleSpawn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_controls_report_both_edges() {
        assert_eq!(Control::MoveForward.action(true), Action::MoveForward(true));
        assert_eq!(Control::MoveForward.action(false), Action::MoveForward(false));
        assert_eq!(Control::TurnLeft.action(false), Action::TurnLeft(false));
        assert!(Control::TurnRight.is_held());
    }

    #[test]
    fn one_shot_controls_ignore_release() {
        assert_eq!(Control::ZoomIn.action(true), Action::ZoomIn);
        assert_eq!(Control::ZoomIn.action(false), Action::Noop);
        assert_eq!(Control::CycleSpawn.action(false), Action::Noop);
        assert!(!Control::ToggleCameraLock.is_held());
    }

    #[test]
    fn control_names_are_snake_case() {
        let json = serde_json::to_string(&Control::ToggleCameraLock).unwrap();
        assert_eq!(json, "\"toggle_camera_lock\"");
    }
}
