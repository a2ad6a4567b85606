use serde::{Deserialize, Serialize};

use crate::MotionError;

/// Length of one walk cycle in the bundled character rig: 16 frames at 30 fps.
pub const WALK_CYCLE_SECONDS: f32 = 16.0 / 30.0;

/// A named animation clip as reported by the model loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Seconds at time scale 1.
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Clip list in the order the character rig exports them.
pub fn default_clips() -> Vec<AnimationClip> {
    vec![
        AnimationClip::new("Walk", WALK_CYCLE_SECONDS),
        AnimationClip::new("Walk_Start", WALK_CYCLE_SECONDS),
        AnimationClip::new("Walk_Stop", WALK_CYCLE_SECONDS),
    ]
}

/// Which locomotion clip is which, by index into the clip list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSet {
    pub walk: usize,
    pub walk_start: usize,
    pub walk_stop: usize,
    pub idle: Option<usize>,
}

impl Default for ClipSet {
    fn default() -> Self {
        Self {
            walk: 0,
            walk_start: 1,
            walk_stop: 2,
            idle: None,
        }
    }
}

impl ClipSet {
    /// Look up every index; fails on out-of-range indices or unusable durations.
    pub fn resolve(&self, clips: &[AnimationClip]) -> Result<LocomotionClips, MotionError> {
        let pick = |role: &str, index: usize| -> Result<AnimationClip, MotionError> {
            let clip = clips.get(index).ok_or_else(|| {
                MotionError::InvalidArgument(format!(
                    "{role} clip index {index} out of range ({} clips)",
                    clips.len()
                ))
            })?;
            if !(clip.duration.is_finite() && clip.duration > 0.0) {
                return Err(MotionError::InvalidArgument(format!(
                    "{role} clip '{}' has unusable duration {}",
                    clip.name, clip.duration
                )));
            }
            Ok(clip.clone())
        };

        Ok(LocomotionClips {
            walk: pick("walk", self.walk)?,
            walk_start: pick("walk_start", self.walk_start)?,
            walk_stop: pick("walk_stop", self.walk_stop)?,
            idle: self.idle.map(|i| pick("idle", i)).transpose()?,
        })
    }
}

/// Resolved clips, validated once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LocomotionClips {
    pub walk: AnimationClip,
    pub walk_start: AnimationClip,
    pub walk_stop: AnimationClip,
    pub idle: Option<AnimationClip>,
}

impl LocomotionClips {
    pub fn get(&self, role: ClipRole) -> Option<&AnimationClip> {
        match role {
            ClipRole::Idle => self.idle.as_ref(),
            ClipRole::WalkStart => Some(&self.walk_start),
            ClipRole::Walk => Some(&self.walk),
            ClipRole::WalkStop => Some(&self.walk_stop),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClipRole {
    Idle,
    WalkStart,
    Walk,
    WalkStop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// Play through once, then hold the last frame.
    Once,
    Loop,
}

/// Notification produced when the active clip crosses its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEvent {
    Finished(ClipRole),
    Looped(ClipRole),
}

#[derive(Debug, Clone)]
struct ActiveClip {
    role: ClipRole,
    duration: f32,
    mode: PlayMode,
    time: f32,
    done: bool,
}

/// Deterministic stand-in for an animation mixer with a single active clip.
///
/// Playing a clip stops whatever was playing before. At most one event is
/// reported per `advance`, however large the step.
#[derive(Debug, Clone)]
pub struct ClipPlayer {
    time_scale: f32,
    active: Option<ActiveClip>,
}

impl ClipPlayer {
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale,
            active: None,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn play(&mut self, role: ClipRole, clip: &AnimationClip, mode: PlayMode) {
        self.active = Some(ActiveClip {
            role,
            duration: clip.duration,
            mode,
            time: 0.0,
            done: false,
        });
    }

    pub fn stop_all(&mut self) {
        self.active = None;
    }

    pub fn current(&self) -> Option<ClipRole> {
        self.active.as_ref().map(|a| a.role)
    }

    /// Playback position of the active clip in clip seconds.
    pub fn time(&self) -> f32 {
        self.active.as_ref().map_or(0.0, |a| a.time)
    }

    pub fn is_finished(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.done)
    }

    pub fn advance(&mut self, dt: f32) -> Option<ClipEvent> {
        let active = self.active.as_mut()?;
        if active.done {
            return None;
        }
        active.time += dt * self.time_scale;
        if active.time < active.duration {
            return None;
        }
        match active.mode {
            PlayMode::Once => {
                active.time = active.duration;
                active.done = true;
                Some(ClipEvent::Finished(active.role))
            }
            PlayMode::Loop => {
                active.time = active.time.rem_euclid(active.duration);
                Some(ClipEvent::Looped(active.role))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_resolves_against_default_clips() {
        let clips = ClipSet::default().resolve(&default_clips()).unwrap();
        assert_eq!(clips.walk.name, "Walk");
        assert_eq!(clips.walk_start.name, "Walk_Start");
        assert_eq!(clips.walk_stop.name, "Walk_Stop");
        assert!(clips.get(ClipRole::Idle).is_none());
    }

    #[test]
    fn out_of_range_index_is_invalid_argument() {
        let set = ClipSet {
            walk_stop: 7,
            ..ClipSet::default()
        };
        let err = set.resolve(&default_clips()).unwrap_err();
        assert!(matches!(err, MotionError::InvalidArgument(_)));
        assert!(err.to_string().contains("walk_stop"));
    }

    #[test]
    fn bad_idle_index_is_rejected() {
        let set = ClipSet {
            idle: Some(3),
            ..ClipSet::default()
        };
        assert!(set.resolve(&default_clips()).is_err());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut clips = default_clips();
        clips[0].duration = 0.0;
        assert!(ClipSet::default().resolve(&clips).is_err());
    }

    #[test]
    fn once_clip_finishes_and_clamps() {
        let mut player = ClipPlayer::new(2.0);
        player.play(ClipRole::WalkStart, &AnimationClip::new("s", 1.0), PlayMode::Once);
        assert_eq!(player.advance(0.25), None);
        assert_eq!(player.advance(0.3), Some(ClipEvent::Finished(ClipRole::WalkStart)));
        assert_eq!(player.time(), 1.0);
        assert!(player.is_finished());
        // holds the last frame without re-reporting
        assert_eq!(player.advance(1.0), None);
    }

    #[test]
    fn loop_clip_wraps() {
        let mut player = ClipPlayer::new(1.0);
        player.play(ClipRole::Walk, &AnimationClip::new("w", 1.0), PlayMode::Loop);
        assert_eq!(player.advance(0.75), None);
        assert_eq!(player.advance(0.5), Some(ClipEvent::Looped(ClipRole::Walk)));
        assert!((player.time() - 0.25).abs() < 1e-6);
        assert!(!player.is_finished());
    }

    #[test]
    fn play_replaces_active_clip() {
        let mut player = ClipPlayer::new(1.0);
        player.play(ClipRole::Walk, &AnimationClip::new("w", 1.0), PlayMode::Loop);
        player.advance(0.5);
        player.play(ClipRole::WalkStop, &AnimationClip::new("x", 1.0), PlayMode::Once);
        assert_eq!(player.current(), Some(ClipRole::WalkStop));
        assert_eq!(player.time(), 0.0);
        player.stop_all();
        assert_eq!(player.current(), None);
        assert_eq!(player.advance(10.0), None);
    }

    #[test]
    fn clip_set_deserializes_partial() {
        let set: ClipSet = serde_json::from_str(r#"{"idle": 3}"#).unwrap();
        assert_eq!(set.idle, Some(3));
        assert_eq!(set.walk_start, 1);
    }
}
