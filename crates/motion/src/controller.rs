use glam::Vec3;
use mazewalk_common::{BoundingSphere, Obstacles, Pose};
use serde::{Deserialize, Serialize};

use crate::MotionError;
use crate::clip::{AnimationClip, ClipEvent, ClipPlayer, ClipRole, ClipSet, LocomotionClips, PlayMode};

/// Locomotion phase of the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocomotionPhase {
    Idle,
    Starting,
    Walking,
    Stopping,
}

/// Held-key intent, replaced wholesale every frame by the input layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub move_forward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Tuning for turn rate, walk speed, allowances and the collision sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Radians per second.
    pub turn_speed: f32,
    /// Scales both walking distance and clip playback rate.
    pub move_speed: f32,
    /// Distance per second at `move_speed` 1.
    pub base_distance_per_tick: f32,
    /// Distance still allowed once the stop clip starts.
    pub after_walk_allowance: f32,
    pub collision_radius: f32,
    /// Allowance used while a clip should not limit travel.
    pub unbounded_allowance: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            turn_speed: 2.0,
            move_speed: 2.0,
            // 0.4 units per 16-frame cycle at 30 fps
            base_distance_per_tick: 0.4 / (16.0 / 30.0),
            after_walk_allowance: 0.4,
            collision_radius: 0.2,
            unbounded_allowance: (1u32 << 20) as f32,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), MotionError> {
        let checks = [
            ("turn_speed", self.turn_speed, self.turn_speed.is_finite()),
            ("move_speed", self.move_speed, self.move_speed > 0.0),
            (
                "base_distance_per_tick",
                self.base_distance_per_tick,
                self.base_distance_per_tick >= 0.0,
            ),
            (
                "after_walk_allowance",
                self.after_walk_allowance,
                self.after_walk_allowance >= 0.0,
            ),
            ("collision_radius", self.collision_radius, self.collision_radius >= 0.0),
            (
                "unbounded_allowance",
                self.unbounded_allowance,
                self.unbounded_allowance > 0.0,
            ),
        ];
        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(MotionError::InvalidArgument(format!(
                    "motion config {name} = {value} is out of range"
                )));
            }
        }
        Ok(())
    }
}

/// Something observable that happened during an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MotionEvent {
    PhaseChanged {
        from: LocomotionPhase,
        to: LocomotionPhase,
    },
    /// A step was undone because it would have hit an obstacle.
    MoveRejected { at: Vec3 },
    Teleported { to: Pose },
}

/// Point-in-time copy of the controller's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    pub pose: Pose,
    pub phase: LocomotionPhase,
    pub walking: bool,
    pub moving: bool,
    pub remaining_allowance: f32,
}

/// Per-frame locomotion state machine for a single character.
///
/// `walking` latches forward intent; `moving` stays true from the start clip
/// until the stop clip finishes. Translation is limited by the remaining
/// allowance so a stop clip can only carry the character a fixed distance.
pub struct CharacterMotionController {
    config: MotionConfig,
    clips: LocomotionClips,
    player: ClipPlayer,
    pose: Pose,
    phase: LocomotionPhase,
    intent: InputIntent,
    walking: bool,
    moving: bool,
    allowance: f32,
    event_log: Vec<MotionEvent>,
}

impl CharacterMotionController {
    /// Build a controller in `Idle` at `pose`. Fails on bad config or clip handles.
    pub fn new(
        config: MotionConfig,
        clips: &[AnimationClip],
        clip_set: &ClipSet,
        pose: Pose,
    ) -> Result<Self, MotionError> {
        config.validate()?;
        let clips = clip_set.resolve(clips)?;
        let mut player = ClipPlayer::new(config.move_speed);
        if let Some(idle) = &clips.idle {
            player.play(ClipRole::Idle, idle, PlayMode::Loop);
        }
        Ok(Self {
            config,
            clips,
            player,
            pose,
            phase: LocomotionPhase::Idle,
            intent: InputIntent::default(),
            walking: false,
            moving: false,
            allowance: 0.0,
            event_log: Vec::new(),
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn phase(&self) -> LocomotionPhase {
        self.phase
    }

    pub fn intent(&self) -> InputIntent {
        self.intent
    }

    pub fn remaining_allowance(&self) -> f32 {
        self.allowance
    }

    pub fn is_walking(&self) -> bool {
        self.walking
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn current_clip(&self) -> Option<ClipRole> {
        self.player.current()
    }

    pub fn state(&self) -> CharacterState {
        CharacterState {
            pose: self.pose,
            phase: self.phase,
            walking: self.walking,
            moving: self.moving,
            remaining_allowance: self.allowance,
        }
    }

    pub fn events(&self) -> &[MotionEvent] {
        &self.event_log
    }

    pub fn drain_events(&mut self) -> Vec<MotionEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn set_move_forward(&mut self, active: bool) {
        self.intent.move_forward = active;
        if active {
            self.apply_forward_intent();
        } else {
            self.walking = false;
        }
    }

    pub fn set_turn_left(&mut self, active: bool) {
        self.intent.turn_left = active;
    }

    pub fn set_turn_right(&mut self, active: bool) {
        self.intent.turn_right = active;
    }

    pub fn set_intent(&mut self, intent: InputIntent) {
        self.set_turn_left(intent.turn_left);
        self.set_turn_right(intent.turn_right);
        self.set_move_forward(intent.move_forward);
    }

    /// Re-seat the character, e.g. when switching between demo areas.
    /// The locomotion phase carries over.
    pub fn teleport(&mut self, pose: Pose) {
        self.pose = pose;
        tracing::debug!(position = ?pose.position, heading = pose.heading, "teleported");
        self.event_log.push(MotionEvent::Teleported { to: pose });
    }

    /// Advance one frame. Must be called exactly once per rendered frame.
    pub fn update<O: Obstacles + ?Sized>(&mut self, dt: f32, obstacles: &O) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        // held key acts like key repeat: restart once the previous stop is over
        if self.intent.move_forward {
            self.apply_forward_intent();
        }

        if self.intent.turn_left {
            self.pose.rotate(dt * self.config.turn_speed);
        }
        if self.intent.turn_right {
            self.pose.rotate(-dt * self.config.turn_speed);
        }

        if self.moving && self.allowance > 0.0 {
            let step = self.config.move_speed * self.config.base_distance_per_tick * dt;
            let dist = self.allowance.min(step);
            self.allowance -= dist;
            let before = self.pose.position;
            self.pose.translate_forward(dist);
            let sphere = BoundingSphere::new(self.pose.position, self.config.collision_radius);
            if obstacles.blocks(&sphere) {
                tracing::trace!(at = ?self.pose.position, "move rejected");
                self.event_log.push(MotionEvent::MoveRejected {
                    at: self.pose.position,
                });
                self.pose.position = before;
            }
        }

        if let Some(event) = self.player.advance(dt) {
            self.on_clip_event(event);
        }
    }

    fn apply_forward_intent(&mut self) {
        if self.walking {
            return;
        }
        if self.moving {
            // absorbed by the next clip boundary
            self.walking = true;
        } else {
            self.walking = true;
            self.moving = true;
            self.allowance = self.config.unbounded_allowance;
            self.play(ClipRole::WalkStart, PlayMode::Once);
            self.enter(LocomotionPhase::Starting);
        }
    }

    fn on_clip_event(&mut self, event: ClipEvent) {
        match (self.phase, event) {
            (LocomotionPhase::Starting, ClipEvent::Finished(ClipRole::WalkStart)) => {
                self.allowance = self.config.unbounded_allowance;
                if self.walking {
                    self.play(ClipRole::Walk, PlayMode::Loop);
                    self.enter(LocomotionPhase::Walking);
                } else {
                    self.begin_stop();
                }
            }
            (LocomotionPhase::Walking, ClipEvent::Looped(ClipRole::Walk)) => {
                self.allowance = self.config.unbounded_allowance;
                if !self.walking {
                    self.begin_stop();
                }
            }
            (LocomotionPhase::Stopping, ClipEvent::Finished(ClipRole::WalkStop)) => {
                self.allowance = self.config.unbounded_allowance;
                self.moving = false;
                // intent re-entered during the stop is re-evaluated next frame
                self.walking = false;
                match self.clips.idle.clone() {
                    Some(idle) => self.player.play(ClipRole::Idle, &idle, PlayMode::Loop),
                    None => self.player.stop_all(),
                }
                self.enter(LocomotionPhase::Idle);
            }
            _ => {}
        }
    }

    fn begin_stop(&mut self) {
        self.allowance = self.config.after_walk_allowance;
        self.play(ClipRole::WalkStop, PlayMode::Once);
        self.enter(LocomotionPhase::Stopping);
    }

    fn play(&mut self, role: ClipRole, mode: PlayMode) {
        if let Some(clip) = self.clips.get(role) {
            self.player.play(role, clip, mode);
        }
    }

    fn enter(&mut self, to: LocomotionPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        tracing::debug!(?from, ?to, "locomotion phase changed");
        self.event_log.push(MotionEvent::PhaseChanged { from, to });
    }
}
