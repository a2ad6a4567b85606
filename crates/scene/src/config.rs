//! Scene configuration, loadable from YAML or JSON.
//!
//! Every section has defaults that reproduce the maze demo, so an empty file
//! (or no file at all) gives a 20x20 maze with the standard character rig.

use glam::Vec3;
use mazewalk_common::Aabb;
use mazewalk_input::KeyBindings;
use mazewalk_maze::WallLayout;
use mazewalk_motion::{AnimationClip, ClipSet, MotionConfig, default_clips};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a scene config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    pub start_x: usize,
    pub start_y: usize,
    /// Fixed seed for a reproducible maze; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            start_x: 0,
            start_y: 0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub locked: bool,
    pub locked_max_distance: f32,
    pub unlocked_max_distance: f32,
    /// Zooming in stops once the max distance is at or below this.
    pub min_zoom_distance: f32,
    /// Look-at point height above the character's feet.
    pub target_height: f32,
    /// Camera offset from the character after a teleport.
    pub spawn_offset: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            locked: true,
            locked_max_distance: 5.0,
            unlocked_max_distance: 100.0,
            min_zoom_distance: 1.0,
            target_height: 1.0,
            spawn_offset: Vec3::new(3.0, 5.0, 3.0),
        }
    }
}

/// A named place the character can be teleported to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub name: String,
    pub position: Vec3,
    #[serde(default)]
    pub heading: f32,
}

/// Extra collidable box, optionally rotated about +Y (furniture, room walls).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropBox {
    pub center: Vec3,
    pub half_extents: Vec3,
    #[serde(default)]
    pub yaw: f32,
}

impl PropBox {
    pub fn bounds(&self) -> Aabb {
        Aabb::enclosing_rotated(self.center, self.half_extents, self.yaw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub maze: MazeConfig,
    pub layout: WallLayout,
    pub motion: MotionConfig,
    pub clips: Vec<AnimationClip>,
    pub clip_set: ClipSet,
    pub camera: CameraConfig,
    pub bindings: KeyBindings,
    /// Spawn points after the maze start room, in cycling order.
    pub spawns: Vec<SpawnPoint>,
    pub props: Vec<PropBox>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            maze: MazeConfig::default(),
            layout: WallLayout::default(),
            motion: MotionConfig::default(),
            clips: default_clips(),
            clip_set: ClipSet::default(),
            camera: CameraConfig::default(),
            bindings: KeyBindings::default(),
            spawns: Vec::new(),
            props: Vec::new(),
        }
    }
}

/// Side length of the furnished room next to the maze.
const ROOM_SIZE: f32 = 10.0;

impl SceneConfig {
    /// The maze plus the two side areas reachable with the spawn key: a
    /// walled room with a table and a figure, and an open stage.
    ///
    /// Model boxes are fixed stand-ins for the loaded meshes' bounds.
    pub fn experiment() -> Self {
        let room = Vec3::new(-1000.0, 0.0, -1000.0);
        let stage = Vec3::new(1000.0, 0.0, 1000.0);
        let half = ROOM_SIZE / 2.0;
        let wall = |dx: f32, dz: f32, yaw: f32| PropBox {
            center: room + Vec3::new(-dx, 2.0, -dz),
            half_extents: Vec3::new(half, 2.0, 0.05),
            yaw,
        };
        let quarter = -std::f32::consts::FRAC_PI_2;

        Self {
            spawns: vec![
                SpawnPoint {
                    name: "room".into(),
                    position: room,
                    heading: 0.0,
                },
                SpawnPoint {
                    name: "stage".into(),
                    position: stage,
                    heading: 0.0,
                },
            ],
            props: vec![
                wall(0.0, half, 0.0),
                wall(half, 0.0, quarter),
                wall(0.0, -half, 0.0),
                wall(-half, 0.0, quarter),
                // table
                PropBox {
                    center: Vec3::new(-1000.0, 0.4, -1003.0),
                    half_extents: Vec3::new(0.6, 0.4, 0.4),
                    yaw: 0.0,
                },
                // seated figure
                PropBox {
                    center: Vec3::new(-1002.0, 0.9, -1003.0),
                    half_extents: Vec3::new(0.25, 0.9, 0.25),
                    yaw: -quarter,
                },
                // dancer on the stage
                PropBox {
                    center: Vec3::new(1000.0, 0.9, 997.0),
                    half_extents: Vec3::new(0.4, 0.9, 0.4),
                    yaw: 0.0,
                },
            ],
            ..Self::default()
        }
    }

    /// Load from a `.yaml`/`.yml` or `.json` file and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        tracing::debug!(path = %path.display(), "scene config loaded");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // an empty document parses as unit, not as an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Cheap structural checks. Maze and clip errors are reported again, with
    /// more detail, when the scene is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.maze;
        if m.width == 0 || m.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "maze area must be positive, got {}x{}",
                m.width, m.height
            )));
        }
        if m.start_x >= m.width || m.start_y >= m.height {
            return Err(ConfigError::Invalid(format!(
                "maze start ({}, {}) outside {}x{} area",
                m.start_x, m.start_y, m.width, m.height
            )));
        }
        if !(self.layout.cell_size > 0.0 && self.layout.wall_height > 0.0) {
            return Err(ConfigError::Invalid(
                "wall layout needs positive cell size and wall height".into(),
            ));
        }
        let c = &self.camera;
        if !(c.min_zoom_distance > 0.0
            && c.locked_max_distance >= c.min_zoom_distance
            && c.unlocked_max_distance >= c.min_zoom_distance)
        {
            return Err(ConfigError::Invalid(
                "camera distances must be positive and above the zoom floor".into(),
            ));
        }
        self.motion
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}
