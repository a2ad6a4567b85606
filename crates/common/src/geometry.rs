use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let h = half_extents.abs();
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// Tightest box around a box of `half_extents` rotated by `yaw` about +Y.
    pub fn enclosing_rotated(center: Vec3, half_extents: Vec3, yaw: f32) -> Self {
        let rot = Quat::from_rotation_y(yaw);
        let h = half_extents.abs();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    let corner = center + rot * Vec3::new(sx * h.x, sy * h.y, sz * h.z);
                    min = min.min(corner);
                    max = max.max(corner);
                }
            }
        }
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Sphere/box test via the closest point on the box. Touching counts.
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let closest = sphere.center.clamp(self.min, self.max);
        closest.distance_squared(sphere.center) <= sphere.radius * sphere.radius
    }
}

/// Bounding sphere used for the character's collision volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }
}

/// Anything the character can bump into.
pub trait Obstacles {
    fn blocks(&self, sphere: &BoundingSphere) -> bool;
}

impl Obstacles for [Aabb] {
    fn blocks(&self, sphere: &BoundingSphere) -> bool {
        self.iter().any(|b| b.intersects_sphere(sphere))
    }
}

/// Read-only collection of collidable boxes, one per wall or prop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleSet {
    boxes: Vec<Aabb>,
}

impl ObstacleSet {
    pub fn new(boxes: Vec<Aabb>) -> Self {
        Self { boxes }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    /// Index of the first box the sphere touches, if any.
    pub fn first_hit(&self, sphere: &BoundingSphere) -> Option<usize> {
        self.boxes.iter().position(|b| b.intersects_sphere(sphere))
    }

    /// Union of every box. `None` for an empty set.
    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.boxes.first()?;
        Some(self.boxes[1..].iter().fold(first, |acc, b| Aabb {
            min: acc.min.min(b.min),
            max: acc.max.max(b.max),
        }))
    }
}

impl Obstacles for ObstacleSet {
    fn blocks(&self, sphere: &BoundingSphere) -> bool {
        self.boxes.as_slice().blocks(sphere)
    }
}

impl FromIterator<Aabb> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Aabb>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
