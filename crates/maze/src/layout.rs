use glam::Vec3;
use mazewalk_common::{Aabb, ObstacleSet};
use serde::{Deserialize, Serialize};

use crate::Grid;

/// Placement of grid cells in world space.
///
/// Cell `(x, y)` maps to world `(origin.x + x*cell_size, _, origin.z + y*cell_size)`.
/// Without an explicit origin the grid is offset by `(-width, 0, -height)`
/// cells so that a square maze sits roughly centred on the world origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallLayout {
    pub cell_size: f32,
    pub wall_height: f32,
    pub origin: Option<Vec3>,
}

impl Default for WallLayout {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            wall_height: 1.0,
            origin: None,
        }
    }
}

impl WallLayout {
    pub fn origin_for(&self, grid: &Grid) -> Vec3 {
        self.origin.unwrap_or_else(|| {
            Vec3::new(
                -(grid.width() as f32) * self.cell_size,
                0.0,
                -(grid.height() as f32) * self.cell_size,
            )
        })
    }

    /// Floor-level centre of cell `(x, y)`.
    pub fn cell_center(&self, grid: &Grid, x: usize, y: usize) -> Vec3 {
        let o = self.origin_for(grid);
        Vec3::new(
            o.x + x as f32 * self.cell_size,
            o.y,
            o.z + y as f32 * self.cell_size,
        )
    }

    /// Floor-level centre of room `(i, j)`.
    pub fn room_center(&self, grid: &Grid, i: usize, j: usize) -> Vec3 {
        let (x, y) = Grid::room_cell(i, j);
        self.cell_center(grid, x, y)
    }

    /// Box occupied by the wall block at cell `(x, y)`.
    pub fn wall_box(&self, grid: &Grid, x: usize, y: usize) -> Aabb {
        let half = Vec3::new(self.cell_size, self.wall_height, self.cell_size) * 0.5;
        let floor = self.cell_center(grid, x, y);
        Aabb::from_center_half_extents(floor + Vec3::new(0.0, half.y, 0.0), half)
    }

    /// One box per wall cell, row-major.
    pub fn obstacles(&self, grid: &Grid) -> ObstacleSet {
        grid.walls().map(|(x, y)| self.wall_box(grid, x, y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MazeGenerator;
    use mazewalk_common::{BoundingSphere, Obstacles};

    #[test]
    fn default_origin_matches_centred_plane() {
        let grid = Grid::filled(20, 20).unwrap();
        let layout = WallLayout::default();
        // room (0,0) lands at (1 - 20, 0, 1 - 20)
        assert_eq!(layout.room_center(&grid, 0, 0), Vec3::new(-19.0, 0.0, -19.0));
    }

    #[test]
    fn wall_box_is_unit_cube_on_floor() {
        let grid = Grid::filled(2, 2).unwrap();
        let layout = WallLayout::default();
        let b = layout.wall_box(&grid, 0, 0);
        assert_eq!(b.center(), Vec3::new(-2.0, 0.5, -2.0));
        assert_eq!(b.size(), Vec3::ONE);
    }

    #[test]
    fn explicit_origin_and_cell_size() {
        let grid = Grid::filled(3, 3).unwrap();
        let layout = WallLayout {
            cell_size: 2.0,
            wall_height: 3.0,
            origin: Some(Vec3::new(10.0, 0.0, 0.0)),
        };
        assert_eq!(layout.cell_center(&grid, 1, 2), Vec3::new(12.0, 0.0, 4.0));
        let b = layout.wall_box(&grid, 0, 0);
        assert_eq!(b.min, Vec3::new(9.0, 0.0, -1.0));
        assert_eq!(b.max, Vec3::new(11.0, 3.0, 1.0));
    }

    #[test]
    fn one_obstacle_per_wall() {
        let grid = MazeGenerator::seeded(11).generate(6, 4, 0, 0).unwrap();
        let obstacles = WallLayout::default().obstacles(&grid);
        assert_eq!(obstacles.len(), grid.wall_count());
    }

    #[test]
    fn room_centre_is_clear_for_small_sphere() {
        let grid = MazeGenerator::seeded(11).generate(6, 4, 0, 0).unwrap();
        let layout = WallLayout::default();
        let obstacles = layout.obstacles(&grid);
        for i in 0..grid.width() {
            for j in 0..grid.height() {
                let sphere = BoundingSphere::new(layout.room_center(&grid, i, j), 0.2);
                assert!(!obstacles.blocks(&sphere), "room ({i}, {j}) blocked");
            }
        }
    }

    #[test]
    fn layout_deserializes_with_defaults() {
        let layout: WallLayout = serde_json::from_str(r#"{"cell_size": 2.0}"#).unwrap();
        assert_eq!(layout.cell_size, 2.0);
        assert_eq!(layout.wall_height, 1.0);
        assert!(layout.origin.is_none());
    }
}
