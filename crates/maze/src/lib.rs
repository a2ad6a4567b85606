//! Maze generation: a `(2W+1) x (2H+1)` wall/passage grid carved by
//! randomized Prim's algorithm, and the mapping from wall cells to
//! collidable boxes.
//!
//! # Invariants
//! - A generated grid is a perfect maze: rooms form a spanning tree.
//! - Generation never returns a partial grid; bad dimensions fail up front.
//! - Same seed, same grid.

mod generator;
mod grid;
mod layout;

pub use generator::{MazeGenerator, generate_maze};
pub use grid::Grid;
pub use layout::WallLayout;

/// Errors from maze construction and parsing.
#[derive(Debug, thiserror::Error)]
pub enum MazeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub fn crate_info() -> &'static str {
    "mazewalk-maze v0.1.0"
}
