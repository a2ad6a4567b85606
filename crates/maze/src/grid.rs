use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::MazeError;

const WALL: char = '#';
const PASSAGE: char = ' ';

/// Wall/passage grid for a `width x height` room area.
///
/// The grid is `(2*width+1)` cells along x and `(2*height+1)` along y.
/// Rooms sit at odd coordinates `(2i+1, 2j+1)`; cells with exactly one odd
/// coordinate are connectors between two rooms; even/even cells are pillars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major over y, `true` = wall.
    cells: Vec<bool>,
}

impl Grid {
    /// All-wall grid for a `width x height` room area.
    pub fn filled(width: usize, height: usize) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidArgument(format!(
                "maze area must be positive, got {width}x{height}"
            )));
        }
        let side = |n: usize| n.checked_mul(2).and_then(|d| d.checked_add(1));
        let len = side(width)
            .zip(side(height))
            .and_then(|(cols, rows)| cols.checked_mul(rows))
            .ok_or_else(|| {
                MazeError::InvalidArgument(format!("maze area {width}x{height} is too large"))
            })?;
        Ok(Self {
            width,
            height,
            cells: vec![true; len],
        })
    }

    /// Rooms along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rooms along y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells along x (`2*width+1`).
    pub fn cols(&self) -> usize {
        2 * self.width + 1
    }

    /// Cells along y (`2*height+1`).
    pub fn rows(&self) -> usize {
        2 * self.height + 1
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.cols() && y < self.rows()).then(|| y * self.cols() + x)
    }

    /// Out-of-range coordinates read as wall.
    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.index(x, y).is_none_or(|i| self.cells[i])
    }

    pub fn set_wall(&mut self, x: usize, y: usize, wall: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = wall;
        }
    }

    /// Grid coordinates of room `(i, j)`.
    pub fn room_cell(i: usize, j: usize) -> (usize, usize) {
        (2 * i + 1, 2 * j + 1)
    }

    /// Every wall cell in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, wall)| **wall)
            .map(move |(i, _)| (i % cols, i / cols))
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|w| **w).count()
    }

    /// Interior connector cells that have been carved open.
    pub fn carved_passages(&self) -> usize {
        let mut n = 0;
        for y in 1..self.rows() - 1 {
            for x in 1..self.cols() - 1 {
                if (x % 2 == 1) != (y % 2 == 1) && !self.is_wall(x, y) {
                    n += 1;
                }
            }
        }
        n
    }

    /// True when every room is open, pillars and the border are intact, and
    /// the open connectors form a spanning tree over the rooms.
    pub fn is_perfect(&self) -> bool {
        let (cols, rows) = (self.cols(), self.rows());
        for y in 0..rows {
            for x in 0..cols {
                let border = x == 0 || y == 0 || x == cols - 1 || y == rows - 1;
                let room = x % 2 == 1 && y % 2 == 1;
                let pillar = x % 2 == 0 && y % 2 == 0;
                if room && self.is_wall(x, y) {
                    return false;
                }
                if (border || pillar) && !self.is_wall(x, y) {
                    return false;
                }
            }
        }

        let rooms = self.width * self.height;
        if self.carved_passages() != rooms - 1 {
            return false;
        }

        let mut seen = vec![false; rooms];
        let mut queue = VecDeque::from([(0usize, 0usize)]);
        seen[0] = true;
        let mut reached = 1;
        while let Some((i, j)) = queue.pop_front() {
            let (x, y) = Self::room_cell(i, j);
            let steps: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
            for (dx, dy) in steps {
                let ni = i as isize + dx;
                let nj = j as isize + dy;
                if ni < 0 || nj < 0 || ni as usize >= self.width || nj as usize >= self.height {
                    continue;
                }
                let (ni, nj) = (ni as usize, nj as usize);
                let connector = ((x as isize + dx) as usize, (y as isize + dy) as usize);
                if self.is_wall(connector.0, connector.1) || seen[nj * self.width + ni] {
                    continue;
                }
                seen[nj * self.width + ni] = true;
                reached += 1;
                queue.push_back((ni, nj));
            }
        }
        reached == rooms
    }

    /// One text line per row, `#` for wall and space for passage.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.cols() + 1) * self.rows());
        for y in 0..self.rows() {
            for x in 0..self.cols() {
                out.push(if self.is_wall(x, y) { WALL } else { PASSAGE });
            }
            out.push('\n');
        }
        out
    }

    /// Parse the ASCII form. Ragged rows are padded with wall; any character
    /// other than a space is wall. Both dimensions must be odd and at least 3.
    pub fn from_ascii(text: &str) -> Result<Self, MazeError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .collect();
        let rows = lines.len();
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if rows < 3 || cols < 3 || rows % 2 == 0 || cols % 2 == 0 {
            return Err(MazeError::InvalidArgument(format!(
                "ascii maze must have odd dimensions of at least 3, got {cols}x{rows}"
            )));
        }

        let mut grid = Self::filled((cols - 1) / 2, (rows - 1) / 2)?;
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                grid.set_wall(x, y, ch != PASSAGE);
            }
        }
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii())
    }
}
