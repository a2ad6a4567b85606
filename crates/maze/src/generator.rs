use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Grid, MazeError};

const STEPS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Randomized Prim's maze generator.
///
/// Owns its random source so repeated calls on a seeded generator produce a
/// reproducible sequence of mazes.
pub struct MazeGenerator<R: Rng = StdRng> {
    rng: R,
    seed: Option<u64>,
}

impl MazeGenerator<StdRng> {
    /// Deterministic generator: the same seed yields the same grids.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }
}

impl<R: Rng> MazeGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng, seed: None }
    }

    /// Seed this generator was built from, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Carve a perfect maze over a `width x height` room area, rooted at
    /// room `(start_x, start_y)`.
    pub fn generate(
        &mut self,
        width: usize,
        height: usize,
        start_x: usize,
        start_y: usize,
    ) -> Result<Grid, MazeError> {
        let _span = tracing::debug_span!("generate_maze", width, height, seed = ?self.seed).entered();
        generate_maze(width, height, start_x, start_y, &mut self.rng)
    }
}

/// Randomized Prim's over the room grid using the caller's random source.
///
/// The frontier holds connector cells next to carved rooms. Entries can go
/// stale or repeat; each popped connector is re-checked and only carved when
/// exactly one of the two rooms it separates is still wall.
pub fn generate_maze<R: Rng>(
    width: usize,
    height: usize,
    start_x: usize,
    start_y: usize,
    rng: &mut R,
) -> Result<Grid, MazeError> {
    let mut grid = Grid::filled(width, height)?;
    if start_x >= width || start_y >= height {
        return Err(MazeError::InvalidArgument(format!(
            "start room ({start_x}, {start_y}) outside {width}x{height} area"
        )));
    }

    let mut frontier: Vec<(usize, usize)> = Vec::new();
    let mut high_water = 0;
    let (sx, sy) = Grid::room_cell(start_x, start_y);
    carve_room(&mut grid, sx, sy, &mut frontier);

    while !frontier.is_empty() {
        high_water = high_water.max(frontier.len());
        let (cx, cy) = frontier.swap_remove(rng.gen_range(0..frontier.len()));
        let (a, b) = separated_rooms(cx, cy);
        if grid.is_wall(a.0, a.1) != grid.is_wall(b.0, b.1) {
            grid.set_wall(cx, cy, false);
            let fresh = if grid.is_wall(a.0, a.1) { a } else { b };
            carve_room(&mut grid, fresh.0, fresh.1, &mut frontier);
        }
    }

    tracing::debug!(
        cols = grid.cols(),
        rows = grid.rows(),
        frontier_high_water = high_water,
        "maze generated"
    );
    Ok(grid)
}

/// Open a room cell and queue the connectors toward each in-bounds neighbour room.
fn carve_room(grid: &mut Grid, x: usize, y: usize, frontier: &mut Vec<(usize, usize)>) {
    grid.set_wall(x, y, false);
    let (max_x, max_y) = (grid.cols() as isize - 1, grid.rows() as isize - 1);
    for (dx, dy) in STEPS {
        let nx = x as isize + 2 * dx;
        let ny = y as isize + 2 * dy;
        if 0 < nx && nx < max_x && 0 < ny && ny < max_y {
            frontier.push(((x as isize + dx) as usize, (y as isize + dy) as usize));
        }
    }
}

/// The two rooms on either side of a connector cell.
fn separated_rooms(x: usize, y: usize) -> ((usize, usize), (usize, usize)) {
    if x % 2 == 0 {
        ((x - 1, y), (x + 1, y))
    } else {
        ((x, y - 1), (x, y + 1))
    }
}
