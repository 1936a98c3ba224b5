//! 3D occupancy grid: flat array, z-major so horizontal planes are contiguous

use crate::types::{Cell, PieceKind, GRID_CELLS, GRID_DEPTH, GRID_HEIGHT, GRID_WIDTH, LAYER_CELLS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [Cell; GRID_CELLS],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            cells: [Cell::Empty; GRID_CELLS],
        }
    }

    /// Flat index for in-bounds coordinates.
    fn index(x: i32, y: i32, z: i32) -> Option<usize> {
        if x < 0 || x >= GRID_WIDTH as i32 {
            return None;
        }
        if y < 0 || y >= GRID_DEPTH as i32 {
            return None;
        }
        if z < 0 || z >= GRID_HEIGHT as i32 {
            return None;
        }
        Some(z as usize * LAYER_CELLS + y as usize * GRID_WIDTH + x as usize)
    }

    pub fn cell(&self, x: i32, y: i32, z: i32) -> Option<Cell> {
        Self::index(x, y, z).map(|i| self.cells[i])
    }

    pub fn set_cell(&mut self, x: i32, y: i32, z: i32, cell: Cell) {
        if let Some(i) = Self::index(x, y, z) {
            self.cells[i] = cell;
        }
    }

    pub fn lock_cube(&mut self, x: i32, y: i32, z: i32, kind: PieceKind) {
        self.set_cell(x, y, z, Cell::Filled(kind));
    }

    /// Whether a piece cube may not occupy this position. Inside the grid
    /// only Filled cells block. Outside, everything blocks except positions
    /// above the grid that are laterally in bounds.
    pub fn blocked(&self, x: i32, y: i32, z: i32) -> bool {
        match Self::index(x, y, z) {
            Some(i) => self.cells[i].is_filled(),
            None => {
                !(x >= 0
                    && x < GRID_WIDTH as i32
                    && y >= 0
                    && y < GRID_DEPTH as i32
                    && z < GRID_HEIGHT as i32)
            }
        }
    }

    /// Remove every horizontal plane whose cells are all Filled, shifting the
    /// planes above it down one step. Returns the number of planes removed.
    pub fn clear_full_planes(&mut self) -> usize {
        let mut cleared = 0;
        for z in 0..GRID_HEIGHT {
            let start = z * LAYER_CELLS;
            if self.cells[start..start + LAYER_CELLS]
                .iter()
                .all(|c| c.is_filled())
            {
                cleared += 1;
                for zz in (1..=z).rev() {
                    let src = (zz - 1) * LAYER_CELLS;
                    self.cells.copy_within(src..src + LAYER_CELLS, zz * LAYER_CELLS);
                }
                for c in &mut self.cells[..LAYER_CELLS] {
                    *c = Cell::Empty;
                }
            }
        }
        cleared
    }

    /// Mark pockets no piece can reach and return how many cells currently
    /// qualify. Marks are permanent; the count is recomputed each call.
    ///
    /// For each of the four horizontal viewing directions, each (layer,
    /// lateral column) gets a visible depth: the open run from the face
    /// inward up to the first Filled cell. Rows are then widened bottom
    /// first, the deepest row updated before the ones above it, so open
    /// space above a pocket extends reach downward one cell per layer
    /// without chaining across several rows in a single pass. A non-Filled
    /// cell below the topmost layer is secluded when at least three
    /// directions cannot see that far in.
    pub fn compute_secluded_spaces(&mut self) -> u32 {
        let mut depths = [[[0i32; GRID_WIDTH]; GRID_HEIGHT]; 4];
        for (rot, plane) in depths.iter_mut().enumerate() {
            let lateral = if rot % 2 == 1 { GRID_DEPTH } else { GRID_WIDTH };
            let inward = if rot % 2 == 1 { GRID_WIDTH } else { GRID_DEPTH };
            for z in 0..GRID_HEIGHT {
                for a in 0..lateral {
                    let mut depth = 0;
                    for b in 0..inward {
                        let (x, y) = face_cell(rot, a as i32, b as i32);
                        match self.cell(x, y, z as i32) {
                            Some(c) if !c.is_filled() => depth += 1,
                            _ => break,
                        }
                    }
                    plane[z][a] = depth;
                }
            }
            for z in 0..GRID_HEIGHT - 1 {
                let lower = GRID_HEIGHT - z - 1;
                for a in 0..lateral {
                    if plane[lower][a] < plane[lower - 1][a] {
                        plane[lower][a] = plane[lower - 1][a] - 1;
                    }
                }
            }
        }

        let mut count = 0;
        for z in 1..GRID_HEIGHT as i32 {
            for y in 0..GRID_DEPTH as i32 {
                for x in 0..GRID_WIDTH as i32 {
                    if self.cell(x, y, z).is_some_and(|c| c.is_filled()) {
                        continue;
                    }
                    let face_distances = [y, x, GRID_DEPTH as i32 - 1 - y, GRID_WIDTH as i32 - 1 - x];
                    let mut hidden_dirs = 0;
                    for (dir, &dist) in face_distances.iter().enumerate() {
                        let lateral = if dir % 2 == 1 { y } else { x };
                        if depths[dir][z as usize][lateral as usize] < dist {
                            hidden_dirs += 1;
                        }
                    }
                    if hidden_dirs >= 3 {
                        self.set_cell(x, y, z, Cell::Secluded);
                        count += 1;
                    }
                }
            }
        }
        count
    }

    #[cfg(test)]
    pub fn fill_plane(&mut self, z: i32, kind: PieceKind) {
        for y in 0..GRID_DEPTH as i32 {
            for x in 0..GRID_WIDTH as i32 {
                self.lock_cube(x, y, z, kind);
            }
        }
    }

    #[cfg(test)]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_filled()).count()
    }
}

/// Cell scanned at lateral position `a`, `b` steps in from the face of
/// viewing direction `rot`. Shared with the terminal view, which draws the
/// grid from the same four directions.
pub fn face_cell(rot: usize, a: i32, b: i32) -> (i32, i32) {
    match rot {
        0 => (a, b),
        1 => (b, a),
        2 => (a, GRID_DEPTH as i32 - 1 - b),
        _ => (GRID_WIDTH as i32 - 1 - b, a),
    }
}
