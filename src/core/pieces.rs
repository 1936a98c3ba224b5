//! Tetracube catalog and the piece value type

use arrayvec::ArrayVec;

use crate::types::PieceKind;

pub type Cube = [i32; 3];

/// A falling piece. Rotation centers are stored at TWICE their real value,
/// so half-integer centers and quarter turns stay in exact integer
/// arithmetic; cube coordinates are plain cells. Every center keeps all
/// three components at the same parity, which makes the halving in the
/// rotation step exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub cubes: [Cube; 4],
    pub centers: ArrayVec<[i32; 3], 2>,
}

impl Piece {
    /// Catalog spawn state: cubes above the visible grid, centered laterally.
    pub fn spawn(kind: PieceKind) -> Self {
        let (cubes, centers): ([Cube; 4], &[[i32; 3]]) = match kind {
            PieceKind::I => (
                [[0, 1, -4], [1, 1, -4], [2, 1, -4], [3, 1, -4]],
                &[[2, 2, -8], [4, 2, -8]],
            ),
            PieceKind::O => (
                [[1, 1, -4], [1, 2, -4], [2, 1, -4], [2, 2, -4]],
                &[[3, 3, -7], [3, 3, -9]],
            ),
            PieceKind::L => (
                [[1, 1, -3], [1, 1, -4], [1, 1, -5], [2, 1, -5]],
                &[[2, 2, -8]],
            ),
            PieceKind::Z => (
                [[1, 1, -3], [1, 1, -4], [2, 1, -4], [2, 1, -5]],
                &[[2, 2, -8], [4, 2, -8]],
            ),
            PieceKind::T => (
                [[1, 1, -3], [1, 1, -4], [2, 1, -4], [1, 1, -5]],
                &[[2, 2, -8]],
            ),
            PieceKind::Y => (
                [[1, 1, -3], [1, 2, -3], [1, 2, -4], [2, 2, -3]],
                &[[3, 3, -7]],
            ),
            PieceKind::ChiralA => (
                [[2, 1, -3], [1, 2, -3], [1, 2, -4], [2, 2, -3]],
                &[[3, 3, -7]],
            ),
            PieceKind::ChiralB => (
                [[1, 1, -3], [1, 2, -3], [2, 2, -4], [2, 2, -3]],
                &[[3, 3, -7]],
            ),
        };
        Piece {
            kind,
            cubes,
            centers: centers.iter().copied().collect(),
        }
    }

    pub fn translate(&mut self, dx: i32, dy: i32, dz: i32) {
        for cube in &mut self.cubes {
            cube[0] += dx;
            cube[1] += dy;
            cube[2] += dz;
        }
        for center in &mut self.centers {
            center[0] += 2 * dx;
            center[1] += 2 * dy;
            center[2] += 2 * dz;
        }
    }

    /// Primary center depth, doubled scale.
    pub fn center_depth(&self) -> i32 {
        self.centers[0][2]
    }

    pub fn contains_cube(&self, cube: Cube) -> bool {
        self.cubes.contains(&cube)
    }

    /// Bounding extent (max - min + 1) along each axis.
    pub fn extents(&self) -> [i32; 3] {
        let mut out = [0; 3];
        for (axis, e) in out.iter_mut().enumerate() {
            let min = self.cubes.iter().map(|c| c[axis]).min().unwrap_or(0);
            let max = self.cubes.iter().map(|c| c[axis]).max().unwrap_or(0);
            *e = max - min + 1;
        }
        out
    }
}
