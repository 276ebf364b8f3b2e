//! Piece / shape engine: square shape matrices and matrix rotation.
//!
//! Every kind is stored as an N×N bounding matrix (padded with empty
//! cells), so the clockwise transform `out[c][N-1-r] = in[r][c]` is
//! geometrically valid for all of them. Matrix cells hold the kind's
//! material tag, the same value the grid stores on lock.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, BOARD_WIDTH};

/// Largest bounding matrix (the I piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// An N×N shape matrix under some number of quarter-turn rotations.
///
/// Only the top-left `size × size` block is meaningful; the rest of the
/// backing array stays zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    size: u8,
    cells: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Base (spawn) orientation for a piece kind.
    pub fn of(kind: PieceKind) -> Self {
        let tag = kind.material();
        let (size, rows): (u8, &[&[u8]]) = match kind {
            PieceKind::I => (4, &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]]),
            PieceKind::O => (2, &[&[1, 1], &[1, 1]]),
            PieceKind::S => (3, &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]),
            PieceKind::Z => (3, &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]),
            PieceKind::T => (3, &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]),
            PieceKind::L => (3, &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]]),
            PieceKind::J => (3, &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]]),
        };

        let mut cells = [[0u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v != 0 {
                    cells[r][c] = tag;
                }
            }
        }
        Self { size, cells }
    }

    /// Side length of the bounding matrix.
    pub fn size(&self) -> i8 {
        self.size as i8
    }

    /// Material tag at (row, col), 0 if empty. Out-of-matrix reads are 0.
    pub fn tag_at(&self, row: i8, col: i8) -> u8 {
        if row < 0 || col < 0 || row >= self.size() || col >= self.size() {
            return 0;
        }
        self.cells[row as usize][col as usize]
    }

    /// 90° clockwise rotation: `out[c][N-1-r] = in[r][c]`.
    ///
    /// Defined only because all shapes are square; four applications
    /// return the original matrix exactly.
    pub fn rotated_cw(&self) -> Self {
        let n = self.size as usize;
        let mut out = [[0u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for r in 0..n {
            for c in 0..n {
                out[c][n - 1 - r] = self.cells[r][c];
            }
        }
        Self {
            size: self.size,
            cells: out,
        }
    }

    /// Occupied cells as `(row, col, tag)` offsets, top-to-bottom then
    /// left-to-right. Zero-allocation; a shape never holds more than the
    /// matrix's worth of cells.
    pub fn occupied_cells(&self) -> ArrayVec<(i8, i8, u8), 16> {
        let mut out = ArrayVec::new();
        for r in 0..self.size() {
            for c in 0..self.size() {
                let tag = self.tag_at(r, c);
                if tag != 0 {
                    out.push((r, c, tag));
                }
            }
        }
        out
    }
}

/// The active falling piece: a kind, its current shape matrix, and the
/// matrix origin on the board. Owned by the board controller from spawn
/// until lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    /// Board column of the matrix's left edge (may be negative for
    /// left-padded matrices near the wall).
    pub x: i8,
    /// Board row of the matrix's top edge (0 at spawn).
    pub y: i8,
}

impl Piece {
    /// Spawn a piece centered at the top: column `cols/2 - size/2`, row 0.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = Shape::of(kind);
        let x = (BOARD_WIDTH as i8) / 2 - shape.size() / 2;
        Self {
            kind,
            shape,
            x,
            y: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shapes_are_square_and_tagged() {
        for kind in PieceKind::ALL {
            let shape = Shape::of(kind);
            let cells = shape.occupied_cells();
            assert_eq!(cells.len(), 4, "{:?} must have 4 cells", kind);
            for (r, c, tag) in cells {
                assert!(r < shape.size() && c < shape.size());
                assert_eq!(tag, kind.material());
            }
        }
    }

    #[test]
    fn test_rotation_four_times_is_identity() {
        for kind in PieceKind::ALL {
            let base = Shape::of(kind);
            let rotated = base
                .rotated_cw()
                .rotated_cw()
                .rotated_cw()
                .rotated_cw();
            assert_eq!(rotated, base, "{:?} did not round-trip", kind);
        }
    }

    #[test]
    fn test_rotation_moves_t_nub() {
        // T spawns with its nub up; one clockwise turn points it right.
        let t = Shape::of(PieceKind::T);
        assert_ne!(t.tag_at(0, 1), 0);
        let turned = t.rotated_cw();
        assert_ne!(turned.tag_at(1, 2), 0);
        assert_eq!(turned.tag_at(0, 1), t.tag_at(1, 0));
    }

    #[test]
    fn test_spawn_is_centered() {
        // 3-wide matrices spawn at column 4, the I piece (4-wide) at 3,
        // the O piece (2-wide) at 4.
        assert_eq!(Piece::spawn(PieceKind::T).x, 4);
        assert_eq!(Piece::spawn(PieceKind::I).x, 3);
        assert_eq!(Piece::spawn(PieceKind::O).x, 4);
        for kind in PieceKind::ALL {
            assert_eq!(Piece::spawn(kind).y, 0);
        }
    }

    #[test]
    fn test_tag_at_out_of_matrix_is_empty() {
        let o = Shape::of(PieceKind::O);
        assert_eq!(o.tag_at(-1, 0), 0);
        assert_eq!(o.tag_at(0, 2), 0);
        assert_eq!(o.tag_at(3, 3), 0);
    }
}
