//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the piece
//! kind that locked there. Uses a flat array for cache locality and
//! zero-allocation. Coordinates: (x, y) with x in 0..10 left to right and
//! y in 0..20 top to bottom. Pieces may temporarily extend above the top
//! (negative y) while spawning; those rows never count as occupied.

use crate::core::pieces::{Piece, Shape};
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH * BOARD_HEIGHT) as usize;

/// Result of committing a piece into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Locked,
    /// Part of the piece was still above the visible top row. Nothing was
    /// written: rows are processed top to bottom and negative rows come
    /// first, so the scan aborts before touching the grid.
    ToppedOut,
}

/// The game grid - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y). Returns None if out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether (x, y) holds locked material. Rows above the top are never
    /// occupied; everything out of bounds otherwise is not "occupied"
    /// either (collision handles bounds separately).
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Would this shape, placed with its matrix origin at (x, y), collide?
    ///
    /// An occupied shape cell collides when it maps out of horizontal
    /// bounds, to a row at or past the bottom, or onto locked material.
    /// Cells mapping above the top (negative row) never collide.
    pub fn collides(&self, x: i8, y: i8, shape: &Shape) -> bool {
        for (r, c, _) in shape.occupied_cells() {
            let px = x + c;
            let py = y + r;
            if px < 0 || px >= BOARD_WIDTH as i8 || py >= BOARD_HEIGHT as i8 {
                return true;
            }
            if py >= 0 && self.is_occupied(px, py) {
                return true;
            }
        }
        false
    }

    /// Commit a piece's occupied cells into the grid.
    ///
    /// Cells are written top to bottom; the first cell whose absolute row
    /// is negative aborts the scan and reports [`LockStatus::ToppedOut`]
    /// (game over supersedes any partial write concern).
    pub fn lock(&mut self, piece: &Piece) -> LockStatus {
        for (r, c, tag) in piece.shape.occupied_cells() {
            let py = piece.y + r;
            if py < 0 {
                return LockStatus::ToppedOut;
            }
            self.set(piece.x + c, py, crate::types::PieceKind::from_material(tag));
        }
        LockStatus::Locked
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Remove row `y`: rows above shift down one and an empty row appears
    /// at the top. Uses `copy_within` (handles the overlapping ranges).
    fn remove_row(&mut self, y: usize) {
        let width = BOARD_WIDTH as usize;
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            let dst_start = row * width;
            self.cells
                .copy_within(src_start..src_start + width, dst_start);
        }
        for cell in &mut self.cells[0..width] {
            *cell = None;
        }
    }

    /// Clear every full row, scanning bottom to top, and return the count.
    ///
    /// After a removal the same row index is re-checked, because the row
    /// above has shifted down into it; that is what cascades multiple
    /// non-adjacent full rows in one pass.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0u32;
        let mut y = BOARD_HEIGHT as usize;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.remove_row(row);
                cleared += 1;
                // Do not advance: re-check the same index.
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Create from a 2D vector for testing (converts to flat array)
    #[cfg(test)]
    pub fn from_cells(cells_2d: Vec<Vec<Cell>>) -> Self {
        assert_eq!(cells_2d.len(), BOARD_HEIGHT as usize);
        assert!(cells_2d.iter().all(|row| row.len() == BOARD_WIDTH as usize));

        let mut flat = [None; BOARD_SIZE];
        for (y, row) in cells_2d.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                flat[y * BOARD_WIDTH as usize + x] = *cell;
            }
        }
        Self { cells: flat }
    }

    /// Convert to 2D vector for testing/display
    #[cfg(test)]
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        let width = BOARD_WIDTH as usize;
        (0..BOARD_HEIGHT as usize)
            .map(|y| {
                let start = y * width;
                let end = start + width;
                self.cells[start..end].to_vec()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn fill_row(board: &mut Board, y: i8) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(PieceKind::I));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_collides_bounds() {
        let board = Board::new();
        let shape = Shape::of(PieceKind::O);

        // Inside: no collision.
        assert!(!board.collides(0, 0, &shape));
        // Past the left wall / right wall.
        assert!(board.collides(-1, 0, &shape));
        assert!(board.collides(BOARD_WIDTH as i8 - 1, 0, &shape));
        // At or past the bottom (O is 2 tall).
        assert!(board.collides(0, BOARD_HEIGHT as i8 - 1, &shape));
        assert!(!board.collides(0, BOARD_HEIGHT as i8 - 2, &shape));
    }

    #[test]
    fn test_collides_above_top_is_free() {
        let board = Board::new();
        let shape = Shape::of(PieceKind::O);
        // Fully above the visible field: never collides.
        assert!(!board.collides(4, -2, &shape));
    }

    #[test]
    fn test_collides_with_locked_material() {
        let mut board = Board::new();
        board.set(4, 10, Some(PieceKind::T));
        let shape = Shape::of(PieceKind::O);
        assert!(board.collides(4, 10, &shape));
        assert!(board.collides(3, 9, &shape));
        assert!(!board.collides(6, 10, &shape));
    }

    #[test]
    fn test_lock_writes_material_tags() {
        let mut board = Board::new();
        let mut piece = Piece::spawn(PieceKind::O);
        piece.y = 18;
        assert_eq!(board.lock(&piece), LockStatus::Locked);

        assert_eq!(board.get(piece.x, 18), Some(Some(PieceKind::O)));
        assert_eq!(board.get(piece.x + 1, 19), Some(Some(PieceKind::O)));
    }

    #[test]
    fn test_lock_above_top_signals_topping_out() {
        let mut board = Board::new();
        let mut piece = Piece::spawn(PieceKind::O);
        piece.y = -1;
        assert_eq!(board.lock(&piece), LockStatus::ToppedOut);
        // Abort-before-write: the grid is untouched.
        assert!(board.cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_clear_full_rows_none() {
        let mut board = Board::new();
        board.set(0, 19, Some(PieceKind::I));
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board.get(0, 19), Some(Some(PieceKind::I)));
    }

    #[test]
    fn test_clear_full_rows_cascades_non_adjacent() {
        let mut board = Board::new();
        // Full rows at 19 and 17, a marker row at 18 and another at 16.
        fill_row(&mut board, 19);
        fill_row(&mut board, 17);
        board.set(3, 18, Some(PieceKind::T));
        board.set(7, 16, Some(PieceKind::S));

        assert_eq!(board.clear_full_rows(), 2);

        // Non-full rows shift down by the number of cleared rows below
        // them, preserving relative order.
        assert_eq!(board.get(3, 19), Some(Some(PieceKind::T)));
        assert_eq!(board.get(7, 18), Some(Some(PieceKind::S)));
        // Top rows are empty again.
        assert!(!board.is_row_full(19));
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, 0), Some(None));
            assert_eq!(board.get(x, 1), Some(None));
        }
    }

    #[test]
    fn test_clear_full_rows_adjacent_pair() {
        let mut board = Board::new();
        fill_row(&mut board, 19);
        fill_row(&mut board, 18);
        board.set(2, 17, Some(PieceKind::J));

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.get(2, 19), Some(Some(PieceKind::J)));
        assert_eq!(board.get(2, 17), Some(None));
    }

    #[test]
    fn test_from_cells_roundtrip() {
        let mut cells_2d = vec![vec![None; 10]; 20];
        cells_2d[5][3] = Some(PieceKind::O);
        cells_2d[10][7] = Some(PieceKind::L);

        let board = Board::from_cells(cells_2d.clone());
        assert_eq!(board.to_cells(), cells_2d);
    }
}
