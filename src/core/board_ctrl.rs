//! Board controller: one piece's descent from spawn to lock.
//!
//! Owns the grid, the active piece, and the one-ahead preview. Movement,
//! rotation with wall kicks, locking, row clearing, and scoring all live
//! here; deciding what happens *after* a lock (quiz gate, next spawn,
//! win/lose) is the session's job.

use crate::core::board::{Board, LockStatus};
use crate::core::pieces::Piece;
use crate::core::rng::SimpleRng;
use crate::types::{MoveDir, PieceKind, LINE_CLEAR_SCORE};

/// What a completed lock did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    /// Part of the piece was above the visible top (terminal loss).
    pub topped_out: bool,
    /// Rows cleared by this lock (0 when topped out).
    pub lines_cleared: u32,
}

/// Result of a single move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The candidate position was free and was committed.
    Moved,
    /// The candidate collided; the piece is unchanged. Steady-state for
    /// walls and failed rotations, not an error.
    Rejected,
    /// A blocked downward move: the piece locked at its current position,
    /// full rows were cleared, and the active piece is gone.
    Locked(LockReport),
}

/// Orchestrates the active piece over the grid.
#[derive(Debug, Clone)]
pub struct BoardController {
    board: Board,
    current: Option<Piece>,
    next: PieceKind,
    rng: SimpleRng,
    score: u32,
    lines: u32,
}

impl BoardController {
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = draw_kind(&mut rng);
        Self {
            board: Board::new(),
            current: None,
            next,
            rng,
            score: 0,
            lines: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    /// The pre-generated piece shown as a preview; becomes `current` at
    /// the next spawn.
    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Cumulative lines cleared this run.
    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// RNG state, used to reseed a fresh run without repeating sequences.
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Promote the preview to the active piece and draw a fresh preview.
    pub fn spawn_next(&mut self) {
        self.current = Some(Piece::spawn(self.next));
        self.next = draw_kind(&mut self.rng);
    }

    /// Attempt one move. Blocked left/right/rotate attempts are silently
    /// rejected; a blocked down move takes the lock path.
    pub fn try_move(&mut self, dir: MoveDir) -> MoveOutcome {
        let Some(piece) = self.current else {
            return MoveOutcome::Rejected;
        };

        let mut candidate = piece;
        match dir {
            MoveDir::Left => candidate.x -= 1,
            MoveDir::Right => candidate.x += 1,
            MoveDir::Down => candidate.y += 1,
            MoveDir::Rotate => {
                let rotated = piece.shape.rotated_cw();
                // Wall kicks: current column, then one left, then one
                // right. No vertical kicks, nothing past ±1.
                let mut placed = false;
                for dx in [0i8, -1, 1] {
                    if !self.board.collides(piece.x + dx, piece.y, &rotated) {
                        candidate.x = piece.x + dx;
                        candidate.shape = rotated;
                        placed = true;
                        break;
                    }
                }
                if !placed {
                    // All three kick positions collide: keep the prior
                    // orientation.
                    return MoveOutcome::Rejected;
                }
                self.current = Some(candidate);
                return MoveOutcome::Moved;
            }
        }

        if !self.board.collides(candidate.x, candidate.y, &candidate.shape) {
            self.current = Some(candidate);
            return MoveOutcome::Moved;
        }

        if dir == MoveDir::Down {
            return MoveOutcome::Locked(self.lock_current(&piece));
        }

        MoveOutcome::Rejected
    }

    /// Drop straight down: translate one row at a time while free,
    /// awarding 1 point per descended row, then take the standard
    /// down-move lock path (avoids a second locking code path).
    pub fn hard_drop(&mut self) -> MoveOutcome {
        let Some(mut piece) = self.current else {
            return MoveOutcome::Rejected;
        };

        while !self.board.collides(piece.x, piece.y + 1, &piece.shape) {
            piece.y += 1;
            self.score += 1;
        }
        self.current = Some(piece);

        self.try_move(MoveDir::Down)
    }

    /// Lowest row the active piece could occupy at its current column and
    /// orientation (the "ghost" landing projection). Pure query.
    pub fn ghost_y(&self) -> Option<i8> {
        let piece = self.current.as_ref()?;
        let mut y = piece.y;
        while !self.board.collides(piece.x, y + 1, &piece.shape) {
            y += 1;
        }
        Some(y)
    }

    /// Lock `piece` at its (uncommitted) position, clear full rows, and
    /// score the batch. Synchronous and atomic with respect to any other
    /// board mutation.
    fn lock_current(&mut self, piece: &Piece) -> LockReport {
        self.current = None;

        if self.board.lock(piece) == LockStatus::ToppedOut {
            return LockReport {
                topped_out: true,
                lines_cleared: 0,
            };
        }

        let lines_cleared = self.board.clear_full_rows();
        if lines_cleared > 0 {
            self.lines += lines_cleared;
            self.score += LINE_CLEAR_SCORE * lines_cleared;
        }

        LockReport {
            topped_out: false,
            lines_cleared,
        }
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub fn set_current(&mut self, piece: Piece) {
        self.current = Some(piece);
    }
}

/// Uniform draw per spawn, with replacement. No bag; streaks and droughts
/// can happen.
fn draw_kind(rng: &mut SimpleRng) -> PieceKind {
    PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize]
}
