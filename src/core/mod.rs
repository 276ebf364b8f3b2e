//! Core game logic: board, pieces, quiz gate, clocks, and the session
//! state machine. Everything here is deterministic and I/O-free; the
//! terminal layer sits on top.

pub mod board;
pub mod board_ctrl;
pub mod clock;
pub mod pieces;
pub mod quiz;
pub mod rng;
pub mod session;

pub use board::Board;
pub use board_ctrl::{BoardController, LockReport, MoveOutcome};
pub use clock::SessionClock;
pub use pieces::{Piece, Shape};
pub use quiz::{Question, QuestionBank, QuizGate, Verdict};
pub use rng::SimpleRng;
pub use session::GameSession;
