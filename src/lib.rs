//! Quiz Blocks: a falling-block puzzle gated by timed trivia questions.
//!
//! Clear lines to win, but every few locked pieces the game stops and
//! asks a multiple-choice question. A wrong answer or an expired
//! countdown ends the run on the spot.
//!
//! `core` holds the deterministic game logic, `input` the key mapping,
//! and `term` the crossterm-based renderer.

pub mod core;
pub mod input;
pub mod term;
pub mod types;
