//! Game session: the top-level state machine.
//!
//! Composes the board controller, the quiz gate, and the session clock,
//! and mediates every transition between them — the controller and the
//! gate never call each other. All three timers are plain counters owned
//! here and advanced only by [`GameSession::tick`] in the phase that owns
//! them: gravity accumulates only while `Dropping`, the question
//! countdown only while `AwaitingAnswer`, and the session clock across
//! both once armed. Leaving a phase therefore halts that phase's timer by
//! construction; there is no handle to forget to cancel.

use crate::core::board::Board;
use crate::core::board_ctrl::{BoardController, LockReport, MoveOutcome};
use crate::core::pieces::Piece;
use crate::core::quiz::{Question, QuestionBank, QuizGate, Verdict};
use crate::core::clock::SessionClock;
use crate::types::{
    Command, LossReason, MoveDir, Outcome, PieceKind, RunPhase, DROP_INTERVAL_MS, LINES_TO_WIN,
};

#[derive(Debug, Clone)]
pub struct GameSession {
    phase: RunPhase,
    board: BoardController,
    quiz: QuizGate,
    clock: SessionClock,
    /// Gravity accumulator; meaningful only while `Dropping`.
    drop_timer_ms: u32,
    lines_to_win: u32,
    outcome: Option<Outcome>,
}

impl GameSession {
    pub fn new(bank: QuestionBank, seed: u32) -> Self {
        Self::with_lines_to_win(bank, seed, LINES_TO_WIN)
    }

    /// Variant constructor for the 3-line ruleset and for tests.
    pub fn with_lines_to_win(bank: QuestionBank, seed: u32, lines_to_win: u32) -> Self {
        Self {
            phase: RunPhase::NotStarted,
            board: BoardController::new(seed),
            quiz: QuizGate::new(bank, seed.wrapping_add(1)),
            clock: SessionClock::new(),
            drop_timer_ms: 0,
            lines_to_win,
            outcome: None,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn lines(&self) -> u32 {
        self.board.lines()
    }

    pub fn lines_to_win(&self) -> u32 {
        self.lines_to_win
    }

    /// Set once, when a terminal phase is entered.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn grid(&self) -> &Board {
        self.board.board()
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.board.current()
    }

    pub fn next_kind(&self) -> PieceKind {
        self.board.next_kind()
    }

    /// Ghost landing projection for the active piece (render sink).
    pub fn ghost_y(&self) -> Option<i8> {
        self.board.ghost_y()
    }

    /// The open question while `AwaitingAnswer`.
    pub fn question(&self) -> Option<&Question> {
        self.quiz.question()
    }

    /// Remaining question time as a fraction (progress-bar rendering).
    pub fn question_fraction(&self) -> f32 {
        self.quiz.time_fraction()
    }

    pub fn session_secs_remaining(&self) -> u32 {
        self.clock.secs_remaining()
    }

    pub fn session_clock_running(&self) -> bool {
        self.clock.running()
    }

    /// Apply a player command. Commands outside their phase are no-ops.
    pub fn apply(&mut self, command: Command) {
        match (self.phase, command) {
            (RunPhase::NotStarted, Command::Start) => {
                // First quiz is shown immediately; no piece in play yet.
                self.phase = RunPhase::AwaitingAnswer;
                self.quiz.open();
            }
            (RunPhase::Dropping, Command::Move(dir)) => {
                if let MoveOutcome::Locked(report) = self.board.try_move(dir) {
                    self.after_lock(report);
                }
            }
            (RunPhase::Dropping, Command::HardDrop) => {
                if let MoveOutcome::Locked(report) = self.board.hard_drop() {
                    self.after_lock(report);
                }
            }
            (RunPhase::AwaitingAnswer, Command::Answer(selected)) => {
                match self.quiz.evaluate(selected) {
                    Verdict::Correct => {
                        // The overall clock starts on the first correct
                        // answer and never pauses afterwards.
                        self.clock.ensure_started();
                        self.enter_dropping();
                    }
                    Verdict::Incorrect => self.lose(LossReason::WrongAnswer),
                }
            }
            (RunPhase::Won | RunPhase::Lost, Command::Reset) => self.reset(),
            _ => {}
        }
    }

    /// Advance all clocks by one fixed timestep.
    pub fn tick(&mut self, elapsed_ms: u32) {
        if !matches!(self.phase, RunPhase::Dropping | RunPhase::AwaitingAnswer) {
            return;
        }

        // The session clock burns through quizzes too, and pre-empts
        // whatever else this tick would have done.
        if self.clock.tick(elapsed_ms) {
            self.lose(LossReason::TimeExpired);
            return;
        }

        match self.phase {
            RunPhase::Dropping => {
                self.drop_timer_ms += elapsed_ms;
                if self.drop_timer_ms >= DROP_INTERVAL_MS {
                    self.drop_timer_ms = 0;
                    if let MoveOutcome::Locked(report) = self.board.try_move(MoveDir::Down) {
                        self.after_lock(report);
                    }
                }
            }
            RunPhase::AwaitingAnswer => {
                if self.quiz.tick(elapsed_ms) {
                    self.quiz.close();
                    self.lose(LossReason::AnswerTimeout);
                }
            }
            _ => unreachable!(),
        }
    }

    /// The per-lock turn decision: loss, win, quiz gate, or next piece.
    fn after_lock(&mut self, report: LockReport) {
        if report.topped_out {
            self.lose(LossReason::ToppedOut);
            return;
        }
        if self.board.lines() >= self.lines_to_win {
            self.win();
            return;
        }
        if self.quiz.note_lock() {
            self.phase = RunPhase::AwaitingAnswer;
            self.drop_timer_ms = 0;
            self.quiz.open();
        } else {
            // Threshold not reached: the next piece spawns immediately.
            self.board.spawn_next();
        }
    }

    fn enter_dropping(&mut self) {
        self.phase = RunPhase::Dropping;
        self.drop_timer_ms = 0;
        if self.board.current().is_none() {
            self.board.spawn_next();
        }
    }

    fn win(&mut self) {
        self.phase = RunPhase::Won;
        self.outcome = Some(Outcome::Won {
            score: self.board.score(),
            lines: self.board.lines(),
        });
    }

    fn lose(&mut self, reason: LossReason) {
        self.phase = RunPhase::Lost;
        self.quiz.close();
        self.outcome = Some(Outcome::Lost {
            score: self.board.score(),
            reason,
        });
    }

    /// Back to `NotStarted` with a fresh board, clock, and cadence. The
    /// piece RNG continues from its live state so reruns do not repeat
    /// the same sequence.
    fn reset(&mut self) {
        let reseed = self.board.rng_state();
        self.board = BoardController::new(reseed);
        self.quiz.reset();
        self.clock.reset();
        self.drop_timer_ms = 0;
        self.outcome = None;
        self.phase = RunPhase::NotStarted;
    }

    #[cfg(test)]
    pub(crate) fn board_ctrl_mut(&mut self) -> &mut BoardController {
        &mut self.board
    }
}
