//! Core types shared across the application.
//! Pure data with no external dependencies.

/// Board dimensions (cells).
pub const BOARD_WIDTH: u8 = 10;
pub const BOARD_HEIGHT: u8 = 20;

/// Fixed timestep interval (milliseconds).
pub const TICK_MS: u32 = 16;

/// Gravity: one row of descent per interval while a piece is in play.
pub const DROP_INTERVAL_MS: u32 = 500;

/// Cumulative line clears that end the run as a win.
pub const LINES_TO_WIN: u32 = 5;

/// Points per cleared row in a single lock (not progressively weighted).
pub const LINE_CLEAR_SCORE: u32 = 100;

/// Overall session time budget (seconds). The clock starts on the first
/// correct quiz answer, not at game start.
pub const SESSION_TIME_LIMIT_SECS: u32 = 600;

/// Per-question countdown (milliseconds).
pub const QUESTION_TIME_LIMIT_MS: u32 = 10_000;

/// Quiz cadence bounds: the gate fires after this many piece locks,
/// redrawn uniformly in `[QUIZ_GAP_MIN, QUIZ_GAP_MAX]` after each quiz.
pub const QUIZ_GAP_MIN: u32 = 3;
pub const QUIZ_GAP_MAX: u32 = 4;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    S,
    Z,
    T,
    L,
    J,
}

impl PieceKind {
    /// All kinds, in material-tag order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
    ];

    /// Material tag written into the grid when this kind locks (1-based;
    /// 0 means empty).
    pub fn material(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::T => 5,
            PieceKind::L => 6,
            PieceKind::J => 7,
        }
    }

    /// Inverse of [`material`](Self::material).
    pub fn from_material(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::S),
            4 => Some(PieceKind::Z),
            5 => Some(PieceKind::T),
            6 => Some(PieceKind::L),
            7 => Some(PieceKind::J),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::T => "T",
            PieceKind::L => "L",
            PieceKind::J => "J",
        }
    }
}

/// Cell on the board (None = empty, Some = filled with piece kind)
pub type Cell = Option<PieceKind>;

/// Directional commands for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDir {
    Left,
    Right,
    Down,
    Rotate,
}

/// Commands a session accepts. Each is valid only in specific phases;
/// out-of-phase commands are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin a run from `NotStarted` (shows the first quiz).
    Start,
    /// Steer the active piece while `Dropping`.
    Move(MoveDir),
    /// Drop the active piece to its landing row and lock it.
    HardDrop,
    /// Answer the open question (0-based option index) while `AwaitingAnswer`.
    Answer(usize),
    /// Return from a terminal phase to `NotStarted`.
    Reset,
}

/// The authoritative run state machine.
///
/// `NotStarted → AwaitingAnswer ⇄ Dropping → {Won | Lost}`, with `Reset`
/// returning from the terminal states to `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    NotStarted,
    Dropping,
    AwaitingAnswer,
    Won,
    Lost,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Won | RunPhase::Lost)
    }
}

/// Why a run ended as a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossReason {
    WrongAnswer,
    AnswerTimeout,
    ToppedOut,
    TimeExpired,
}

impl LossReason {
    /// Player-facing message for the game-over overlay.
    pub fn message(&self) -> &'static str {
        match self {
            LossReason::WrongAnswer => "Incorrect answer!",
            LossReason::AnswerTimeout => "You ran out of time!",
            LossReason::ToppedOut => "The blocks reached the top!",
            LossReason::TimeExpired => "Time's up!",
        }
    }
}

/// Emitted once per run when a terminal phase is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won { score: u32, lines: u32 },
    Lost { score: u32, reason: LossReason },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_tags_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_material(kind.material()), Some(kind));
        }
        assert_eq!(PieceKind::from_material(0), None);
        assert_eq!(PieceKind::from_material(8), None);
    }

    #[test]
    fn terminal_phases() {
        assert!(RunPhase::Won.is_terminal());
        assert!(RunPhase::Lost.is_terminal());
        assert!(!RunPhase::Dropping.is_terminal());
        assert!(!RunPhase::AwaitingAnswer.is_terminal());
        assert!(!RunPhase::NotStarted.is_terminal());
    }
}
