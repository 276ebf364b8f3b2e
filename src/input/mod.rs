//! Key mapping from terminal events to session commands.
//!
//! The mapping is phase-aware: the same key means different things (or
//! nothing) depending on the run phase, which keeps stray input from
//! steering pieces while a question is open.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::{Command, MoveDir, RunPhase};

/// Map keyboard input to a session command for the current phase.
pub fn map_key(phase: RunPhase, key: KeyEvent) -> Option<Command> {
    match phase {
        RunPhase::NotStarted => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Start),
            _ => None,
        },
        RunPhase::Dropping => match key.code {
            // Movement
            KeyCode::Left
            | KeyCode::Char('h')
            | KeyCode::Char('H')
            | KeyCode::Char('a')
            | KeyCode::Char('A') => Some(Command::Move(MoveDir::Left)),
            KeyCode::Right
            | KeyCode::Char('l')
            | KeyCode::Char('L')
            | KeyCode::Char('d')
            | KeyCode::Char('D') => Some(Command::Move(MoveDir::Right)),
            KeyCode::Down
            | KeyCode::Char('j')
            | KeyCode::Char('J')
            | KeyCode::Char('s')
            | KeyCode::Char('S') => Some(Command::Move(MoveDir::Down)),

            // Rotation
            KeyCode::Up
            | KeyCode::Char('k')
            | KeyCode::Char('K')
            | KeyCode::Char('w')
            | KeyCode::Char('W') => Some(Command::Move(MoveDir::Rotate)),

            KeyCode::Char(' ') => Some(Command::HardDrop),
            _ => None,
        },
        RunPhase::AwaitingAnswer => match key.code {
            KeyCode::Char(c @ '1'..='4') => {
                Some(Command::Answer(c as usize - '1' as usize))
            }
            _ => None,
        },
        RunPhase::Won | RunPhase::Lost => match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Reset),
            _ => None,
        },
    }
}

/// Check if key should quit the application (valid in any phase).
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_movement_keys_while_dropping() {
        assert_eq!(
            map_key(RunPhase::Dropping, key(KeyCode::Left)),
            Some(Command::Move(MoveDir::Left))
        );
        assert_eq!(
            map_key(RunPhase::Dropping, key(KeyCode::Right)),
            Some(Command::Move(MoveDir::Right))
        );
        assert_eq!(
            map_key(RunPhase::Dropping, key(KeyCode::Down)),
            Some(Command::Move(MoveDir::Down))
        );
        assert_eq!(
            map_key(RunPhase::Dropping, key(KeyCode::Char('H'))),
            Some(Command::Move(MoveDir::Left))
        );
        assert_eq!(
            map_key(RunPhase::Dropping, key(KeyCode::Char('d'))),
            Some(Command::Move(MoveDir::Right))
        );
    }

    #[test]
    fn test_rotation_and_hard_drop_keys() {
        assert_eq!(
            map_key(RunPhase::Dropping, key(KeyCode::Up)),
            Some(Command::Move(MoveDir::Rotate))
        );
        assert_eq!(
            map_key(RunPhase::Dropping, key(KeyCode::Char('w'))),
            Some(Command::Move(MoveDir::Rotate))
        );
        assert_eq!(
            map_key(RunPhase::Dropping, key(KeyCode::Char(' '))),
            Some(Command::HardDrop)
        );
    }

    #[test]
    fn test_answer_keys_map_to_zero_based_indices() {
        for (ch, expected) in [('1', 0), ('2', 1), ('3', 2), ('4', 3)] {
            assert_eq!(
                map_key(RunPhase::AwaitingAnswer, key(KeyCode::Char(ch))),
                Some(Command::Answer(expected))
            );
        }
        assert_eq!(
            map_key(RunPhase::AwaitingAnswer, key(KeyCode::Char('5'))),
            None
        );
        assert_eq!(
            map_key(RunPhase::AwaitingAnswer, key(KeyCode::Char('0'))),
            None
        );
    }

    #[test]
    fn test_keys_gated_by_phase() {
        // Movement keys do nothing outside Dropping.
        assert_eq!(map_key(RunPhase::NotStarted, key(KeyCode::Left)), None);
        assert_eq!(map_key(RunPhase::AwaitingAnswer, key(KeyCode::Left)), None);
        assert_eq!(map_key(RunPhase::Lost, key(KeyCode::Char(' '))), None);

        // Answer digits do nothing while dropping.
        assert_eq!(map_key(RunPhase::Dropping, key(KeyCode::Char('1'))), None);

        // Start and restart only from their phases.
        assert_eq!(
            map_key(RunPhase::NotStarted, key(KeyCode::Enter)),
            Some(Command::Start)
        );
        assert_eq!(map_key(RunPhase::Dropping, key(KeyCode::Enter)), None);
        assert_eq!(
            map_key(RunPhase::Won, key(KeyCode::Char('r'))),
            Some(Command::Reset)
        );
        assert_eq!(
            map_key(RunPhase::Lost, key(KeyCode::Char('R'))),
            Some(Command::Reset)
        );
        assert_eq!(map_key(RunPhase::Dropping, key(KeyCode::Char('r'))), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(key(KeyCode::Char('q'))));
        assert!(should_quit(key(KeyCode::Char('Q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(key(KeyCode::Char('c'))));
        assert!(!should_quit(key(KeyCode::Esc)));
    }
}
