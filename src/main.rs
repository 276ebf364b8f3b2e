//! Terminal runner for Quiz Blocks.
//!
//! Uses crossterm for input and a custom framebuffer-based renderer.
//! All game rules live in `core`; this file is the I/O shell.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use quiz_tetris::core::{GameSession, QuestionBank};
use quiz_tetris::input::{map_key, should_quit};
use quiz_tetris::term::{GameView, TerminalRenderer, Viewport};
use quiz_tetris::types::TICK_MS;

fn main() -> Result<()> {
    // A broken question pool must fail loudly before the terminal is
    // taken over.
    let bank = QuestionBank::builtin()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, bank);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, bank: QuestionBank) -> Result<()> {
    let mut session = GameSession::new(bank, wall_clock_seed());
    let view = GameView::default();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let fb = view.render(&session, Viewport::new(w, h));
        term.draw(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(command) = map_key(session.phase(), key) {
                        session.apply(command);
                    }
                }
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(TICK_MS);
        }
    }
}

fn wall_clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(1)
}
