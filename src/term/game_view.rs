//! GameView: maps a `GameSession` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSession;
use crate::term::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Outcome, PieceKind, RunPhase, BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Width of the quiz modal's timer bar in terminal columns.
const TIMER_BAR_WIDTH: u16 = 30;

/// Renders the session into a framebuffer, one frame at a time.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    /// Render the current session state into a framebuffer.
    pub fn render(&self, session: &GameSession, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w + 16) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let bg = CellStyle {
            fg: Rgb::new(80, 80, 90),
            bg: Rgb::new(30, 30, 40),
            bold: false,
            dim: false,
        };
        let border = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        fb.fill_rect(start_x + 1, start_y + 1, board_px_w, board_px_h, ' ', bg);
        draw_border(&mut fb, start_x, start_y, frame_w, frame_h, border);

        // Locked board cells.
        for y in 0..BOARD_HEIGHT as u16 {
            for x in 0..BOARD_WIDTH as u16 {
                let cell = session.grid().get(x as i8, y as i8).unwrap_or(None);
                if let Some(kind) = cell {
                    self.draw_board_cell(&mut fb, start_x, start_y, x, y, kind);
                } else {
                    self.draw_empty_cell(&mut fb, start_x, start_y, x, y);
                }
            }
        }

        // Ghost landing projection, under the active piece.
        if let (Some(active), Some(ghost_y)) = (session.current_piece(), session.ghost_y()) {
            let ghost_style = CellStyle {
                fg: Rgb::new(140, 140, 140),
                bg: Rgb::new(30, 30, 40),
                bold: false,
                dim: true,
            };
            for (r, c, _) in active.shape.occupied_cells() {
                let x = active.x + c;
                let y = ghost_y + r;
                if on_board(x, y) {
                    self.fill_cell_rect(
                        &mut fb,
                        start_x,
                        start_y,
                        x as u16,
                        y as u16,
                        '░',
                        ghost_style,
                    );
                }
            }
        }

        // Active piece.
        if let Some(active) = session.current_piece() {
            for (r, c, _) in active.shape.occupied_cells() {
                let x = active.x + c;
                let y = active.y + r;
                if on_board(x, y) {
                    self.draw_board_cell(&mut fb, start_x, start_y, x as u16, y as u16, active.kind);
                }
            }
        }

        self.draw_side_panel(&mut fb, session, viewport, start_x, start_y, frame_w);

        match session.phase() {
            RunPhase::NotStarted => {
                draw_overlay(
                    &mut fb,
                    viewport,
                    &["QUIZ BLOCKS", "", "Press Enter to start"],
                );
            }
            RunPhase::AwaitingAnswer => {
                self.draw_quiz_modal(&mut fb, session, viewport);
            }
            RunPhase::Won => {
                let score_line = format!("Final score: {}", session.score());
                draw_overlay(
                    &mut fb,
                    viewport,
                    &["You win!", &score_line, "", "R restart / Q quit"],
                );
            }
            RunPhase::Lost => {
                let reason = match session.outcome() {
                    Some(Outcome::Lost { reason, .. }) => reason.message(),
                    _ => "Game over",
                };
                let score_line = format!("Final score: {}", session.score());
                draw_overlay(
                    &mut fb,
                    viewport,
                    &["Game over", reason, &score_line, "", "R restart / Q quit"],
                );
            }
            RunPhase::Dropping => {}
        }

        fb
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle {
            fg: Rgb::new(90, 90, 100),
            bg: Rgb::new(30, 30, 40),
            bold: false,
            dim: true,
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    fn draw_board_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        kind: PieceKind,
    ) {
        let style = CellStyle {
            fg: kind_color(kind),
            bg: Rgb::new(30, 30, 40),
            bold: true,
            dim: false,
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        session: &GameSession,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, &format!("{}", session.score()), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LINES", label);
        y = y.saturating_add(1);
        fb.put_str(
            panel_x,
            y,
            &format!("{} / {}", session.lines(), session.lines_to_win()),
            value,
        );
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "TIME", label);
        y = y.saturating_add(1);
        let time_style = if session.session_clock_running() {
            value
        } else {
            CellStyle { dim: true, ..value }
        };
        fb.put_str(
            panel_x,
            y,
            &format_clock(session.session_secs_remaining()),
            time_style,
        );
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        self.draw_preview(fb, panel_x, y, session.next_kind());
    }

    /// Mini shape grid for the one-ahead preview.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind) {
        let shape = crate::core::pieces::Shape::of(kind);
        let style = CellStyle {
            fg: kind_color(kind),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };
        for (r, c, _) in shape.occupied_cells() {
            let px = x + (c as u16) * self.cell_w;
            let py = y + r as u16;
            fb.fill_rect(px, py, self.cell_w, 1, '█', style);
        }
    }

    fn draw_quiz_modal(&self, fb: &mut FrameBuffer, session: &GameSession, viewport: Viewport) {
        let Some(question) = session.question() else {
            return;
        };

        let modal_w = (TIMER_BAR_WIDTH + 8)
            .max(question.prompt.chars().count() as u16 + 4)
            .min(viewport.width);
        let modal_h = 10u16;
        let x = viewport.width.saturating_sub(modal_w) / 2;
        let y = viewport.height.saturating_sub(modal_h) / 2;

        let panel = CellStyle {
            fg: Rgb::new(230, 230, 230),
            bg: Rgb::new(20, 20, 60),
            bold: false,
            dim: false,
        };
        let accent = CellStyle {
            fg: Rgb::new(255, 215, 80),
            bg: Rgb::new(20, 20, 60),
            bold: true,
            dim: false,
        };

        fb.fill_rect(x, y, modal_w, modal_h, ' ', panel);
        draw_border(fb, x, y, modal_w, modal_h, panel);

        fb.put_str(x + 2, y + 1, &question.prompt, accent);

        for (i, option) in question.options.iter().enumerate() {
            let line = format!("{}. {}", i + 1, option);
            fb.put_str(x + 2, y + 3 + i as u16, &line, panel);
        }

        // Timer bar: shrinks continuously with the remaining fraction.
        let filled = (session.question_fraction() * TIMER_BAR_WIDTH as f32).ceil() as u16;
        let bar_y = y + modal_h - 2;
        let bar = CellStyle {
            fg: Rgb::new(100, 220, 120),
            bg: Rgb::new(20, 20, 60),
            bold: false,
            dim: false,
        };
        let bar_w = modal_w.saturating_sub(4);
        fb.fill_rect(x + 2, bar_y, TIMER_BAR_WIDTH.min(bar_w), 1, '░', panel);
        fb.fill_rect(x + 2, bar_y, filled.min(bar_w), 1, '█', bar);
    }
}

/// Centered multi-line text box over whatever is already drawn.
fn draw_overlay(fb: &mut FrameBuffer, viewport: Viewport, lines: &[&str]) {
    let text_w = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let box_w = (text_w + 6).min(viewport.width);
    let box_h = lines.len() as u16 + 2;
    let x = viewport.width.saturating_sub(box_w) / 2;
    let y = viewport.height.saturating_sub(box_h) / 2;

    let style = CellStyle {
        fg: Rgb::new(255, 255, 255),
        bg: Rgb::new(0, 0, 0),
        bold: true,
        dim: false,
    };
    fb.fill_rect(x, y, box_w, box_h, ' ', style);
    draw_border(fb, x, y, box_w, box_h, style);
    for (i, line) in lines.iter().enumerate() {
        let lx = x + box_w.saturating_sub(line.chars().count() as u16) / 2;
        fb.put_str(lx, y + 1 + i as u16, line, style);
    }
}

fn on_board(x: i8, y: i8) -> bool {
    x >= 0 && x < BOARD_WIDTH as i8 && y >= 0 && y < BOARD_HEIGHT as i8
}

fn kind_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}

/// `MM:SS` from a seconds count.
fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}
