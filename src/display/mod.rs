//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! the round's sprite list into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;

use crate::compute::sprites;
use crate::entities::{EnemyMotion, GameState, GameStatus, PlayField, SpriteFrame, SpriteInstance};
use crate::error::{GameError, Result};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_SHOTS: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_PROJECTILE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

pub const MIN_WIDTH: u16 = 24;
pub const MIN_HEIGHT: u16 = 10;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps world coordinates onto terminal cells.
///
/// Row 0 is the HUD, row 1 and `height - 2` the border, the last row the
/// controls hint.  The play interior is columns `1..width-1`, rows
/// `2..height-2`.  One column is one world unit; one row is `cell_aspect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub cell_aspect: f32,
}

impl Viewport {
    pub fn new(width: u16, height: u16, cell_aspect: f32) -> Result<Self> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(GameError::TerminalTooSmall { width, height });
        }
        Ok(Self {
            width,
            height,
            cell_aspect,
        })
    }

    /// The play field that exactly covers the interior.
    pub fn field(&self) -> PlayField {
        PlayField {
            width: (self.width - 2) as f32,
            height: (self.height - 4) as f32 * self.cell_aspect,
        }
    }

    /// Terminal cell for a world position, or `None` if it falls outside the field.
    ///
    /// The far edges (`x == width`, `y == height`) are part of the field, so
    /// they fold into the last interior column and row.
    pub fn cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        if !self.field().contains(pos) {
            return None;
        }
        let col = (1.0 + pos.x.floor()).min((self.width - 2) as f32);
        let row = (2.0 + (pos.y / self.cell_aspect).floor()).min((self.height - 3) as f32);
        Some((col as u16, row as u16))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, state, view)?;

    for sprite in sprites(state) {
        draw_sprite(out, &sprite, view)?;
    }

    draw_controls_hint(out, view)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>5}", state.score)))?;

    let mode = match state.tuning.enemy_motion {
        EnemyMotion::Chase => "[ CHASE ]",
        EnemyMotion::Descend => "[ DESCEND ]",
    };
    let mx = (view.width / 2).saturating_sub(mode.len() as u16 / 2);
    out.queue(cursor::MoveTo(mx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(mode))?;

    let shots = match state.tuning.max_projectiles {
        0 => format!("Shots:{}", state.projectiles.len()),
        cap => format!("Shots:{}/{}", state.projectiles.len(), cap),
    };
    let sx = view.width.saturating_sub(shots.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SHOTS))?;
    out.queue(Print(&shots))?;

    Ok(())
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// One of eight arrows, nearest to `angle` (0 = up, clockwise).
pub fn heading_glyph(angle: f32) -> char {
    const ARROWS: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];
    let idx = (angle.rem_euclid(360.0) / 45.0).round() as usize % 8;
    ARROWS[idx]
}

fn draw_sprite<W: Write>(out: &mut W, sprite: &SpriteInstance, view: &Viewport) -> std::io::Result<()> {
    match sprite.frame {
        SpriteFrame::Player => {
            if let Some((col, row)) = view.cell(sprite.pos) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(style::SetForegroundColor(C_PLAYER))?;
                out.queue(Print(heading_glyph(sprite.angle)))?;
            }
        }
        SpriteFrame::Projectile => {
            if let Some((col, row)) = view.cell(sprite.pos) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(style::SetForegroundColor(C_PROJECTILE))?;
                out.queue(Print('•'))?;
            }
        }
        SpriteFrame::Enemy => {
            // «▼» centred on the enemy, clipped cell by cell at the border
            out.queue(style::SetForegroundColor(C_ENEMY))?;
            for (dx, glyph) in [(-1.0, '«'), (0.0, '▼'), (1.0, '»')] {
                if let Some((col, row)) = view.cell(sprite.pos + Vec2::new(dx, 0.0)) {
                    out.queue(cursor::MoveTo(col, row))?;
                    out.queue(Print(glyph))?;
                }
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Turn   ↑ ↓ / W S : Move   SPACE : Fire   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

pub const GAME_OVER_MESSAGE: &str = "YOUR HEAD ASPLODE";

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>5}", state.score);
    let lines: [(String, Color); 5] = [
        ("╔═══════════════════════╗".to_string(), Color::Red),
        (format!("║   {GAME_OVER_MESSAGE}   ║"), Color::Red),
        ("╚═══════════════════════╝".to_string(), Color::Red),
        (score_line, Color::Yellow),
        ("R - Restart  Q - Quit".to_string(), Color::White),
    ];

    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    Ok(())
}
