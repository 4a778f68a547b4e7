/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use wave_shooter::entities::{Banner, Category, EntityView, GameOverCause, ShotKind};
use wave_shooter::state::{Arena, GameState};

/// Arena units covered by one terminal cell.
pub const CELL_W: f32 = 10.0;
pub const CELL_H: f32 = 24.0;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_COMBO: Color = Color::Cyan;
const C_HUD_HEALTH: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HIT: Color = Color::Red;
const C_ENEMY: Color = Color::Green;
const C_ENEMY_DIVING: Color = Color::Yellow;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_SHOT_SPARK: Color = Color::Magenta;
const C_SHOT_PULSE: Color = Color::DarkYellow;
const C_ITEM: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Arena matching a terminal of `cols` × `rows`: the HUD, two border rows and
/// the hint row are not part of the play field.
pub fn arena_for_terminal(cols: u16, rows: u16) -> Arena {
    Arena::new(
        cols.saturating_sub(2) as f32 * CELL_W,
        rows.saturating_sub(4) as f32 * CELL_H,
    )
}

/// Terminal cell for an arena position, if it falls inside the play field.
fn to_cell(x: f32, y: f32, width: u16, height: u16) -> Option<(u16, u16)> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let col = 1 + (x / CELL_W) as u16;
    let row = 2 + (y / CELL_H) as u16;
    if col >= width.saturating_sub(1) || row >= height.saturating_sub(2) {
        return None;
    }
    Some((col, row))
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame on a `width` × `height` terminal.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, width)?;

    for view in state.entities() {
        draw_entity(out, &view, width, height)?;
    }

    draw_controls_hint(out, height)?;

    match state.session.banner() {
        Some(Banner::WaveCleared(wave)) => draw_wave_cleared(out, wave, width, height)?,
        Some(Banner::GameOver) => draw_game_over(out, state, width, height)?,
        None => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    let session = &state.session;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>7}", session.score())))?;

    if session.combo() > 1 {
        out.queue(style::SetForegroundColor(C_HUD_COMBO))?;
        out.queue(Print(format!("  x{}", session.combo())))?;
    }

    let wave_str = format!("[ WAVE {} ]", session.wave());
    let wx = (width / 2).saturating_sub(wave_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(wx, 0))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(&wave_str))?;

    let missing = session.max_health().saturating_sub(session.health());
    let hearts = format!(
        "{}{}",
        "♥".repeat(session.health() as usize),
        "♡".repeat(missing as usize)
    );
    let health_str = format!("Health:{}", hearts);
    let rx = width.saturating_sub(health_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_entity<W: Write>(
    out: &mut W,
    view: &EntityView,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let Some((col, row)) = to_cell(view.position.x, view.position.y, width, height) else {
        return Ok(());
    };

    let (glyph, color) = match view.category {
        Category::Player if view.flash => ("▲", C_PLAYER_HIT),
        Category::Player => ("▲", C_PLAYER),
        Category::Enemy if view.diving => ("▼", C_ENEMY_DIVING),
        Category::Enemy => ("◎", C_ENEMY),
        Category::PlayerProjectile => ("║", C_BULLET_PLAYER),
        Category::EnemyProjectile => match view.shot {
            Some(ShotKind::Pulse) => ("o", C_SHOT_PULSE),
            _ => ("↓", C_SHOT_SPARK),
        },
        Category::Item => ("♥", C_ITEM),
    };

    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE / click : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Banners ───────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_wave_cleared<W: Write>(
    out: &mut W,
    wave: u32,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let lines = [(format!("★  WAVE {} CLEAR  ★", wave), Color::Yellow)];
    draw_centered(out, &lines, width, height)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cause = match state.session.game_over_cause() {
        Some(GameOverCause::EnemyReachedFloor) => "The invaders landed",
        _ => "Out of health",
    };
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (cause.to_string(), Color::DarkGrey),
        (format!("Final Score: {:>6}", state.session.score()), Color::Yellow),
        ("R / click - Play Again  Q - Quit".to_string(), Color::White),
    ];
    draw_centered(out, &lines, width, height)
}
