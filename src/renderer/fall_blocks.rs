//! Fall Blocks scene

use crossterm::style::Color;
use glam::Vec2;

use super::canvas::Canvas;
use crate::consts::TICKS_PER_SECOND;
use crate::sim::{Block, GamePhase, GameState, Rect, Side, TurnPhase};

const C_PLAYER: Color = Color::Cyan;
const C_OPPONENT: Color = Color::Red;
const C_PROJECTILE: Color = Color::White;
const C_POWERUP: Color = Color::Yellow;
const C_FLOOR: Color = Color::DarkGrey;
const C_HUD: Color = Color::White;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Launcher footprint (drawing only)
const LAUNCHER_SIZE: Vec2 = Vec2::new(30.0, 10.0);
/// Sideways offset of a shaking block
const SHAKE_OFFSET: f32 = 4.0;

fn side_color(side: Side) -> Color {
    match side {
        Side::Player => C_PLAYER,
        Side::Opponent => C_OPPONENT,
    }
}

/// Blocks get hotter as their resistance grows
fn resistance_color(resistance: u8) -> Color {
    match resistance {
        0 | 1 => Color::Green,
        2 => Color::DarkCyan,
        3 => Color::Yellow,
        4 => Color::Magenta,
        _ => Color::Red,
    }
}

/// Draw the whole frame for the current phase
pub fn draw(canvas: &mut Canvas, state: &GameState) {
    canvas.clear();
    draw_field(canvas, state);
    draw_hud(canvas, state);

    match state.phase {
        GamePhase::Title => draw_title(canvas, state),
        GamePhase::Playing => {}
        GamePhase::MatchOver {
            outcome,
            ticks_left,
        } => {
            let mid = canvas.rows() as i32 / 2;
            canvas.text_centered(mid - 1, outcome.label(), Color::Yellow);
            canvas.text_centered(
                mid + 1,
                &format!("{} - {}", state.score.player, state.score.opponent),
                C_HUD,
            );
            let seconds = ticks_left.div_ceil(TICKS_PER_SECOND);
            canvas.text_centered(mid + 3, &format!("Back to title in {seconds}s"), C_HINT);
        }
    }
}

fn draw_field(canvas: &mut Canvas, state: &GameState) {
    let settings = &state.settings;
    let floor = settings.floor_threshold();
    canvas.line(
        Vec2::new(0.0, floor),
        Vec2::new(settings.field_width, floor),
        '.',
        C_FLOOR,
    );

    for block in &state.blocks {
        draw_block(canvas, block);
    }

    for powerup in &state.powerups {
        canvas.fill_rect(powerup.rect(), '+', C_POWERUP);
    }

    for projectile in &state.projectiles {
        canvas.fill_rect(projectile.rect(), '*', C_PROJECTILE);
    }

    let launcher = Vec2::new(state.launcher.x, state.launcher.y);
    canvas.fill_rect(
        Rect::from_center(launcher, LAUNCHER_SIZE),
        '^',
        side_color(state.turn),
    );
}

fn draw_block(canvas: &mut Canvas, block: &Block) {
    let offset = match block.shake_ticks % 4 {
        0 => 0.0,
        1 => SHAKE_OFFSET,
        2 => 0.0,
        _ => -SHAKE_OFFSET,
    };
    let rect = block.rect().translated(Vec2::new(offset, 0.0));
    let color = resistance_color(block.resistance);
    canvas.fill_rect(rect, '#', color);

    let center = rect.center();
    let digit = char::from_digit(block.resistance.min(9) as u32, 10).unwrap_or('?');
    canvas.put(canvas.col_of(center.x), canvas.row_of(center.y), digit, color);
}

fn draw_hud(canvas: &mut Canvas, state: &GameState) {
    canvas.text(
        1,
        0,
        &format!(
            "You {:>3}  ammo {:>2}",
            state.score.player, state.ammo.player
        ),
        C_PLAYER,
    );
    canvas.text_right(
        0,
        &format!(
            "CPU {:>3}  ammo {:>2}",
            state.score.opponent, state.ammo.opponent
        ),
        C_OPPONENT,
    );

    if state.phase != GamePhase::Playing {
        return;
    }
    let status: String = match state.turn_phase {
        TurnPhase::WaitingToFire if state.turn == Side::Player => "Your turn - aim and fire".into(),
        TurnPhase::WaitingToFire => "CPU is aiming".into(),
        TurnPhase::Firing { remaining, .. } => format!("Firing ({remaining} left)"),
        TurnPhase::Resolving => "...".into(),
        TurnPhase::SwitchingTurn { .. } => format!("Wave {}", state.wave_index + 1),
    };
    canvas.text_centered(0, &status, side_color(state.turn));
}

fn draw_title(canvas: &mut Canvas, state: &GameState) {
    let mid = canvas.rows() as i32 / 2;
    canvas.text_centered(mid - 4, "F A L L   B L O C K S", C_TITLE);
    canvas.text_centered(mid - 2, "ENTER / SPACE: start", C_HUD);
    canvas.text_centered(
        mid - 1,
        "A D / arrows: move   SPACE / W: fire   Q: menu",
        C_HINT,
    );

    if state.history.is_empty() {
        canvas.text_centered(mid + 1, "No matches played yet", C_HINT);
        return;
    }
    canvas.text_centered(mid + 1, "Recent matches", C_HUD);
    for (i, outcome) in state.history.recent().enumerate() {
        canvas.text_centered(mid + 2 + i as i32, outcome.label(), C_HINT);
    }
}
