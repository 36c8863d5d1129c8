//! Pong scene

use crossterm::style::Color;
use glam::Vec2;

use super::canvas::Canvas;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, TICKS_PER_SECOND};
use crate::pong::state::BALL_RADIUS;
use crate::pong::{PongPhase, PongState};

const C_NET: Color = Color::DarkGrey;
const C_PADDLE: Color = Color::White;
const C_BALL: Color = Color::Yellow;
const C_SCORE: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

pub fn draw(canvas: &mut Canvas, state: &PongState) {
    canvas.clear();

    // Dashed net
    let mut y = 0.0;
    while y < FIELD_HEIGHT {
        canvas.line(
            Vec2::new(FIELD_WIDTH / 2.0, y),
            Vec2::new(FIELD_WIDTH / 2.0, y + 10.0),
            ':',
            C_NET,
        );
        y += 40.0;
    }

    canvas.fill_rect(state.player.rect(), '#', C_PADDLE);
    canvas.fill_rect(state.opponent.rect(), '#', C_PADDLE);
    canvas.fill_circle(state.ball.pos, BALL_RADIUS, 'o', C_BALL);

    canvas.text_centered(
        0,
        &format!("{:>3}   {:<3}", state.score.player, state.score.opponent),
        C_SCORE,
    );

    let mid = canvas.rows() as i32 / 2;
    match state.phase {
        PongPhase::Title => {
            canvas.text_centered(mid - 3, "P O N G", Color::Cyan);
            canvas.text_centered(mid + 3, "ENTER / SPACE: serve", C_SCORE);
            canvas.text_centered(mid + 4, "W S / arrows: move   Q: menu", C_HINT);
        }
        PongPhase::Serving { ticks_left } => {
            let seconds = ticks_left.div_ceil(TICKS_PER_SECOND);
            canvas.text_centered(mid - 3, &format!("Serve in {seconds}"), C_HINT);
        }
        PongPhase::Rally => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_paddles_ball_and_score() {
        let mut state = PongState::new(2);
        state.phase = PongPhase::Rally;
        state.score.player = 4;
        state.score.opponent = 11;
        let mut c = Canvas::new(80, 61, 1, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT));
        draw(&mut c, &state);

        let hud = c.row_text(0);
        assert!(hud.contains("4"));
        assert!(hud.contains("11"));
        // Player paddle spans x 20..30, y 250..350
        assert_eq!(c.get(2, 30).map(|cell| cell.ch), Some('#'));
        assert_eq!(c.get(77, 30).map(|cell| cell.ch), Some('#'));
        assert_eq!(c.get(40, 31).map(|cell| cell.ch), Some('o'));
    }

    #[test]
    fn test_title_prompt() {
        let state = PongState::new(2);
        let mut c = Canvas::new(80, 61, 1, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT));
        draw(&mut c, &state);
        let text: String = (0..c.rows()).map(|r| c.row_text(r)).collect();
        assert!(text.contains("P O N G"));
        assert!(text.contains("serve"));
    }
}
