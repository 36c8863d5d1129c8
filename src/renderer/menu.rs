//! Game-select menu

use crossterm::style::Color;

use super::canvas::Canvas;
use crate::history::MatchHistory;
use crate::settings::Pace;

pub fn draw(canvas: &mut Canvas, pace: Pace, history: &MatchHistory) {
    canvas.clear();
    let mid = canvas.rows() as i32 / 2;

    canvas.text_centered(mid - 5, "T E R M I N A L   A R C A D E", Color::Cyan);
    canvas.text_centered(mid - 2, "[1] Fall Blocks", Color::Green);
    canvas.text_centered(mid - 1, "[2] Pong       ", Color::Yellow);
    canvas.text_centered(
        mid + 1,
        &format!("[P] Pace: {:<8}", pace.as_str()),
        Color::White,
    );
    canvas.text_centered(mid + 2, "[Q] Quit       ", Color::DarkGrey);

    if let Some(last) = history.last() {
        canvas.text_centered(
            mid + 5,
            &format!("Last Fall Blocks match: {}", last.label()),
            Color::DarkGrey,
        );
    }
}
