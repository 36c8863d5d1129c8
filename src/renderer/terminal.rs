//! Presenting a canvas through crossterm

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
};

use super::canvas::Canvas;

/// Queue the whole canvas row by row and flush once.
///
/// Color changes are only emitted where the foreground actually changes.
pub fn present<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    let mut run = String::with_capacity(canvas.cols() as usize);

    for row in 0..canvas.rows() {
        out.queue(cursor::MoveTo(0, row))?;
        let mut current: Option<Color> = None;

        for cell in canvas.row(row) {
            if current != Some(cell.fg) {
                if !run.is_empty() {
                    out.queue(Print(&run))?;
                    run.clear();
                }
                out.queue(style::SetForegroundColor(cell.fg))?;
                current = Some(cell.fg);
            }
            run.push(cell.ch);
        }
        if !run.is_empty() {
            out.queue(Print(&run))?;
            run.clear();
        }
    }

    out.queue(style::ResetColor)?;
    out.flush()
}
