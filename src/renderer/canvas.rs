//! Character-cell canvas
//!
//! Shapes are given in field coordinates and rasterized onto a grid of
//! terminal cells; text is placed in cell coordinates. Rows above
//! `field_top` are left to the HUD.

use crossterm::style::Color;
use glam::Vec2;

use crate::sim::Rect;
use crate::to_cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::Reset,
    };
}

#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    /// First row the field is mapped onto
    field_top: u16,
    field_size: Vec2,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, field_top: u16, field_size: Vec2) -> Self {
        Self {
            cols,
            rows,
            field_top: field_top.min(rows),
            field_size,
            cells: vec![Cell::BLANK; cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn field_rows(&self) -> u16 {
        self.rows - self.field_top
    }

    /// Resize the grid; contents are cleared
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.field_top = self.field_top.min(rows);
        self.cells = vec![Cell::BLANK; cols as usize * rows as usize];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn get(&self, col: u16, row: u16) -> Option<Cell> {
        (col < self.cols && row < self.rows)
            .then(|| self.cells[row as usize * self.cols as usize + col as usize])
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: u16) -> &[Cell] {
        if row >= self.rows {
            return &[];
        }
        let start = row as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }

    /// Row contents as a string
    pub fn row_text(&self, row: u16) -> String {
        self.row(row).iter().map(|cell| cell.ch).collect()
    }

    /// Write a cell; out-of-range coordinates are ignored
    pub fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = Cell { ch, fg };
    }

    /// Field x to column
    pub fn col_of(&self, x: f32) -> i32 {
        to_cell(x, self.field_size.x, self.cols)
    }

    /// Field y to row
    pub fn row_of(&self, y: f32) -> i32 {
        to_cell(y, self.field_size.y, self.field_rows()) + self.field_top as i32
    }

    /// Write a cell at a field position, clipped to the field area
    fn plot(&mut self, pos: Vec2, ch: char, fg: Color) {
        let row = self.row_of(pos.y);
        if row < self.field_top as i32 {
            return;
        }
        self.put(self.col_of(pos.x), row, ch, fg);
    }

    /// Exclusive column end for a span ending at field x
    fn col_end(&self, x: f32) -> i32 {
        (x * self.cols as f32 / self.field_size.x).ceil() as i32
    }

    /// Exclusive row end for a span ending at field y
    fn row_end(&self, y: f32) -> i32 {
        (y * self.field_rows() as f32 / self.field_size.y).ceil() as i32 + self.field_top as i32
    }

    /// Fill every cell the rectangle touches; at least one cell is drawn
    /// for any rectangle inside the field
    pub fn fill_rect(&mut self, rect: Rect, ch: char, fg: Color) {
        let max = rect.max();
        let (c0, r0) = (self.col_of(rect.min.x), self.row_of(rect.min.y));
        let c1 = self.col_end(max.x).max(c0 + 1);
        let r1 = self.row_end(max.y).max(r0 + 1);

        let top = self.field_top as i32;
        for row in r0.max(top)..r1 {
            for col in c0..c1 {
                self.put(col, row, ch, fg);
            }
        }
    }

    /// Fill cells whose centers fall within `radius` of `center`
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, ch: char, fg: Color) {
        let cell_w = self.field_size.x / self.cols.max(1) as f32;
        let cell_h = self.field_size.y / self.field_rows().max(1) as f32;

        let (c0, c1) = (self.col_of(center.x - radius), self.col_of(center.x + radius));
        let (r0, r1) = (self.row_of(center.y - radius), self.row_of(center.y + radius));
        let top = self.field_top as i32;

        let mut drawn = false;
        for row in r0.max(top)..=r1 {
            for col in c0..=c1 {
                let cell_center = Vec2::new(
                    (col as f32 + 0.5) * cell_w,
                    ((row - top) as f32 + 0.5) * cell_h,
                );
                if cell_center.distance(center) <= radius {
                    self.put(col, row, ch, fg);
                    drawn = true;
                }
            }
        }
        // Small circles still show up
        if !drawn {
            self.plot(center, ch, fg);
        }
    }

    /// Draw a straight line between two field positions
    pub fn line(&mut self, from: Vec2, to: Vec2, ch: char, fg: Color) {
        let (c0, r0) = (self.col_of(from.x), self.row_of(from.y));
        let (c1, r1) = (self.col_of(to.x), self.row_of(to.y));
        let steps = (c1 - c0).abs().max((r1 - r0).abs()).max(1);
        let top = self.field_top as i32;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let col = c0 as f32 + (c1 - c0) as f32 * t;
            let row = r0 as f32 + (r1 - r0) as f32 * t;
            let row = row.round() as i32;
            if row >= top {
                self.put(col.round() as i32, row, ch, fg);
            }
        }
    }

    /// Write text starting at a cell; clipped at the right edge
    pub fn text(&mut self, col: i32, row: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch, fg);
        }
    }

    /// Write text centered horizontally on `row`
    pub fn text_centered(&mut self, row: i32, text: &str, fg: Color) {
        let len = text.chars().count() as i32;
        let col = (self.cols as i32 - len) / 2;
        self.text(col.max(0), row, text, fg);
    }

    /// Write text right-aligned, ending one cell before the right edge
    pub fn text_right(&mut self, row: i32, text: &str, fg: Color) {
        let len = text.chars().count() as i32;
        self.text(self.cols as i32 - len - 1, row, text, fg);
    }
}
