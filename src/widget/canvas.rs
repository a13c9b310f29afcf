//! Half-block canvas: pages painted into terminal cells.
//!
//! Each cell shows two vertical samples using the upper half block, the top
//! sample as foreground and the bottom one as background. A cell stands for
//! `cell_width x cell_height` virtual pixels, so the strip keeps working in
//! screen-like pixel units whatever the terminal grid is.

use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::strip::{Surface, Viewport};

const UPPER_HALF_BLOCK: &str = "▀";

pub struct HalfblockCanvas {
    cols: u16,
    rows: u16,
    cell_width: u32,
    cell_height: u32,
    samples: Vec<Color>,
    background: Color,
    hatch: (Color, Color),
}

impl HalfblockCanvas {
    /// A canvas for `cols x rows` cells, cleared to `background`
    pub fn new(cols: u16, rows: u16, cell_width: u32, cell_height: u32, background: Color) -> Self {
        let count = cols as usize * rows as usize * 2;
        Self {
            cols,
            rows,
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(2),
            samples: vec![background; count],
            background,
            hatch: (Color::DarkGray, Color::Black),
        }
    }

    /// Colours used to mark pages that failed to render
    pub fn with_hatch(mut self, light: Color, dark: Color) -> Self {
        self.hatch = (light, dark);
        self
    }

    /// Virtual pixel size covered by the canvas
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            u32::from(self.cols) * self.cell_width,
            u32::from(self.rows) * self.cell_height,
        )
    }

    pub fn clear(&mut self) {
        self.samples.fill(self.background);
    }

    /// Colour of sample `half_row` (two per cell row) in column `col`
    pub fn sample(&self, col: u16, half_row: u16) -> Option<Color> {
        if col >= self.cols || u32::from(half_row) >= u32::from(self.rows) * 2 {
            return None;
        }
        self.samples
            .get(half_row as usize * self.cols as usize + col as usize)
            .copied()
    }

    fn sample_height(&self) -> u32 {
        self.cell_height / 2
    }

    /// Sample columns whose centres fall inside `[x, x + width)`
    fn columns(&self, x: i32, width: u32) -> Range<i64> {
        centred_span(
            i64::from(x),
            i64::from(width),
            i64::from(self.cell_width),
            i64::from(self.cols),
        )
    }

    /// Sample rows whose centres fall inside `[y, y + height)`
    fn half_rows(&self, y: i32, height: u32) -> Range<i64> {
        centred_span(
            i64::from(y),
            i64::from(height),
            i64::from(self.sample_height()),
            i64::from(self.rows) * 2,
        )
    }

    fn centre(index: i64, step: u32) -> i64 {
        index * i64::from(step) + i64::from(step / 2)
    }
}

/// Indices `i` in `[0, count)` with `origin <= i * step + step / 2 < origin + len`
fn centred_span(origin: i64, len: i64, step: i64, count: i64) -> Range<i64> {
    let offset = step / 2;
    let first = ceil_div(origin - offset, step).clamp(0, count);
    let end = ceil_div(origin + len - offset, step).clamp(0, count);
    first..end.max(first)
}

fn ceil_div(a: i64, b: i64) -> i64 {
    -(-a).div_euclid(b)
}

impl Surface for HalfblockCanvas {
    fn blit(&mut self, pixels: &[u8], width: u32, height: u32, x: i32, y: i32) {
        let cols = self.columns(x, width);
        for half_row in self.half_rows(y, height) {
            let py = (Self::centre(half_row, self.sample_height()) - i64::from(y)) as usize;
            for col in cols.clone() {
                let px = (Self::centre(col, self.cell_width) - i64::from(x)) as usize;
                let offset = (py * width as usize + px) * 4;
                if let Some(bgra) = pixels.get(offset..offset + 4) {
                    let index = half_row as usize * self.cols as usize + col as usize;
                    self.samples[index] = Color::Rgb(bgra[2], bgra[1], bgra[0]);
                }
            }
        }
    }

    fn placeholder(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let cols = self.columns(x, width);
        for half_row in self.half_rows(y, height) {
            for col in cols.clone() {
                let index = half_row as usize * self.cols as usize + col as usize;
                self.samples[index] = if (half_row + col) % 2 == 0 {
                    self.hatch.0
                } else {
                    self.hatch.1
                };
            }
        }
    }
}

impl Widget for &HalfblockCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);
        for row in 0..rows {
            for col in 0..cols {
                let top = self.sample(col, row * 2).unwrap_or(self.background);
                let bottom = self.sample(col, row * 2 + 1).unwrap_or(self.background);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(UPPER_HALF_BLOCK).set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}
