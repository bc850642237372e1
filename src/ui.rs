//! Clipped drawing onto a ratatui buffer.
//!
//! Document boxes use signed coordinates: a panel dragged against the edge
//! or a page scrolled past its first rows has parts above or left of the
//! screen. Writing out-of-bounds into the underlying `Buffer` can panic, so
//! every draw call goes through here and is clipped to the frame first.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::layout::FloatRect;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Write `text` starting at the signed position `(x, y)`, one cell per
    /// char. Cells outside the frame are skipped.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) {
        let Some(row) = self.row_in_frame(y) else {
            return;
        };
        for (offset, ch) in text.chars().enumerate() {
            let col = x + offset as i32;
            if let Some(col) = self.col_in_frame(col)
                && let Some(cell) = self.buffer.cell_mut((col, row))
            {
                cell.set_char(ch);
                cell.set_style(style);
            }
        }
    }

    /// Restyle the cells of `rect` that are on screen, keeping their symbols.
    pub fn fill_style(&mut self, rect: FloatRect, style: Style) {
        let Some(visible) = rect.clip_to(self.area) else {
            return;
        };
        self.buffer.set_style(visible, style);
    }

    fn row_in_frame(&self, y: i32) -> Option<u16> {
        let top = i32::from(self.area.y);
        (y >= top && y < top + i32::from(self.area.height)).then_some(y as u16)
    }

    fn col_in_frame(&self, x: i32) -> Option<u16> {
        let left = i32::from(self.area.x);
        (x >= left && x < left + i32::from(self.area.width)).then_some(x as u16)
    }
}
