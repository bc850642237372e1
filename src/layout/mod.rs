pub mod floating;
pub mod flow;
pub mod panel;

pub use flow::{LayoutMap, bounding_box, compute, hit_test};
pub use panel::PanelRegions;

use ratatui::prelude::Rect;

/// Signed rectangle origin with unsigned size. Boxes may sit partially
/// outside the viewport (above it once the document scrolls, for example).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + i32::from(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y + i32::from(self.height)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// The visible part of this box inside `clip`, as an unsigned `Rect`.
    pub fn clip_to(&self, clip: Rect) -> Option<Rect> {
        let x0 = self.x.max(i32::from(clip.x));
        let y0 = self.y.max(i32::from(clip.y));
        let x1 = self.right().min(i32::from(clip.x) + i32::from(clip.width));
        let y1 = self.bottom().min(i32::from(clip.y) + i32::from(clip.height));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }
}
