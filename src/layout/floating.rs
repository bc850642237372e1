//! Edge/corner resize affordance of the panel (`resize: both`).
//!
//! A press on the panel border picks a `ResizeEdge`; subsequent pointer
//! motion is folded into a new rectangle relative to the rectangle captured
//! at press time. Panels in normal flow cannot move their origin, so only the
//! right and bottom edges are offered for them.

use super::FloatRect;
use crate::constants::{PANEL_MIN_HEIGHT, PANEL_MIN_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }

    /// Whether dragging this edge shifts the panel's origin.
    pub fn moves_origin(self) -> bool {
        self.moves_left() || self.moves_top()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle {
    pub rect: FloatRect,
    pub edge: ResizeEdge,
}

/// An in-progress resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDrag {
    pub edge: ResizeEdge,
    pub start_rect: FloatRect,
    pub start_col: i32,
    pub start_row: i32,
}

/// Border handles of `rect`. Corners come first so they win over the
/// adjoining edges when hit-testing front to back.
pub fn resize_handles(rect: FloatRect, allow_origin_edges: bool) -> Vec<ResizeHandle> {
    let mut handles = Vec::new();
    if rect.width == 0 || rect.height == 0 {
        return handles;
    }
    let right = rect.right() - 1;
    let bottom = rect.bottom() - 1;
    let cell = |x: i32, y: i32| FloatRect::new(x, y, 1, 1);
    handles.push(ResizeHandle {
        rect: cell(right, bottom),
        edge: ResizeEdge::BottomRight,
    });
    handles.push(ResizeHandle {
        rect: cell(rect.x, bottom),
        edge: ResizeEdge::BottomLeft,
    });
    handles.push(ResizeHandle {
        rect: cell(right, rect.y),
        edge: ResizeEdge::TopRight,
    });
    handles.push(ResizeHandle {
        rect: cell(rect.x, rect.y),
        edge: ResizeEdge::TopLeft,
    });
    if rect.width > 2 {
        let span = rect.width - 2;
        handles.push(ResizeHandle {
            rect: FloatRect::new(rect.x + 1, rect.y, span, 1),
            edge: ResizeEdge::Top,
        });
        handles.push(ResizeHandle {
            rect: FloatRect::new(rect.x + 1, bottom, span, 1),
            edge: ResizeEdge::Bottom,
        });
    }
    if rect.height > 2 {
        let span = rect.height - 2;
        handles.push(ResizeHandle {
            rect: FloatRect::new(rect.x, rect.y + 1, 1, span),
            edge: ResizeEdge::Left,
        });
        handles.push(ResizeHandle {
            rect: FloatRect::new(right, rect.y + 1, 1, span),
            edge: ResizeEdge::Right,
        });
    }
    if !allow_origin_edges {
        handles.retain(|h| !h.edge.moves_origin());
    }
    handles
}

pub fn handle_at(rect: FloatRect, allow_origin_edges: bool, x: i32, y: i32) -> Option<ResizeEdge> {
    resize_handles(rect, allow_origin_edges)
        .into_iter()
        .find(|h| h.rect.contains(x, y))
        .map(|h| h.edge)
}

/// Fold pointer motion into a resized rectangle. When `bounds` is given the
/// result is kept inside it; the origin-side edges stop at the bounds and
/// the far edges are shortened instead of pushing the panel off screen.
pub fn apply_resize_drag(drag: &ResizeDrag, column: i32, row: i32, bounds: Option<FloatRect>) -> FloatRect {
    let dx = column - drag.start_col;
    let dy = row - drag.start_row;
    let start = drag.start_rect;
    let mut x = start.x;
    let mut y = start.y;
    let mut width = i32::from(start.width);
    let mut height = i32::from(start.height);

    if drag.edge.moves_left() {
        x += dx;
        width -= dx;
    } else if drag.edge.moves_right() {
        width += dx;
    }
    if drag.edge.moves_top() {
        y += dy;
        height -= dy;
    } else if drag.edge.moves_bottom() {
        height += dy;
    }

    let min_w = i32::from(PANEL_MIN_WIDTH);
    let min_h = i32::from(PANEL_MIN_HEIGHT);
    if width < min_w {
        if drag.edge.moves_left() {
            x -= min_w - width;
        }
        width = min_w;
    }
    if height < min_h {
        if drag.edge.moves_top() {
            y -= min_h - height;
        }
        height = min_h;
    }

    if let Some(bounds) = bounds {
        if drag.edge.moves_left() && x < bounds.x {
            width -= bounds.x - x;
            x = bounds.x;
        }
        if drag.edge.moves_top() && y < bounds.y {
            height -= bounds.y - y;
            y = bounds.y;
        }
        if drag.edge.moves_right() && x + width > bounds.right() {
            width = bounds.right() - x;
        }
        if drag.edge.moves_bottom() && y + height > bounds.bottom() {
            height = bounds.bottom() - y;
        }
    }

    FloatRect::new(
        x,
        y,
        width.clamp(1, i32::from(u16::MAX)) as u16,
        height.clamp(1, i32::from(u16::MAX)) as u16,
    )
}
