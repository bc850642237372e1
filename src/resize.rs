use tracing::debug;

use crate::dom::{Document, NodeId, PointerEvent, Position, ResizeMode};
use crate::layout::FloatRect;
use crate::layout::bounding_box;
use crate::layout::floating::{ResizeDrag, ResizeEdge, apply_resize_drag, handle_at};

/// The panel's `resize: both` affordance. Independent of dragging: it only
/// ever writes explicit sizes (and, for positioned panels dragged by their
/// top or left edge, the matching offsets).
#[derive(Debug)]
pub struct PanelResizer {
    panel: NodeId,
    enabled: bool,
    drag: Option<ResizeDrag>,
}

impl PanelResizer {
    pub fn new(panel: NodeId) -> Self {
        Self {
            panel,
            enabled: false,
            drag: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_resizing(&self) -> bool {
        self.drag.is_some()
    }

    pub fn set_enabled(&mut self, doc: &mut Document, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.drag = None;
        }
        if let Some(style) = doc.style_mut(self.panel) {
            style.resize = Some(if enabled {
                ResizeMode::Both
            } else {
                ResizeMode::None
            });
        }
        debug!(enabled, "panel resize toggled");
    }

    /// Edge under the pointer, if a press there would start a resize.
    pub fn edge_at(&self, doc: &Document, x: i32, y: i32) -> Option<ResizeEdge> {
        if !self.enabled {
            return None;
        }
        let rect = bounding_box(doc, self.panel)?;
        let positioned = doc
            .style(self.panel)
            .is_some_and(|s| s.position() != Position::Static);
        handle_at(rect, positioned, x, y)
    }

    pub fn pointer_down(&mut self, doc: &Document, ev: &PointerEvent) -> bool {
        if !ev.is_primary() {
            return false;
        }
        let Some(edge) = self.edge_at(doc, ev.x, ev.y) else {
            return false;
        };
        let Some(start_rect) = bounding_box(doc, self.panel) else {
            return false;
        };
        self.drag = Some(ResizeDrag {
            edge,
            start_rect,
            start_col: ev.x,
            start_row: ev.y,
        });
        true
    }

    pub fn pointer_move(&mut self, doc: &mut Document, ev: &PointerEvent) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let viewport = doc.viewport();
        let bounds = FloatRect::new(0, 0, viewport.width, viewport.height);
        let rect = apply_resize_drag(&drag, ev.x, ev.y, Some(bounds));
        let (scroll_x, scroll_y) = doc.scroll_offset();
        let Some(style) = doc.style_mut(self.panel) else {
            return false;
        };
        style.width = Some(rect.width);
        style.height = Some(rect.height);
        if drag.edge.moves_origin() {
            let (offset_x, offset_y) = match style.position() {
                Position::Absolute => (i32::from(scroll_x), i32::from(scroll_y)),
                _ => (0, 0),
            };
            style.left = Some(rect.x + offset_x);
            style.top = Some(rect.y + offset_y);
        }
        true
    }

    pub fn pointer_up(&mut self) -> bool {
        self.drag.take().is_some()
    }
}
