use super::FloatRect;
use crate::dom::NodeKind;

/// Fixed geometry of the console panel chrome.
///
/// ```text
/// ┌──────────────────────────┐  border row
/// │ Console               ✕  │  header (label left, close button right)
/// │ output…                  │  body: output lines followed by the prompt
/// │ User> _                  │
/// └──────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRegions {
    pub outer: FloatRect,
    pub header: FloatRect,
    pub label: FloatRect,
    pub close: FloatRect,
    pub body: FloatRect,
}

const CLOSE_WIDTH: u16 = 3;

impl PanelRegions {
    pub fn for_rect(outer: FloatRect) -> Self {
        let inner_width = outer.width.saturating_sub(2);
        let header = FloatRect::new(outer.x + 1, outer.y + 1, inner_width, 1.min(outer.height.saturating_sub(2)));
        let close_width = CLOSE_WIDTH.min(inner_width);
        let close = FloatRect::new(
            header.right() - i32::from(close_width) - 1,
            header.y,
            close_width,
            header.height,
        );
        let label = FloatRect::new(
            header.x + 1,
            header.y,
            inner_width.saturating_sub(close_width + 3),
            header.height,
        );
        let body = FloatRect::new(
            outer.x + 1,
            outer.y + 2,
            inner_width,
            outer.height.saturating_sub(3),
        );
        Self {
            outer,
            header,
            label,
            close,
            body,
        }
    }

    /// Text area of the body: output lines and the prompt, one column of
    /// padding on either side.
    pub fn body_content(&self) -> FloatRect {
        FloatRect::new(
            self.body.x + 1,
            self.body.y,
            self.body.width.saturating_sub(2),
            self.body.height,
        )
    }

    /// Hit-test box for a node of `kind` inside the panel. Prompt, input and
    /// individual output lines scroll with the body, so they hit as the body.
    pub fn region_for(&self, kind: NodeKind) -> Option<FloatRect> {
        match kind {
            NodeKind::Header => Some(self.header),
            NodeKind::Label => Some(self.label),
            NodeKind::CloseButton => Some(self.close),
            NodeKind::ConsoleBody | NodeKind::Output => Some(self.body),
            _ => None,
        }
    }
}
