//! Block flow layout over the document arena.
//!
//! Static nodes stack vertically inside their parent's content box. Absolute
//! nodes are placed at `left`/`top` in document coordinates and fixed nodes
//! at `left`/`top` in viewport coordinates; neither consumes flow space.
//! All boxes in a `LayoutMap` are in document coordinates; `bounding_box`
//! translates them into the viewport using the document scroll offsets.

use std::collections::HashMap;

use super::FloatRect;
use super::panel::PanelRegions;
use crate::constants::{PANEL_DEFAULT_HEIGHT, PANEL_MARGIN_LEFT, PANEL_MARGIN_TOP};
use crate::dom::{Document, NodeId, NodeKind, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PaintKey {
    z: i32,
    positioned: bool,
    seq: usize,
}

#[derive(Debug, Default)]
pub struct LayoutMap {
    boxes: HashMap<NodeId, FloatRect>,
    paint: Vec<(PaintKey, NodeId)>,
    content_height: u16,
    scroll: (u16, u16),
}

impl LayoutMap {
    /// Box of `id` in document coordinates.
    pub fn document_box(&self, id: NodeId) -> Option<FloatRect> {
        self.boxes.get(&id).copied()
    }

    /// Box of `id` in viewport coordinates.
    pub fn viewport_box(&self, id: NodeId) -> Option<FloatRect> {
        let (sx, sy) = self.scroll;
        self.document_box(id)
            .map(|b| b.translate(-i32::from(sx), -i32::from(sy)))
    }

    /// Nodes back to front.
    pub fn paint_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.paint.iter().map(|(_, id)| *id)
    }

    /// Height of the in-flow content of the document.
    pub fn content_height(&self) -> u16 {
        self.content_height
    }
}

/// Default margins of a node kind when none are set inline.
pub fn computed_margins(doc: &Document, id: NodeId) -> (u16, u16) {
    let Some(node) = doc.node(id) else {
        return (0, 0);
    };
    let (top, left) = match node.kind() {
        NodeKind::Panel => (PANEL_MARGIN_TOP, PANEL_MARGIN_LEFT),
        _ => (0, 0),
    };
    let style = node.style();
    (
        style.margin_top.unwrap_or(top),
        style.margin_left.unwrap_or(left),
    )
}

pub fn compute(doc: &Document) -> LayoutMap {
    let viewport = doc.viewport();
    let mut cx = FlowContext {
        doc,
        map: LayoutMap {
            scroll: doc.scroll_offset(),
            ..LayoutMap::default()
        },
        seq: 0,
    };
    let root = doc.root();
    let root_key = cx.next_key(0, false);
    let height = cx.layout_children(root, 0, 0, viewport.width, root_key);
    cx.map.content_height = height;
    cx.map.boxes.insert(
        root,
        FloatRect::new(0, 0, viewport.width, height.max(viewport.height)),
    );
    cx.map.paint.push((root_key, root));
    cx.map.paint.sort_by_key(|(key, _)| *key);
    cx.map
}

/// Viewport-relative bounding box of `id` (`getBoundingClientRect`).
pub fn bounding_box(doc: &Document, id: NodeId) -> Option<FloatRect> {
    compute(doc).viewport_box(id)
}

/// Top-most node under the viewport cell `(x, y)`.
pub fn hit_test(doc: &Document, map: &LayoutMap, x: i32, y: i32) -> Option<NodeId> {
    let hits: Vec<NodeId> = map.paint_order().collect();
    hits.into_iter().rev().find(|&id| {
        doc.kind(id) != Some(NodeKind::Placeholder)
            && map.viewport_box(id).is_some_and(|b| b.contains(x, y))
    })
}

struct FlowContext<'a> {
    doc: &'a Document,
    map: LayoutMap,
    seq: usize,
}

impl FlowContext<'_> {
    fn next_key(&mut self, z: i32, positioned: bool) -> PaintKey {
        let key = PaintKey {
            z,
            positioned,
            seq: self.seq,
        };
        self.seq += 1;
        key
    }

    /// Lay out the children of `parent` inside a content box starting at
    /// `(x, y)` that is `width` wide. Returns the flow height consumed.
    fn layout_children(&mut self, parent: NodeId, x: i32, y: i32, width: u16, inherited: PaintKey) -> u16 {
        let doc = self.doc;
        let (scroll_x, scroll_y) = doc.scroll_offset();
        let mut cursor = y;
        for &child in doc.children(parent) {
            let Some(node) = doc.node(child) else {
                continue;
            };
            let style = node.style();
            let (margin_top, margin_left) = computed_margins(doc, child);
            let static_x = x + i32::from(margin_left);
            let static_y = cursor + i32::from(margin_top);
            let box_width = style
                .width
                .unwrap_or_else(|| width.saturating_sub(margin_left));
            match style.position() {
                Position::Static => {
                    let key = self.next_key(inherited.z, inherited.positioned);
                    let height = self.layout_node(child, static_x, static_y, box_width, key);
                    cursor = static_y + i32::from(height);
                }
                Position::Absolute | Position::Fixed => {
                    let (offset_x, offset_y) = if style.position() == Position::Fixed {
                        (i32::from(scroll_x), i32::from(scroll_y))
                    } else {
                        (0, 0)
                    };
                    let bx = style.left.map_or(static_x, |left| left + offset_x);
                    let by = style.top.map_or(static_y, |top| top + offset_y);
                    let key = self.next_key(style.z_index.unwrap_or(0), true);
                    self.layout_node(child, bx, by, box_width, key);
                }
            }
        }
        (cursor - y).max(0) as u16
    }

    fn layout_node(&mut self, id: NodeId, x: i32, y: i32, width: u16, key: PaintKey) -> u16 {
        let doc = self.doc;
        let Some(node) = doc.node(id) else {
            return 0;
        };
        self.map.paint.push((key, id));
        let explicit = node.style().height;
        let height = match node.kind() {
            NodeKind::Panel => {
                let height = explicit.unwrap_or(PANEL_DEFAULT_HEIGHT);
                let rect = FloatRect::new(x, y, width, height);
                self.layout_panel(id, rect, key);
                height
            }
            NodeKind::Paragraph => {
                let flowed = self.layout_children(id, x, y, width, key);
                explicit.unwrap_or_else(|| wrapped_line_count(node.text(), width).max(flowed))
            }
            NodeKind::Placeholder => {
                let flowed = self.layout_children(id, x, y, width, key);
                explicit.unwrap_or(flowed)
            }
            _ => {
                let flowed = self.layout_children(id, x, y, width, key);
                explicit.unwrap_or(flowed)
            }
        };
        self.map.boxes.insert(id, FloatRect::new(x, y, width, height));
        height
    }

    /// Panel internals have a fixed structure; their boxes come from
    /// `PanelRegions` rather than from block flow.
    fn layout_panel(&mut self, panel: NodeId, rect: FloatRect, key: PaintKey) {
        let doc = self.doc;
        let regions = PanelRegions::for_rect(rect);
        for id in doc.descendants(panel).into_iter().skip(1) {
            let Some(kind) = doc.kind(id) else {
                continue;
            };
            let Some(region) = regions.region_for(kind) else {
                continue;
            };
            let child_key = self.next_key(key.z, key.positioned);
            self.map.paint.push((child_key, id));
            self.map.boxes.insert(id, region);
        }
    }
}

/// Rows a paragraph needs when wrapped at `width` columns.
pub fn wrapped_line_count(text: &str, width: u16) -> u16 {
    if text.is_empty() {
        return 0;
    }
    let width = width.max(1) as usize;
    text.split('\n')
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{El, InlineStyle};

    fn page() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new(40, 10);
        let root = doc.root();
        let intro = El::new(NodeKind::Paragraph)
            .text("intro line")
            .mount(&mut doc, root);
        let panel = El::new(NodeKind::Panel).mount(&mut doc, root);
        let outro = El::new(NodeKind::Paragraph)
            .text("outro")
            .mount(&mut doc, root);
        (doc, intro, panel, outro)
    }

    #[test]
    fn static_blocks_stack_with_margins() {
        let (doc, intro, panel, outro) = page();
        let map = compute(&doc);
        assert_eq!(map.document_box(intro), Some(FloatRect::new(0, 0, 40, 1)));
        assert_eq!(
            map.document_box(panel),
            Some(FloatRect::new(
                i32::from(PANEL_MARGIN_LEFT),
                1 + i32::from(PANEL_MARGIN_TOP),
                40 - PANEL_MARGIN_LEFT,
                PANEL_DEFAULT_HEIGHT
            ))
        );
        let outro_box = map.document_box(outro).unwrap_or_default();
        assert_eq!(
            outro_box.y,
            1 + i32::from(PANEL_MARGIN_TOP) + i32::from(PANEL_DEFAULT_HEIGHT)
        );
    }

    #[test]
    fn fixed_nodes_leave_the_flow() {
        let (mut doc, _, panel, outro) = page();
        if let Some(style) = doc.style_mut(panel) {
            *style = InlineStyle {
                position: Some(Position::Fixed),
                left: Some(5),
                top: Some(2),
                ..InlineStyle::default()
            };
        }
        doc.set_scroll_offset(0, 3);
        let map = compute(&doc);
        assert_eq!(map.document_box(outro).map(|b| b.y), Some(1));
        let vb = map.viewport_box(panel).unwrap_or_default();
        assert_eq!((vb.x, vb.y), (5, 2));
    }

    #[test]
    fn hit_test_prefers_positioned_nodes() {
        let (mut doc, intro, panel, _) = page();
        if let Some(style) = doc.style_mut(panel) {
            style.position = Some(Position::Absolute);
            style.left = Some(0);
            style.top = Some(0);
            style.z_index = Some(10);
        }
        let map = compute(&doc);
        assert_eq!(hit_test(&doc, &map, 0, 0), Some(panel));
        doc.remove(panel);
        let map = compute(&doc);
        assert_eq!(hit_test(&doc, &map, 0, 0), Some(intro));
    }

    #[test]
    fn wrapped_line_count_handles_long_lines() {
        assert_eq!(wrapped_line_count("abcdef", 4), 2);
        assert_eq!(wrapped_line_count("a\n\nb", 4), 3);
        assert_eq!(wrapped_line_count("", 4), 0);
    }
}
