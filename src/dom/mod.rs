//! A small document model: an arena of typed UI nodes.
//!
//! The console never builds markup strings. It mounts a tree of typed nodes
//! into a `Document`, queries them back by kind, id or marker class, and
//! mutates their inline styles. The flow layout (`crate::layout::flow`) and
//! the terminal renderer read the same tree.

pub mod builder;
pub mod events;
pub mod input;
pub mod style;

use std::collections::BTreeSet;

pub use builder::El;
pub use events::{
    EventTarget, EventType, Handler, ListenerId, ListenerTable, PointerButton, PointerEvent,
};
pub use style::{Cursor, InlineStyle, Paint, Position, ResizeMode, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document root; block children flow from the top of the page.
    Document,
    Block,
    Paragraph,
    Placeholder,
    Panel,
    Header,
    Label,
    CloseButton,
    ConsoleBody,
    Output,
    OutputLine,
    Prompt,
    Input,
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    id_attr: Option<String>,
    classes: BTreeSet<String>,
    style: InlineStyle,
    text: String,
    caret: usize,
    scroll_top: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id_attr: None,
            classes: BTreeSet::new(),
            style: InlineStyle::default(),
            text: String::new(),
            caret: 0,
            scroll_top: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn id_attr(&self) -> Option<&str> {
        self.id_attr.as_deref()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut InlineStyle {
        &mut self.style
    }

    /// Text content; for `Input` nodes this is the field's value.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position of an `Input` node, in chars.
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Viewport size in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    /// Slots freed by `remove`, reused by `create`.
    free: Vec<usize>,
    root: NodeId,
    viewport: Viewport,
    scroll_x: u16,
    scroll_y: u16,
    focused: Option<NodeId>,
    listeners: ListenerTable,
}

impl Document {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            nodes: vec![Some(Node::new(NodeKind::Document))],
            free: Vec::new(),
            root: NodeId(0),
            viewport: Viewport { width, height },
            scroll_x: 0,
            scroll_y: 0,
            focused: None,
            listeners: ListenerTable::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached node, reusing a freed slot when there is one.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = Some(Node::new(kind));
            return NodeId(slot);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(kind)));
        id
    }

    /// Slots in the arena, live or free.
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes currently alive, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(Node::kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Detach `child` from wherever it is and append it to `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        true
    }

    /// Insert `child` into `parent` right before `reference`. Falls back to
    /// appending when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> bool {
        if child == reference {
            return self.parent(child) == Some(parent);
        }
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        let Some(node) = self.node_mut(parent) else {
            return false;
        };
        match node.children.iter().position(|&c| c == reference) {
            Some(idx) => node.children.insert(idx, child),
            None => node.children.push(child),
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        true
    }

    /// Unlink a node from its parent, keeping it (and its subtree) alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Detach and free a node with its whole subtree. Listeners that target
    /// freed nodes are dropped with them. Freed ids are handed out again by
    /// `create`, so callers must not hold on to them.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) else {
                continue;
            };
            stack.extend(node.children);
            self.free.push(current.0);
            self.listeners.drop_target(current);
            if self.focused == Some(current) {
                self.focused = None;
            }
        }
    }

    /// Remove every child of `id` (the `innerHTML = ""` of this model).
    pub fn clear_children(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let idx = siblings.iter().position(|&c| c == id)?;
        siblings.get(idx + 1).copied()
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.contains(id).then_some(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Depth-first pre-order walk of the subtree rooted at `from`.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if !self.contains(id) {
                continue;
            }
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn find(&self, from: NodeId, pred: impl Fn(&Node) -> bool) -> Option<NodeId> {
        self.descendants(from)
            .into_iter()
            .find(|&id| self.node(id).is_some_and(&pred))
    }

    pub fn get_by_id(&self, id_attr: &str) -> Option<NodeId> {
        self.find(self.root, |n| n.id_attr() == Some(id_attr))
    }

    pub fn query_class(&self, from: NodeId, class: &str) -> Option<NodeId> {
        self.find(from, |n| n.has_class(class))
    }

    pub fn query_kind(&self, from: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.find(from, |n| n.kind() == kind)
    }

    pub fn set_id_attr(&mut self, id: NodeId, value: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.id_attr = Some(value.into());
        }
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            node.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            node.classes.remove(class);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|n| n.has_class(class))
    }

    pub fn style(&self, id: NodeId) -> Option<&InlineStyle> {
        self.node(id).map(Node::style)
    }

    pub fn style_mut(&mut self, id: NodeId) -> Option<&mut InlineStyle> {
        self.node_mut(id).map(Node::style_mut)
    }

    /// Drop every inline style property from `id`.
    pub fn clear_style(&mut self, id: NodeId) {
        if let Some(style) = self.style_mut(id) {
            *style = InlineStyle::default();
        }
    }

    pub fn text(&self, id: NodeId) -> &str {
        self.node(id).map(Node::text).unwrap_or("")
    }

    /// Replace text content. The caret follows to the end of the new text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.text = text.into();
            node.caret = node.text.chars().count();
        }
    }

    pub fn set_scroll_top(&mut self, id: NodeId, value: usize) {
        if let Some(node) = self.node_mut(id) {
            node.scroll_top = value;
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = Viewport { width, height };
    }

    /// Document scroll offsets (`scrollX`, `scrollY`).
    pub fn scroll_offset(&self) -> (u16, u16) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn set_scroll_offset(&mut self, x: u16, y: u16) {
        self.scroll_x = x;
        self.scroll_y = y;
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn focus(&mut self, id: NodeId) {
        if self.contains(id) {
            self.focused = Some(id);
        }
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn listeners(&self) -> &ListenerTable {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerTable {
        &mut self.listeners
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_three_blocks() -> (Document, [NodeId; 3]) {
        let mut doc = Document::default();
        let root = doc.root();
        let a = doc.create(NodeKind::Block);
        let b = doc.create(NodeKind::Block);
        let c = doc.create(NodeKind::Block);
        for id in [a, b, c] {
            doc.append_child(root, id);
        }
        (doc, [a, b, c])
    }

    #[test]
    fn insert_before_moves_existing_child() {
        let (mut doc, [a, b, c]) = doc_with_three_blocks();
        let root = doc.root();
        assert!(doc.insert_before(root, c, a));
        assert_eq!(doc.children(root), &[c, a, b]);
        assert_eq!(doc.next_sibling(c), Some(a));
    }

    #[test]
    fn remove_frees_subtree_and_its_listeners() {
        let (mut doc, [a, _, _]) = doc_with_three_blocks();
        let inner = doc.create(NodeKind::Paragraph);
        doc.append_child(a, inner);
        doc.listeners_mut().subscribe(
            EventTarget::Node(inner),
            EventType::Click,
            Handler::FocusInput,
        );
        doc.focus(inner);
        doc.remove(a);
        assert!(!doc.contains(a));
        assert!(!doc.contains(inner));
        assert!(doc.listeners().is_empty());
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn freed_slots_are_reused() {
        let (mut doc, [a, _, _]) = doc_with_three_blocks();
        let inner = doc.create(NodeKind::Paragraph);
        doc.append_child(a, inner);
        let slots = doc.slot_count();
        doc.remove(a);
        assert_eq!(doc.node_count(), slots - 2);

        let first = doc.create(NodeKind::OutputLine);
        let second = doc.create(NodeKind::OutputLine);
        assert_eq!(doc.slot_count(), slots);
        assert!(doc.contains(first) && doc.contains(second));
        assert_eq!(doc.kind(first), Some(NodeKind::OutputLine));
        assert_eq!(doc.parent(first), None);
        assert!(doc.children(second).is_empty());
        doc.create(NodeKind::OutputLine);
        assert_eq!(doc.slot_count(), slots + 1);
    }

    #[test]
    fn cannot_append_node_into_its_own_subtree() {
        let (mut doc, [a, _, _]) = doc_with_three_blocks();
        let inner = doc.create(NodeKind::Block);
        doc.append_child(a, inner);
        assert!(!doc.append_child(inner, a));
    }

    #[test]
    fn queries_find_by_id_class_and_kind() {
        let (mut doc, [_, b, _]) = doc_with_three_blocks();
        doc.set_id_attr(b, "host");
        doc.add_class(b, "marker");
        let root = doc.root();
        assert_eq!(doc.get_by_id("host"), Some(b));
        assert_eq!(doc.query_class(root, "marker"), Some(b));
        assert_eq!(doc.query_kind(root, NodeKind::Block), doc.children(root).first().copied());
        doc.remove_class(b, "marker");
        assert_eq!(doc.query_class(root, "marker"), None);
    }

    #[test]
    fn set_text_moves_caret_to_end() {
        let mut doc = Document::default();
        let input = doc.create(NodeKind::Input);
        doc.set_text(input, "héllo");
        assert_eq!(doc.node(input).map(Node::caret), Some(5));
    }
}
