//! Declarative node builder.
//!
//! ```
//! use term_console::dom::{Document, El, NodeKind};
//!
//! let mut doc = Document::default();
//! let root = doc.root();
//! let block = El::new(NodeKind::Block)
//!     .id("intro")
//!     .child(El::new(NodeKind::Paragraph).text("hello"))
//!     .mount(&mut doc, root);
//! assert_eq!(doc.get_by_id("intro"), Some(block));
//! ```

use super::{Document, NodeId, NodeKind};

#[derive(Debug, Clone)]
pub struct El {
    kind: NodeKind,
    id: Option<String>,
    classes: Vec<String>,
    text: Option<String>,
    children: Vec<El>,
}

impl El {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id: None,
            classes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: El) -> Self {
        self.children.push(child);
        self
    }

    /// Create the described subtree and append it to `parent`.
    pub fn mount(self, doc: &mut Document, parent: NodeId) -> NodeId {
        let id = doc.create(self.kind);
        if let Some(attr) = self.id {
            doc.set_id_attr(id, attr);
        }
        for class in &self.classes {
            doc.add_class(id, class);
        }
        if let Some(text) = self.text {
            doc.set_text(id, text);
        }
        doc.append_child(parent, id);
        for child in self.children {
            child.mount(doc, id);
        }
        id
    }
}
