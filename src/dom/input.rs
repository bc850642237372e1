//! Native editing behaviour of `Input` nodes: whatever the console does not
//! intercept lands here, the way a browser's text field handles it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{Document, NodeId};

/// Apply an editing key to the input node. Returns `true` when the key was
/// consumed.
pub fn edit(doc: &mut Document, input: NodeId, key: &KeyEvent) -> bool {
    let Some(node) = doc.node_mut(input) else {
        return false;
    };
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return false;
    }
    let len = node.text.chars().count();
    let caret = node.caret.min(len);
    match key.code {
        KeyCode::Char(ch) => {
            let at = byte_index(&node.text, caret);
            node.text.insert(at, ch);
            node.caret = caret + 1;
        }
        KeyCode::Backspace => {
            if caret == 0 {
                return true;
            }
            let at = byte_index(&node.text, caret - 1);
            node.text.remove(at);
            node.caret = caret - 1;
        }
        KeyCode::Delete => {
            if caret < len {
                let at = byte_index(&node.text, caret);
                node.text.remove(at);
            }
        }
        KeyCode::Left => node.caret = caret.saturating_sub(1),
        KeyCode::Right => node.caret = (caret + 1).min(len),
        KeyCode::Home => node.caret = 0,
        KeyCode::End => node.caret = len,
        _ => return false,
    }
    true
}

/// Insert pasted text at the caret. Line breaks collapse to spaces since the
/// field is single-line.
pub fn insert_text(doc: &mut Document, input: NodeId, text: &str) {
    let Some(node) = doc.node_mut(input) else {
        return;
    };
    let cleaned: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let caret = node.caret.min(node.text.chars().count());
    let at = byte_index(&node.text, caret);
    node.text.insert_str(at, &cleaned);
    node.caret = caret + cleaned.chars().count();
}

fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
