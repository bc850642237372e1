//! Event subscription table for the document.
//!
//! Listeners are plain data: a target, an event type and the handler the
//! console should run. Dispatch walks the table, so registering the same
//! handler twice really does run it twice per event.

use crossterm::event::{MouseButton, MouseEvent};

use super::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    PointerDown,
    PointerMove,
    PointerUp,
    Click,
    DoubleClick,
    KeyDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Document,
    Node(NodeId),
}

/// Work a listener performs when its event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    DragStart,
    DragMove,
    DragEnd,
    ResetPlacement,
    ClearConsole,
    FocusInput,
    InputKeyDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

impl From<MouseButton> for PointerButton {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Auxiliary,
        }
    }
}

/// Pointer position in viewport cells plus the button that changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub x: i32,
    pub y: i32,
    pub button: Option<PointerButton>,
}

impl PointerEvent {
    pub fn new(x: i32, y: i32, button: Option<PointerButton>) -> Self {
        Self { x, y, button }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self.button, None | Some(PointerButton::Primary))
    }
}

impl From<&MouseEvent> for PointerEvent {
    fn from(mouse: &MouseEvent) -> Self {
        use crossterm::event::MouseEventKind;
        let button = match mouse.kind {
            MouseEventKind::Down(b) | MouseEventKind::Up(b) | MouseEventKind::Drag(b) => {
                Some(PointerButton::from(b))
            }
            _ => None,
        };
        Self::new(i32::from(mouse.column), i32::from(mouse.row), button)
    }
}

#[derive(Debug, Clone, Copy)]
struct Listener {
    id: ListenerId,
    target: EventTarget,
    event: EventType,
    handler: Handler,
}

#[derive(Debug, Default)]
pub struct ListenerTable {
    next_id: u64,
    entries: Vec<Listener>,
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, target: EventTarget, event: EventType, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Listener {
            id,
            target,
            event,
            handler,
        });
        id
    }

    /// Returns `false` when the listener was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|l| l.id != id);
        self.entries.len() != before
    }

    /// Handlers registered for `event` on `target`, in registration order.
    pub fn handlers(&self, target: EventTarget, event: EventType) -> Vec<Handler> {
        self.entries
            .iter()
            .filter(|l| l.target == target && l.event == event)
            .map(|l| l.handler)
            .collect()
    }

    pub fn count(&self, target: EventTarget, event: EventType) -> usize {
        self.entries
            .iter()
            .filter(|l| l.target == target && l.event == event)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn drop_target(&mut self, node: NodeId) {
        self.entries.retain(|l| l.target != EventTarget::Node(node));
    }
}
