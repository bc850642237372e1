//! Pointer-driven placement of the console panel.
//!
//! The panel starts docked in normal document flow. Pressing on its header
//! and moving past `DRAG_THRESHOLD` detaches it: a same-sized placeholder
//! holds its slot in the flow while the panel floats in viewport
//! coordinates above everything else. Releasing drops it back into the
//! placeholder's slot as an absolutely positioned node, so it stays where it
//! was dropped and scrolls with the page. A double-click on the header puts
//! everything back the way it was at first enable.

use std::time::Instant;

use tracing::debug;

use crate::constants::{DRAG_THRESHOLD, FLOATING_Z_INDEX, PLACEHOLDER_CLASS, RESET_EASING};
use crate::dom::{
    Cursor, Document, EventTarget, EventType, Handler, ListenerId, NodeId, NodeKind,
    PointerEvent, Position,
};
use crate::layout::{bounding_box, flow::computed_margins};

/// The nodes placement acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementTargets {
    pub panel: NodeId,
    pub header: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatingSession {
    /// Pointer offset inside the panel at the press that started the drag.
    pub grab_x: i32,
    pub grab_y: i32,
    pub placeholder: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Docked,
    Floating(FloatingSession),
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start_x: i32,
    start_y: i32,
}

/// Margins the panel had when dragging was first enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InitialPlacement {
    margin_top: u16,
    margin_left: u16,
}

#[derive(Debug)]
pub struct PlacementController {
    targets: PlacementTargets,
    enabled: bool,
    listeners: Vec<ListenerId>,
    press: Option<Press>,
    placement: Placement,
    initial: Option<InitialPlacement>,
    easing_until: Option<Instant>,
}

impl PlacementController {
    pub fn new(targets: PlacementTargets) -> Self {
        Self {
            targets,
            enabled: false,
            listeners: Vec::new(),
            press: None,
            placement: Placement::Docked,
            initial: None,
            easing_until: None,
        }
    }

    pub fn targets(&self) -> PlacementTargets {
        self.targets
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.placement, Placement::Floating(_))
    }

    /// Whether a header press is being tracked.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Whether the reset easing is still running.
    pub fn is_easing(&self) -> bool {
        self.easing_until.is_some()
    }

    pub fn set_enabled(&mut self, doc: &mut Document, enabled: bool) {
        if enabled {
            self.enable(doc);
        } else {
            self.disable(doc);
        }
    }

    /// Attach the drag listener set. Calling this while already enabled
    /// replaces the set, so exactly one is ever registered.
    pub fn enable(&mut self, doc: &mut Document) {
        let PlacementTargets { panel, header } = self.targets;
        if !doc.contains(panel) || !doc.contains(header) {
            tracing::warn!("drag not enabled: console panel or header is missing");
            return;
        }
        if self.initial.is_none() {
            let (margin_top, margin_left) = computed_margins(doc, panel);
            self.initial = Some(InitialPlacement {
                margin_top,
                margin_left,
            });
        }
        self.detach_listeners(doc);
        let header_target = EventTarget::Node(header);
        let listeners = doc.listeners_mut();
        self.listeners = vec![
            listeners.subscribe(header_target, EventType::PointerDown, Handler::DragStart),
            listeners.subscribe(EventTarget::Document, EventType::PointerMove, Handler::DragMove),
            listeners.subscribe(EventTarget::Document, EventType::PointerUp, Handler::DragEnd),
            listeners.subscribe(header_target, EventType::DoubleClick, Handler::ResetPlacement),
        ];
        if let Some(style) = doc.style_mut(header) {
            style.cursor = Some(Cursor::Move);
        }
        self.enabled = true;
        debug!("drag enabled");
    }

    /// Remove the drag listener set. A panel that is floating at this point
    /// is dropped where it is first.
    pub fn disable(&mut self, doc: &mut Document) {
        if self.is_floating() {
            self.drop_panel(doc);
        }
        self.press = None;
        self.detach_listeners(doc);
        if let Some(style) = doc.style_mut(self.targets.header) {
            style.cursor = Some(Cursor::Default);
        }
        self.enabled = false;
        debug!("drag disabled");
    }

    fn detach_listeners(&mut self, doc: &mut Document) {
        for id in self.listeners.drain(..) {
            doc.listeners_mut().unsubscribe(id);
        }
    }

    pub fn pointer_down(&mut self, ev: &PointerEvent) -> bool {
        if !self.enabled || !ev.is_primary() {
            return false;
        }
        self.press = Some(Press {
            start_x: ev.x,
            start_y: ev.y,
        });
        true
    }

    pub fn pointer_move(&mut self, doc: &mut Document, ev: &PointerEvent) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(press) = self.press else {
            return false;
        };
        let session = match self.placement {
            Placement::Floating(session) => session,
            Placement::Docked => {
                let dx = ev.x - press.start_x;
                let dy = ev.y - press.start_y;
                if dx.abs() < DRAG_THRESHOLD && dy.abs() < DRAG_THRESHOLD {
                    return false;
                }
                match self.detach_panel(doc, press) {
                    Some(session) => session,
                    None => return false,
                }
            }
        };

        let panel = self.targets.panel;
        let Some(rect) = bounding_box(doc, panel) else {
            return false;
        };
        let viewport = doc.viewport();
        let max_x = i32::from(viewport.width) - i32::from(rect.width);
        let max_y = i32::from(viewport.height) - i32::from(rect.height);
        let x = (ev.x - session.grab_x).min(max_x).max(0);
        let y = (ev.y - session.grab_y).min(max_y).max(0);
        if let Some(style) = doc.style_mut(panel) {
            style.left = Some(x);
            style.top = Some(y);
        }
        true
    }

    pub fn pointer_up(&mut self, doc: &mut Document) -> bool {
        if self.press.take().is_none() {
            return false;
        }
        if self.is_floating() {
            self.drop_panel(doc);
        }
        true
    }

    /// Put the panel back into flow with the margins it had when dragging was
    /// first enabled, easing the change for `RESET_EASING`.
    pub fn reset(&mut self, doc: &mut Document, now: Instant) {
        let panel = self.targets.panel;
        if !doc.contains(panel) {
            return;
        }
        if let Some(placeholder) = doc.query_class(doc.root(), PLACEHOLDER_CLASS)
            && let Some(parent) = doc.parent(placeholder)
        {
            doc.insert_before(parent, panel, placeholder);
            doc.remove(placeholder);
        }
        let initial = self.initial;
        if let Some(style) = doc.style_mut(panel) {
            style.transition = Some(RESET_EASING);
            style.position = Some(Position::Static);
            style.left = None;
            style.top = None;
            style.width = None;
            style.height = None;
            style.z_index = None;
            if let Some(initial) = initial {
                style.margin_top = Some(initial.margin_top);
                style.margin_left = Some(initial.margin_left);
            }
        }
        self.placement = Placement::Docked;
        self.press = None;
        self.easing_until = Some(now + RESET_EASING);
        debug!("panel placement reset");
    }

    /// Clear the reset easing once its deadline has passed.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        let Some(deadline) = self.easing_until else {
            return;
        };
        if now < deadline {
            return;
        }
        if let Some(style) = doc.style_mut(self.targets.panel) {
            style.transition = None;
        }
        self.easing_until = None;
    }

    fn detach_panel(&mut self, doc: &mut Document, press: Press) -> Option<FloatingSession> {
        let panel = self.targets.panel;
        let rect = bounding_box(doc, panel)?;
        let parent = doc.parent(panel)?;
        let (margin_top, margin_left) = computed_margins(doc, panel);

        let placeholder = doc.create(NodeKind::Placeholder);
        doc.add_class(placeholder, PLACEHOLDER_CLASS);
        if let Some(style) = doc.style_mut(placeholder) {
            style.width = Some(rect.width);
            style.height = Some(rect.height);
            style.margin_top = Some(margin_top);
            style.margin_left = Some(margin_left);
        }
        doc.insert_before(parent, placeholder, panel);

        if let Some(style) = doc.style_mut(panel) {
            style.position = Some(Position::Fixed);
            style.left = Some(rect.x);
            style.top = Some(rect.y);
            style.width = Some(rect.width);
            style.z_index = Some(FLOATING_Z_INDEX);
            style.zero_margin();
        }
        let root = doc.root();
        doc.append_child(root, panel);

        let session = FloatingSession {
            grab_x: press.start_x - rect.x,
            grab_y: press.start_y - rect.y,
            placeholder,
        };
        self.placement = Placement::Floating(session);
        debug!(x = rect.x, y = rect.y, "panel detached");
        Some(session)
    }

    /// Move a floating panel into its placeholder's slot as an absolutely
    /// positioned node at the same on-screen spot.
    fn drop_panel(&mut self, doc: &mut Document) {
        let Placement::Floating(session) = self.placement else {
            return;
        };
        self.placement = Placement::Docked;
        let panel = self.targets.panel;
        let Some(rect) = bounding_box(doc, panel) else {
            return;
        };
        if let Some(parent) = doc.parent(session.placeholder) {
            doc.insert_before(parent, panel, session.placeholder);
        }
        doc.remove(session.placeholder);

        let (scroll_x, scroll_y) = doc.scroll_offset();
        if let Some(style) = doc.style_mut(panel) {
            style.position = Some(Position::Absolute);
            style.left = Some(rect.x + i32::from(scroll_x));
            style.top = Some(rect.y + i32::from(scroll_y));
            style.width = Some(rect.width);
            style.z_index = Some(FLOATING_Z_INDEX);
            style.zero_margin();
        }
        debug!(x = rect.x, y = rect.y, "panel dropped");
    }
}
