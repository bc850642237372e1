//! The console widget: panel construction, prompt handling and event
//! routing between the document, the command registry, history and the
//! placement/resize state machines.

use std::time::Instant;

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use tracing::{debug, warn};

use crate::commands::{CommandRegistry, Outcome};
use crate::constants::{
    BODY_ID, CLOSE_BUTTON_CLASS, DOUBLE_CLICK_WINDOW, DRAG_THRESHOLD, INPUT_ID, OUTPUT_ID,
    PANEL_CLASS, PROMPT,
};
use crate::dom::{
    self, Document, El, EventTarget, EventType, Handler, NodeId, NodeKind, PointerEvent,
};
use crate::error::ConsoleError;
use crate::history::HistoryNavigator;
use crate::keybindings::{Action, KeyBindings};
use crate::layout::{self, PanelRegions, flow::wrapped_line_count};
use crate::markup;
use crate::options::{Options, OptionsPatch};
use crate::placement::{PlacementController, PlacementTargets};
use crate::resize::PanelResizer;
use crate::theme::{self, ThemeTargets};

const LABEL_TEXT: &str = "Console";
const CLOSE_GLYPH: &str = "✕";

/// Every node of a mounted console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleNodes {
    pub container: NodeId,
    pub panel: NodeId,
    pub header: NodeId,
    pub label: NodeId,
    pub close: NodeId,
    pub body: NodeId,
    pub output: NodeId,
    pub prompt: NodeId,
    pub input: NodeId,
}

impl ConsoleNodes {
    fn locate(doc: &Document, container: NodeId) -> Result<Self, ConsoleError> {
        let panel = doc
            .query_class(container, PANEL_CLASS)
            .ok_or(ConsoleError::MissingTarget("panel root"))?;
        let find = |kind: NodeKind, name: &'static str| {
            doc.query_kind(panel, kind)
                .ok_or(ConsoleError::MissingTarget(name))
        };
        Ok(Self {
            container,
            panel,
            header: find(NodeKind::Header, "header")?,
            label: find(NodeKind::Label, "header label")?,
            close: doc
                .query_class(panel, CLOSE_BUTTON_CLASS)
                .ok_or(ConsoleError::MissingTarget("close button"))?,
            body: find(NodeKind::ConsoleBody, "console body")?,
            output: find(NodeKind::Output, "output area")?,
            prompt: find(NodeKind::Prompt, "prompt")?,
            input: find(NodeKind::Input, "input field")?,
        })
    }
}

/// Payload a listener handler receives.
#[derive(Debug, Clone, Copy)]
enum Payload {
    Pointer(PointerEvent),
    Key(KeyEvent),
}

#[derive(Debug, Clone, Copy)]
struct Press {
    node: Option<NodeId>,
    x: i32,
    y: i32,
}

#[derive(Debug)]
pub struct Console {
    document: Document,
    options: Options,
    nodes: ConsoleNodes,
    commands: CommandRegistry<Console>,
    history: HistoryNavigator,
    placement: PlacementController,
    resizer: PanelResizer,
    keybindings: KeyBindings,
    press: Option<Press>,
    last_click: Option<(NodeId, Instant)>,
}

impl Console {
    /// Mount a console into a fresh 80x24 document.
    pub fn new(host_id: Option<&str>, options: Option<OptionsPatch>) -> Result<Self, ConsoleError> {
        Self::mount(Document::default(), host_id, options)
    }

    /// Mount a console into `document`, inside the node whose id attribute is
    /// `host_id` when there is one (its children are replaced), otherwise in
    /// a new container appended to the document root.
    pub fn mount(
        mut document: Document,
        host_id: Option<&str>,
        options: Option<OptionsPatch>,
    ) -> Result<Self, ConsoleError> {
        let root = document.root();
        let container = match host_id.and_then(|id| document.get_by_id(id)) {
            Some(host) => {
                document.clear_children(host);
                host
            }
            None => {
                if let Some(id) = host_id {
                    debug!(host = id, "host not found, appending console to the document");
                }
                El::new(NodeKind::Block).mount(&mut document, root)
            }
        };
        panel_tree().mount(&mut document, container);
        let nodes = ConsoleNodes::locate(&document, container)?;

        let listeners = document.listeners_mut();
        listeners.subscribe(
            EventTarget::Node(nodes.close),
            EventType::Click,
            Handler::ClearConsole,
        );
        listeners.subscribe(
            EventTarget::Node(nodes.body),
            EventType::Click,
            Handler::FocusInput,
        );
        listeners.subscribe(
            EventTarget::Node(nodes.input),
            EventType::KeyDown,
            Handler::InputKeyDown,
        );
        document.focus(nodes.input);

        let mut console = Self {
            document,
            options: Options::merged(options),
            nodes,
            commands: CommandRegistry::new(),
            history: HistoryNavigator::new(),
            placement: PlacementController::new(PlacementTargets {
                panel: nodes.panel,
                header: nodes.header,
            }),
            resizer: PanelResizer::new(nodes.panel),
            keybindings: KeyBindings::default(),
            press: None,
            last_click: None,
        };
        console.apply_theme();
        console.placement.enable(&mut console.document);
        console.resizer.set_enabled(&mut console.document, true);
        console.register_builtins();
        debug!(theme = %console.options.theme, "console mounted");
        Ok(console)
    }

    fn register_builtins(&mut self) {
        self.commands.register("help", |console: &mut Console| {
            let names = console.commands.list_names().join(", ");
            console.append_to_console(&format!("Available commands: {}", markup::escape(&names)));
            Ok(())
        });
        self.commands.register("clear", |console: &mut Console| {
            console.clear();
            Ok(())
        });
    }

    pub fn add_command<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&mut Console) -> crate::commands::ActionResult + 'static,
    {
        self.commands.register(name, action);
    }

    /// Run a command as if it had been typed at the prompt, without echoing
    /// it or recording it in history. A failing action is reported in the
    /// output and counts as having run.
    pub fn execute(&mut self, name: &str) -> Outcome {
        match self.commands.resolve(name) {
            Some(action) => {
                if let Err(err) = action(self) {
                    warn!(command = name, error = %err, "command failed");
                    self.append_to_console(&markup::error(&format!(
                        "Command failed: {name}: {err}"
                    )));
                }
                Outcome::Ran
            }
            None => {
                self.append_to_console(&markup::error(&format!("Unknown command: {name}")));
                Outcome::Unknown
            }
        }
    }

    pub fn update_options(&mut self, patch: OptionsPatch) {
        let theme_changed = patch.theme.is_some();
        self.options.merge(patch);
        if theme_changed {
            self.apply_theme();
        } else {
            self.apply_fonts();
        }
        self.append_to_console("Options updated");
    }

    /// Append a line to the output log. `<error>…</error>` spans render as
    /// errors; use `markup::escape` for text that must show up literally.
    pub fn append_to_console(&mut self, line: &str) {
        let output = self.nodes.output;
        if !self.document.contains(output) {
            warn!("output area is missing, dropping line");
            return;
        }
        El::new(NodeKind::OutputLine)
            .text(line)
            .mount(&mut self.document, output);
    }

    /// Empty the output and the input field and stop history navigation.
    /// The history itself is kept.
    pub fn clear(&mut self) {
        self.document.clear_children(self.nodes.output);
        self.document.set_text(self.nodes.input, "");
        self.document.set_scroll_top(self.nodes.body, 0);
        self.history.reset();
    }

    pub fn toggle_draggable(&mut self, enabled: Option<bool>) {
        let enabled = enabled.unwrap_or(!self.placement.is_enabled());
        self.placement.set_enabled(&mut self.document, enabled);
    }

    pub fn toggle_resizable(&mut self, enabled: Option<bool>) {
        let enabled = enabled.unwrap_or(!self.resizer.is_enabled());
        self.resizer.set_enabled(&mut self.document, enabled);
    }

    /// The four nodes the theme paints, if they are all still mounted.
    pub fn targets(&self) -> Result<ThemeTargets, ConsoleError> {
        let nodes = ConsoleNodes::locate(&self.document, self.nodes.container)?;
        Ok(ThemeTargets {
            root: nodes.panel,
            output_area: nodes.body,
            input: nodes.input,
            label: nodes.label,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn nodes(&self) -> ConsoleNodes {
        self.nodes
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn history(&self) -> &HistoryNavigator {
        &self.history
    }

    pub fn commands(&self) -> &CommandRegistry<Console> {
        &self.commands
    }

    pub fn placement(&self) -> &PlacementController {
        &self.placement
    }

    pub fn is_draggable(&self) -> bool {
        self.placement.is_enabled()
    }

    pub fn is_resizable(&self) -> bool {
        self.resizer.is_enabled()
    }

    pub fn is_resizing(&self) -> bool {
        self.resizer.is_resizing()
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    pub fn input_value(&self) -> &str {
        self.document.text(self.nodes.input)
    }

    pub fn input_focused(&self) -> bool {
        self.document.focused() == Some(self.nodes.input)
    }

    /// Raw markup of every output line, oldest first.
    pub fn output_lines(&self) -> Vec<&str> {
        self.document
            .children(self.nodes.output)
            .iter()
            .map(|&id| self.document.text(id))
            .collect()
    }

    /// Output lines with markup stripped.
    pub fn output_text(&self) -> Vec<String> {
        self.output_lines()
            .into_iter()
            .map(markup::plain_text)
            .collect()
    }

    /// Advance time-based state (the reset easing).
    pub fn tick(&mut self, now: Instant) {
        self.placement.tick(&mut self.document, now);
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        self.handle_event_at(event, Instant::now())
    }

    /// Route a terminal event. Returns `true` when the console consumed it.
    pub fn handle_event_at(&mut self, event: &Event, now: Instant) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                match self.document.focused() {
                    Some(focused) => {
                        self.dispatch(Some(focused), EventType::KeyDown, Payload::Key(*key), now)
                    }
                    None => false,
                }
            }
            Event::Paste(text) if self.input_focused() => {
                dom::input::insert_text(&mut self.document, self.nodes.input, text);
                true
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            Event::Resize(width, height) => {
                self.document.set_viewport(*width, *height);
                true
            }
            _ => false,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, now: Instant) -> bool {
        let ev = PointerEvent::from(mouse);
        let map = layout::compute(&self.document);
        let hit = layout::hit_test(&self.document, &map, ev.x, ev.y);
        let in_panel = hit.is_some_and(|id| self.document.is_ancestor(self.nodes.panel, id));
        match mouse.kind {
            MouseEventKind::Down(_) => {
                if self.resizer.pointer_down(&self.document, &ev) {
                    return true;
                }
                if hit != Some(self.nodes.input) {
                    self.document.blur();
                }
                self.press = Some(Press {
                    node: hit,
                    x: ev.x,
                    y: ev.y,
                });
                let handled = self.dispatch(hit, EventType::PointerDown, Payload::Pointer(ev), now);
                handled || in_panel
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                if self.resizer.pointer_move(&mut self.document, &ev) {
                    return true;
                }
                self.dispatch(hit, EventType::PointerMove, Payload::Pointer(ev), now)
            }
            MouseEventKind::Up(_) => {
                if self.resizer.pointer_up() {
                    return true;
                }
                let mut handled = self.dispatch(hit, EventType::PointerUp, Payload::Pointer(ev), now);
                if let Some(press) = self.press.take()
                    && let Some(node) = hit
                    && press.node == Some(node)
                {
                    handled |= self.dispatch(Some(node), EventType::Click, Payload::Pointer(ev), now);
                    let still = (ev.x - press.x).abs() < DRAG_THRESHOLD
                        && (ev.y - press.y).abs() < DRAG_THRESHOLD;
                    handled |= self.register_click(node, still, ev, now);
                }
                handled || in_panel
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if !in_panel {
                    return false;
                }
                let delta = if mouse.kind == MouseEventKind::ScrollUp {
                    -1
                } else {
                    1
                };
                self.scroll_body(delta);
                true
            }
            _ => in_panel,
        }
    }

    fn register_click(&mut self, node: NodeId, still: bool, ev: PointerEvent, now: Instant) -> bool {
        if !still {
            self.last_click = None;
            return false;
        }
        match self.last_click {
            Some((previous, at))
                if previous == node && now.saturating_duration_since(at) <= DOUBLE_CLICK_WINDOW =>
            {
                self.last_click = None;
                self.dispatch(Some(node), EventType::DoubleClick, Payload::Pointer(ev), now)
            }
            _ => {
                self.last_click = Some((node, now));
                false
            }
        }
    }

    /// Run the listeners for `event` on `target` and its ancestors, then on
    /// the document. Each registration runs once, duplicates included.
    fn dispatch(&mut self, target: Option<NodeId>, event: EventType, payload: Payload, now: Instant) -> bool {
        let mut path: Vec<EventTarget> = target
            .map(|id| self.document.ancestors(id))
            .unwrap_or_default()
            .into_iter()
            .map(EventTarget::Node)
            .collect();
        path.push(EventTarget::Document);
        let mut handled = false;
        for target in path {
            for handler in self.document.listeners().handlers(target, event) {
                handled |= self.run_handler(handler, payload, now);
            }
        }
        handled
    }

    fn run_handler(&mut self, handler: Handler, payload: Payload, now: Instant) -> bool {
        match (handler, payload) {
            (Handler::DragStart, Payload::Pointer(ev)) => self.placement.pointer_down(&ev),
            (Handler::DragMove, Payload::Pointer(ev)) => {
                self.placement.pointer_move(&mut self.document, &ev)
            }
            (Handler::DragEnd, Payload::Pointer(_)) => self.placement.pointer_up(&mut self.document),
            (Handler::ResetPlacement, _) => {
                self.placement.reset(&mut self.document, now);
                true
            }
            (Handler::ClearConsole, _) => {
                self.clear();
                true
            }
            (Handler::FocusInput, _) => {
                self.document.focus(self.nodes.input);
                true
            }
            (Handler::InputKeyDown, Payload::Key(key)) => self.input_key(&key),
            _ => false,
        }
    }

    fn input_key(&mut self, key: &KeyEvent) -> bool {
        let input = self.nodes.input;
        match self.keybindings.action_among(&Action::CONSOLE, key) {
            Some(Action::ClearConsole) => self.clear(),
            Some(Action::ClearInput) => self.document.set_text(input, ""),
            Some(Action::ReleaseFocus) => self.document.blur(),
            Some(Action::Submit) => self.submit(),
            Some(Action::HistoryOlder) => {
                let shown = self.history.recall_older(self.document.text(input));
                self.document.set_text(input, shown);
            }
            Some(Action::HistoryNewer) => {
                let shown = self.history.recall_newer(self.document.text(input));
                self.document.set_text(input, shown);
            }
            Some(Action::Paste) => self.paste_from_clipboard(),
            Some(Action::Quit) | None => return dom::input::edit(&mut self.document, input, key),
        }
        true
    }

    fn submit(&mut self) {
        let line = self.input_value().trim().to_string();
        if line.is_empty() {
            return;
        }
        self.append_to_console(&format!("{PROMPT}{}", markup::escape(&line)));
        self.history.submit(&line);
        debug!(command = %line, "submitted");
        self.execute(&line);
        self.document.set_text(self.nodes.input, "");
        self.scroll_to_bottom();
    }

    fn paste_from_clipboard(&mut self) {
        match crate::clipboard::get() {
            Ok(text) => dom::input::insert_text(&mut self.document, self.nodes.input, &text),
            Err(err) => warn!(error = %err, "clipboard paste failed"),
        }
    }

    fn apply_theme(&mut self) {
        let targets = match self.targets() {
            Ok(targets) => targets,
            Err(err) => {
                warn!(error = %err, "theme not applied");
                return;
            }
        };
        // Placement and resize state live on the same node as the palette.
        let saved = self
            .document
            .style(targets.root)
            .cloned()
            .unwrap_or_default();
        if let Err(err) = theme::apply(&mut self.document, self.options.theme, &targets) {
            warn!(error = %err, "theme not applied");
            return;
        }
        if let Some(style) = self.document.style_mut(targets.root) {
            style.position = saved.position;
            style.left = saved.left;
            style.top = saved.top;
            style.z_index = saved.z_index;
            style.margin_top = saved.margin_top;
            style.margin_left = saved.margin_left;
            style.resize = saved.resize;
            style.transition = saved.transition;
        }
        self.apply_fonts();
    }

    fn apply_fonts(&mut self) {
        for id in [self.nodes.output, self.nodes.input] {
            if let Some(style) = self.document.style_mut(id) {
                style.font_size = Some(self.options.font_size.clone());
                style.font_family = Some(self.options.font_family.clone());
            }
        }
    }

    /// Rows the body scrolls over and rows it shows.
    fn body_metrics(&self) -> Option<(usize, usize)> {
        let map = layout::compute(&self.document);
        let panel = map.document_box(self.nodes.panel)?;
        let content = PanelRegions::for_rect(panel).body_content();
        let rows = body_rows(&self.document, self.nodes.output, content.width);
        Some((rows, usize::from(content.height)))
    }

    fn scroll_to_bottom(&mut self) {
        if let Some((rows, visible)) = self.body_metrics() {
            self.document
                .set_scroll_top(self.nodes.body, rows.saturating_sub(visible));
        }
    }

    fn scroll_body(&mut self, delta: isize) {
        let Some((rows, visible)) = self.body_metrics() else {
            return;
        };
        let max = rows.saturating_sub(visible);
        let current = self
            .document
            .node(self.nodes.body)
            .map(|n| n.scroll_top())
            .unwrap_or(0)
            .min(max);
        let next = current.saturating_add_signed(delta).min(max);
        self.document.set_scroll_top(self.nodes.body, next);
    }
}

fn panel_tree() -> El {
    El::new(NodeKind::Panel)
        .class(PANEL_CLASS)
        .child(
            El::new(NodeKind::Header)
                .child(El::new(NodeKind::Label).text(LABEL_TEXT))
                .child(
                    El::new(NodeKind::CloseButton)
                        .class(CLOSE_BUTTON_CLASS)
                        .text(CLOSE_GLYPH),
                ),
        )
        .child(
            El::new(NodeKind::ConsoleBody)
                .id(BODY_ID)
                .child(El::new(NodeKind::Output).id(OUTPUT_ID))
                .child(
                    El::new(NodeKind::Prompt)
                        .text(PROMPT)
                        .child(El::new(NodeKind::Input).id(INPUT_ID)),
                ),
        )
}

/// Rows the body content needs at `width` columns: every output line,
/// wrapped, followed by the prompt row.
pub(crate) fn body_rows(doc: &Document, output: NodeId, width: u16) -> usize {
    let lines: usize = doc
        .children(output)
        .iter()
        .map(|&id| usize::from(wrapped_line_count(&markup::plain_text(doc.text(id)), width).max(1)))
        .sum();
    lines + 1
}
