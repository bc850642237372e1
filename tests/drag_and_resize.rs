mod common;

use std::time::{Duration, Instant};

use common::{down, drag, header_point, mouse, panel_rect, submit, up};
use crossterm::event::MouseEventKind;
use term_console::dom::{EventTarget, EventType, NodeId, Position};
use term_console::layout::FloatRect;
use term_console::{Console, OptionsPatch, Theme};

fn panel_position(console: &Console) -> Position {
    console
        .document()
        .style(console.nodes().panel)
        .map(|s| s.position())
        .unwrap_or_default()
}

#[test]
fn dragging_past_the_threshold_moves_the_panel() {
    let mut console = Console::new(None, None).expect("mounts");
    let start = panel_rect(&console);
    let (x, y) = header_point(&console);
    let t0 = Instant::now();

    console.handle_event_at(&down(x, y), t0);
    console.handle_event_at(&drag(x, y + 5), t0);
    assert!(console.placement().is_floating());
    console.handle_event_at(&up(x, y + 5), t0);

    assert!(!console.placement().is_floating());
    assert_eq!(panel_position(&console), Position::Absolute);
    let dropped = panel_rect(&console);
    assert_eq!((dropped.x, dropped.y), (start.x, start.y + 5));
    assert!(
        console
            .document()
            .query_class(console.document().root(), "sconsole-placeholder")
            .is_none()
    );
}

#[test]
fn small_wiggles_leave_the_panel_docked() {
    let mut console = Console::new(None, None).expect("mounts");
    let start = panel_rect(&console);
    let (x, y) = header_point(&console);
    let t0 = Instant::now();
    console.handle_event_at(&down(x, y), t0);
    console.handle_event_at(&drag(x + 1, y + 1), t0);
    console.handle_event_at(&up(x + 1, y + 1), t0);
    assert_eq!(panel_position(&console), Position::Static);
    assert_eq!(panel_rect(&console), start);
}

#[test]
fn double_click_on_header_resets_placement() {
    let mut console = Console::new(None, None).expect("mounts");
    let start = panel_rect(&console);
    let (x, y) = header_point(&console);
    let t0 = Instant::now();
    console.handle_event_at(&down(x, y), t0);
    console.handle_event_at(&drag(x, y + 6), t0);
    console.handle_event_at(&up(x, y + 6), t0);
    assert_ne!(panel_rect(&console), start);

    let (x, y) = header_point(&console);
    let t1 = t0 + Duration::from_secs(2);
    for at in [t1, t1 + Duration::from_millis(120)] {
        console.handle_event_at(&down(x, y), at);
        console.handle_event_at(&up(x, y), at);
    }
    assert_eq!(panel_position(&console), Position::Static);
    assert_eq!(panel_rect(&console), start);
    assert!(console.placement().is_easing());

    console.tick(t1 + Duration::from_secs(1));
    assert!(!console.placement().is_easing());
    let style = console.document().style(console.nodes().panel).cloned();
    assert_eq!(style.and_then(|s| s.transition), None);
}

#[test]
fn panel_tracks_the_pointer_cell_by_cell() {
    let mut console = Console::new(None, None).expect("mounts");
    let start = panel_rect(&console);
    let (x, y) = header_point(&console);
    let t0 = Instant::now();
    console.handle_event_at(&down(x, y), t0);
    for row in 1..=6 {
        console.handle_event_at(&drag(x, y + row), t0);
    }
    assert_eq!(panel_rect(&console).y, start.y + 6);
    console.handle_event_at(&up(x, y + 6), t0);
    let dropped = panel_rect(&console);
    assert_eq!((dropped.x, dropped.y), (start.x, start.y + 6));
    assert_eq!(header_point(&console), (x, y + 6));
}

#[test]
fn slow_clicks_do_not_reset() {
    let mut console = Console::new(None, None).expect("mounts");
    let start = panel_rect(&console);
    let (x, y) = header_point(&console);
    let t0 = Instant::now();
    console.handle_event_at(&down(x, y), t0);
    console.handle_event_at(&drag(x, y + 6), t0);
    console.handle_event_at(&up(x, y + 6), t0);
    let moved = panel_rect(&console);
    assert_ne!(moved, start);
    assert_eq!(panel_position(&console), Position::Absolute);

    let (x, y) = header_point(&console);
    let t1 = t0 + Duration::from_secs(2);
    for at in [t1, t1 + Duration::from_secs(1)] {
        console.handle_event_at(&down(x, y), at);
        console.handle_event_at(&up(x, y), at);
    }
    assert_eq!(panel_position(&console), Position::Absolute);
    assert_eq!(panel_rect(&console), moved);
}

#[test]
fn font_update_leaves_a_dropped_panel_alone() {
    let mut console = Console::new(None, None).expect("mounts");
    let (x, y) = header_point(&console);
    let t0 = Instant::now();
    console.handle_event_at(&down(x, y), t0);
    console.handle_event_at(&drag(x + 4, y + 5), t0);
    console.handle_event_at(&up(x + 4, y + 5), t0);

    let nodes = console.nodes();
    let style_of = |console: &Console, id: NodeId| {
        console.document().style(id).cloned().unwrap_or_default()
    };
    let panel_before = style_of(&console, nodes.panel);
    assert_eq!(panel_before.position, Some(Position::Absolute));
    assert!(panel_before.left.is_some() && panel_before.z_index.is_some());
    let mut output_expected = style_of(&console, nodes.output);
    let mut input_expected = style_of(&console, nodes.input);
    let rect = panel_rect(&console);

    console.update_options(OptionsPatch::font_size("18px"));

    output_expected.font_size = Some("18px".to_string());
    input_expected.font_size = Some("18px".to_string());
    assert_eq!(style_of(&console, nodes.panel), panel_before);
    assert_eq!(style_of(&console, nodes.output), output_expected);
    assert_eq!(style_of(&console, nodes.input), input_expected);
    assert_eq!(panel_rect(&console), rect);
}

#[test]
fn toggling_drag_keeps_one_pointerdown_listener() {
    let mut console = Console::new(None, None).expect("mounts");
    let header = EventTarget::Node(console.nodes().header);
    console.toggle_draggable(Some(false));
    assert_eq!(
        console.document().listeners().count(header, EventType::PointerDown),
        0
    );
    console.toggle_draggable(None);
    console.toggle_draggable(Some(true));
    assert!(console.is_draggable());
    assert_eq!(
        console.document().listeners().count(header, EventType::PointerDown),
        1
    );
    assert_eq!(
        console.document().listeners().count(header, EventType::DoubleClick),
        1
    );
}

#[test]
fn disabled_drag_ignores_the_header() {
    let mut console = Console::new(None, None).expect("mounts");
    console.toggle_draggable(Some(false));
    let start = panel_rect(&console);
    let (x, y) = header_point(&console);
    let t0 = Instant::now();
    console.handle_event_at(&down(x, y), t0);
    console.handle_event_at(&drag(x, y + 6), t0);
    console.handle_event_at(&up(x, y + 6), t0);
    assert_eq!(panel_rect(&console), start);
}

#[test]
fn resized_size_survives_a_theme_switch() {
    let mut console = Console::new(None, None).expect("mounts");
    let start = panel_rect(&console);
    let (cx, cy) = (start.right() - 1, start.bottom() - 1);
    console.handle_event(&down(cx, cy));
    assert!(console.is_resizing());
    console.handle_event(&drag(cx - 9, cy + 4));
    console.handle_event(&up(cx - 9, cy + 4));
    assert!(!console.is_resizing());

    let resized = panel_rect(&console);
    assert_eq!(
        resized,
        FloatRect::new(start.x, start.y, start.width - 9, start.height + 4)
    );
    console.update_options(OptionsPatch::theme(Theme::Light));
    console.update_options(OptionsPatch::theme(Theme::Colorful));
    assert_eq!(panel_rect(&console), resized);
}

#[test]
fn resize_toggle_controls_the_grip() {
    let mut console = Console::new(None, None).expect("mounts");
    console.toggle_resizable(Some(false));
    let start = panel_rect(&console);
    let (cx, cy) = (start.right() - 1, start.bottom() - 1);
    console.handle_event(&down(cx, cy));
    assert!(!console.is_resizing());
    console.handle_event(&drag(cx - 9, cy + 4));
    console.handle_event(&up(cx - 9, cy + 4));
    assert_eq!(panel_rect(&console), start);
}

#[test]
fn wheel_inside_the_panel_scrolls_the_output() {
    let mut console = Console::new(None, None).expect("mounts");
    for _ in 0..10 {
        submit(&mut console, "help");
    }
    let body = console.nodes().body;
    let bottom = console
        .document()
        .node(body)
        .map(|n| n.scroll_top())
        .unwrap_or(0);
    assert!(bottom > 0);

    let rect = panel_rect(&console);
    let inside = mouse(MouseEventKind::ScrollUp, rect.x + 4, rect.y + 5);
    assert!(console.handle_event(&inside));
    let scrolled = console.document().node(body).map(|n| n.scroll_top());
    assert_eq!(scrolled, Some(bottom - 1));
}
