#![allow(dead_code)]

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use term_console::Console;
use term_console::layout::{FloatRect, PanelRegions, bounding_box};

pub fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn ctrl(ch: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
}

pub fn type_text(console: &mut Console, text: &str) {
    for ch in text.chars() {
        console.handle_event(&key(KeyCode::Char(ch)));
    }
}

/// Type `line` at the prompt and press Enter.
pub fn submit(console: &mut Console, line: &str) {
    type_text(console, line);
    console.handle_event(&key(KeyCode::Enter));
}

pub fn mouse(kind: MouseEventKind, x: i32, y: i32) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column: x as u16,
        row: y as u16,
        modifiers: KeyModifiers::NONE,
    })
}

pub fn down(x: i32, y: i32) -> Event {
    mouse(MouseEventKind::Down(MouseButton::Left), x, y)
}

pub fn drag(x: i32, y: i32) -> Event {
    mouse(MouseEventKind::Drag(MouseButton::Left), x, y)
}

pub fn up(x: i32, y: i32) -> Event {
    mouse(MouseEventKind::Up(MouseButton::Left), x, y)
}

pub fn panel_rect(console: &Console) -> FloatRect {
    bounding_box(console.document(), console.nodes().panel).expect("panel is laid out")
}

/// A point on the header, clear of the border and the close button.
pub fn header_point(console: &Console) -> (i32, i32) {
    let header = PanelRegions::for_rect(panel_rect(console)).header;
    (header.x + 3, header.y)
}
