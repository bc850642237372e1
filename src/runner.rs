use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyEventKind, MouseEventKind};
use tracing::{debug, info};

use crate::components::Component;
use crate::console::Console;
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::keybindings::Action;
use crate::layout;

/// Rows the page moves per wheel notch when the pointer is outside the panel.
const PAGE_SCROLL_STEP: i32 = 1;

/// Run `console` full screen until the quit binding fires or `should_quit`
/// returns true.
///
/// Events go to the console first. Wheel events it does not take scroll the
/// host page. When no input arrives within `poll_interval` the console is
/// ticked and the frame is redrawn.
pub fn run_console_app<I, O, FQuit>(
    input: &mut I,
    output: &mut O,
    console: &mut Console,
    poll_interval: Duration,
    mut should_quit: FQuit,
) -> io::Result<()>
where
    I: InputDriver,
    O: OutputDriver,
    FQuit: FnMut(Option<&Event>, &mut Console) -> bool,
{
    output.enter()?;
    let result = pump(input, output, console, poll_interval, &mut should_quit);
    output.exit()?;
    result
}

fn pump<I, O, FQuit>(
    input: &mut I,
    output: &mut O,
    console: &mut Console,
    poll_interval: Duration,
    should_quit: &mut FQuit,
) -> io::Result<()>
where
    I: InputDriver,
    O: OutputDriver,
    FQuit: FnMut(Option<&Event>, &mut Console) -> bool,
{
    let mut event_loop = EventLoop::new(input, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;
    event_loop.run(|_driver, event| {
        let Some(evt) = event else {
            if should_quit(None, console) {
                return Ok(ControlFlow::Quit);
            }
            console.tick(Instant::now());
            output.draw(|mut frame| {
                let area = frame.area();
                console.render(&mut frame, area);
            })?;
            return Ok(ControlFlow::Continue);
        };
        if let Event::Key(key) = &evt
            && key.kind != KeyEventKind::Release
            && console.keybindings().matches(Action::Quit, key)
        {
            info!("quit requested");
            return Ok(ControlFlow::Quit);
        }
        if should_quit(Some(&evt), console) {
            return Ok(ControlFlow::Quit);
        }
        if !console.handle_event(&evt)
            && let Event::Mouse(mouse) = &evt
        {
            match mouse.kind {
                MouseEventKind::ScrollUp => scroll_page(console, -PAGE_SCROLL_STEP),
                MouseEventKind::ScrollDown => scroll_page(console, PAGE_SCROLL_STEP),
                _ => {}
            }
        }
        Ok(ControlFlow::Continue)
    })
}

/// Scroll the host page vertically, clamped to its content.
pub fn scroll_page(console: &mut Console, delta: i32) {
    let doc = console.document_mut();
    let content = layout::compute(doc).content_height();
    let viewport = doc.viewport();
    let max = i32::from(content.saturating_sub(viewport.height));
    let (x, y) = doc.scroll_offset();
    let next = (i32::from(y) + delta).clamp(0, max) as u16;
    if next != y {
        debug!(from = y, to = next, "page scrolled");
        doc.set_scroll_offset(x, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, El, NodeKind};
    use crate::drivers::scripted::{ScriptedInputDriver, TestOutputDriver};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn typed(text: &str) -> Vec<Event> {
        text.chars()
            .map(|c| key(KeyCode::Char(c), KeyModifiers::NONE))
            .collect()
    }

    #[test]
    fn ctrl_q_quits_and_restores_terminal() {
        let mut console = Console::new(None, None).expect("mounts");
        let mut events = typed("help");
        events.push(key(KeyCode::Enter, KeyModifiers::NONE));
        events.push(key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        let mut input = ScriptedInputDriver::new(events);
        let mut output = TestOutputDriver::new(60, 20).expect("test terminal");

        run_console_app(
            &mut input,
            &mut output,
            &mut console,
            Duration::from_millis(0),
            |_, _| false,
        )
        .expect("runs");

        assert!(!output.is_entered());
        assert_eq!(input.mouse_capture(), Some(true));
        assert!(output.frames() >= 1);
        assert!(
            console
                .output_text()
                .iter()
                .any(|l| l.starts_with("Available commands:"))
        );
    }

    #[test]
    fn idle_frames_draw_the_console() {
        let mut console = Console::new(None, None).expect("mounts");
        let mut input = ScriptedInputDriver::default();
        let mut output = TestOutputDriver::new(60, 20).expect("test terminal");
        let mut idles = 0;
        run_console_app(
            &mut input,
            &mut output,
            &mut console,
            Duration::from_millis(0),
            |event, _| {
                if event.is_none() {
                    idles += 1;
                }
                idles > 2
            },
        )
        .expect("runs");
        assert_eq!(output.frames(), 2);
        assert!(output.screen().iter().any(|row| row.contains("User> ")));
    }

    #[test]
    fn wheel_outside_panel_scrolls_page() {
        let mut doc = Document::new(40, 10);
        let root = doc.root();
        for i in 0..30 {
            El::new(NodeKind::Paragraph)
                .text(format!("paragraph {i}"))
                .mount(&mut doc, root);
        }
        El::new(NodeKind::Block)
            .id("host")
            .mount(&mut doc, root);
        let mut console = Console::mount(doc, Some("host"), None).expect("mounts");
        let wheel = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 5,
            row: 2,
            modifiers: KeyModifiers::NONE,
        });
        let mut input = ScriptedInputDriver::new([wheel.clone(), wheel]);
        let mut output = TestOutputDriver::new(40, 10).expect("test terminal");
        let mut idles = 0;
        run_console_app(
            &mut input,
            &mut output,
            &mut console,
            Duration::from_millis(0),
            |event, _| {
                if event.is_none() {
                    idles += 1;
                }
                idles > 1
            },
        )
        .expect("runs");
        assert_eq!(console.document().scroll_offset(), (0, 2));
    }

    #[test]
    fn page_scroll_is_clamped() {
        let mut console = Console::new(None, None).expect("mounts");
        scroll_page(&mut console, -5);
        assert_eq!(console.document().scroll_offset(), (0, 0));
    }
}
