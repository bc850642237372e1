//! Terminal rendering of a console and the page it is mounted in.
//!
//! Nodes are drawn back to front in the order the flow layout reports.
//! Panel internals are not drawn one by one: their geometry is fixed by
//! `PanelRegions`, so the panel paints its chrome, output log and prompt in
//! one pass.

use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Clear;

use super::Component;
use crate::console::Console;
use crate::constants::PROMPT;
use crate::dom::{Cursor, Document, InlineStyle, NodeId, NodeKind, Paint, ResizeMode, Rgb};
use crate::layout::{self, FloatRect, PanelRegions};
use crate::markup::{self, SpanKind};
use crate::ui::UiFrame;

const DEFAULT_BORDER: Rgb = Rgb(0x1e, 0x1e, 0x1e);
const ERROR_FG: Rgb = Rgb(0xef, 0x44, 0x44);
const CLOSE_BG: Rgb = Rgb(0x1e, 0x1e, 0x1e);
const DRAG_HINT: &str = "⠿";
const RESIZE_GRIP: &str = "◢";

impl Component for Console {
    fn resize(&mut self, area: Rect) {
        let viewport = self.document().viewport();
        if viewport.width != area.width || viewport.height != area.height {
            self.document_mut().set_viewport(area.width, area.height);
        }
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.resize(area);
        frame.render_widget(Clear, area);
        let doc = self.document();
        let map = layout::compute(doc);
        let panel = self.nodes().panel;
        for id in map.paint_order() {
            let Some(rect) = map.viewport_box(id) else {
                continue;
            };
            let rect = rect.translate(i32::from(area.x), i32::from(area.y));
            match doc.kind(id) {
                Some(NodeKind::Paragraph) => draw_paragraph(frame, doc, id, rect),
                Some(NodeKind::Panel) if id == panel => draw_panel(frame, self, rect),
                _ => {}
            }
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        Console::handle_event(self, event)
    }
}

fn draw_paragraph(frame: &mut UiFrame<'_>, doc: &Document, id: NodeId, rect: FloatRect) {
    let mut style = Style::default();
    if let Some(color) = doc.style(id).and_then(|s| s.color) {
        style = style.fg(color.to_color());
    }
    let spans = [(SpanKind::Plain, doc.text(id).to_string())];
    for (row, line) in wrap_spans(&spans, rect.width)
        .into_iter()
        .take(usize::from(rect.height))
        .enumerate()
    {
        let text: String = line.into_iter().map(|(_, t)| t).collect();
        frame.put_str(rect.x, rect.y + row as i32, &text, style);
    }
}

/// Fill `rect` with blanks, sampling `paint` per row for the background.
/// A transparent (or missing) paint leaves the background untouched.
fn paint_rows(frame: &mut UiFrame<'_>, rect: FloatRect, paint: Option<&Paint>) {
    let blank = " ".repeat(usize::from(rect.width));
    for row in 0..rect.height {
        let mut style = Style::default();
        if let Some(rgb) = paint.and_then(|p| p.sample(row, rect.height)) {
            style = style.bg(rgb.to_color());
        }
        frame.put_str(rect.x, rect.y + i32::from(row), &blank, style);
    }
}

fn fg(style: &InlineStyle, fallback: Rgb) -> Style {
    Style::default().fg(style.color.unwrap_or(fallback).to_color())
}

fn draw_panel(frame: &mut UiFrame<'_>, console: &Console, rect: FloatRect) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let doc = console.document();
    let nodes = console.nodes();
    let regions = PanelRegions::for_rect(rect);
    let style_of = |id: NodeId| doc.style(id).cloned().unwrap_or_default();
    let root = style_of(nodes.panel);

    paint_rows(frame, rect, Some(root.background.as_ref().unwrap_or(&Paint::Transparent)));
    draw_border(frame, &root, rect);

    let header = style_of(nodes.header);
    if header.cursor == Some(Cursor::Move) {
        frame.put_str(
            regions.header.x,
            regions.header.y,
            DRAG_HINT,
            fg(&root, Rgb::WHITE).add_modifier(Modifier::DIM),
        );
    }
    let label = style_of(nodes.label);
    let mut label_style = fg(&label, DEFAULT_BORDER).add_modifier(Modifier::BOLD);
    if label.text_shadow {
        label_style = label_style.add_modifier(Modifier::ITALIC);
    }
    if regions.label.height > 0 {
        let text: String = doc
            .text(nodes.label)
            .chars()
            .take(usize::from(regions.label.width))
            .collect();
        frame.put_str(regions.label.x, regions.label.y, &text, label_style);
    }
    let close_style = Style::default()
        .bg(CLOSE_BG.to_color())
        .fg(Rgb::WHITE.to_color());
    let glyph = format!(" {} ", doc.text(nodes.close));
    frame.put_str(regions.close.x, regions.close.y, &glyph, close_style);

    draw_body(frame, console, &regions);
}

fn draw_border(frame: &mut UiFrame<'_>, root: &InlineStyle, rect: FloatRect) {
    let style = Style::default().fg(root.border_color.unwrap_or(DEFAULT_BORDER).to_color());
    let inner = usize::from(rect.width - 2);
    let horizontal = "─".repeat(inner);
    frame.put_str(rect.x, rect.y, &format!("╭{horizontal}╮"), style);
    for row in 1..rect.height - 1 {
        let y = rect.y + i32::from(row);
        frame.put_str(rect.x, y, "│", style);
        frame.put_str(rect.right() - 1, y, "│", style);
    }
    let corner = if root.resize == Some(ResizeMode::Both) {
        RESIZE_GRIP
    } else {
        "╯"
    };
    frame.put_str(
        rect.x,
        rect.bottom() - 1,
        &format!("╰{horizontal}{corner}"),
        style,
    );
}

type Row = Vec<(SpanKind, String)>;

fn draw_body(frame: &mut UiFrame<'_>, console: &Console, regions: &PanelRegions) {
    let doc = console.document();
    let nodes = console.nodes();
    let body = doc.style(nodes.body).cloned().unwrap_or_default();
    paint_rows(frame, regions.body, body.background.as_ref());

    let content = regions.body_content();
    if content.width == 0 || content.height == 0 {
        return;
    }
    let text_style = fg(&body, Rgb::WHITE);
    let error_style = Style::default().fg(ERROR_FG.to_color());

    let mut rows: Vec<Row> = Vec::new();
    for &line in doc.children(nodes.output) {
        let spans: Vec<(SpanKind, String)> = markup::parse(doc.text(line))
            .into_iter()
            .map(|s| (s.kind, s.text))
            .collect();
        rows.extend(wrap_spans(&spans, content.width));
    }
    let prompt_row = rows.len();
    let visible = usize::from(content.height);
    let total = prompt_row + 1;
    let scroll_top = doc.node(nodes.body).map(|n| n.scroll_top()).unwrap_or(0);
    let top = scroll_top.min(total.saturating_sub(visible));

    for (offset, index) in (top..total).take(visible).enumerate() {
        let y = content.y + offset as i32;
        if index == prompt_row {
            draw_prompt(frame, console, content, y, text_style);
            continue;
        }
        let mut x = content.x;
        for (kind, text) in &rows[index] {
            let style = match kind {
                SpanKind::Plain => text_style,
                SpanKind::Error => error_style,
            };
            frame.put_str(x, y, text, style);
            x += text.chars().count() as i32;
        }
    }
}

fn draw_prompt(frame: &mut UiFrame<'_>, console: &Console, content: FloatRect, y: i32, text_style: Style) {
    let doc = console.document();
    let input_id = console.nodes().input;
    frame.put_str(content.x, y, PROMPT, text_style);

    let prompt_width = PROMPT.chars().count() as i32;
    let field = FloatRect::new(
        content.x + prompt_width,
        y,
        content.width.saturating_sub(prompt_width as u16),
        1,
    );
    if field.width == 0 {
        return;
    }
    let input = doc.style(input_id).cloned().unwrap_or_default();
    if let Some(Paint::Solid(bg)) = &input.background {
        frame.fill_style(field, Style::default().bg(bg.to_color()));
    }

    let value: Vec<char> = doc.text(input_id).chars().collect();
    let caret = doc.node(input_id).map(|n| n.caret()).unwrap_or(0).min(value.len());
    let width = usize::from(field.width);
    // Keep the caret cell on screen.
    let start = (caret + 1).saturating_sub(width);
    let shown: String = value.iter().skip(start).take(width).collect();
    frame.put_str(field.x, y, &shown, fg(&input, Rgb::WHITE));

    if console.input_focused() {
        let caret_x = field.x + (caret - start) as i32;
        frame.fill_style(
            FloatRect::new(caret_x, y, 1, 1),
            Style::default().add_modifier(Modifier::REVERSED),
        );
    }
}

/// Break spans into rows of at most `width` chars, honouring newlines.
/// Produces exactly `wrapped_line_count(..).max(1)` rows per line.
fn wrap_spans(spans: &[(SpanKind, String)], width: u16) -> Vec<Row> {
    let width = usize::from(width.max(1));
    let mut rows: Vec<Row> = vec![Vec::new()];
    let mut used = 0;
    for (kind, text) in spans {
        for ch in text.chars() {
            if ch == '\n' {
                rows.push(Vec::new());
                used = 0;
                continue;
            }
            if used == width {
                rows.push(Vec::new());
                used = 0;
            }
            if let Some(row) = rows.last_mut() {
                match row.last_mut() {
                    Some((last_kind, last)) if last_kind == kind => last.push(ch),
                    _ => row.push((*kind, ch.to_string())),
                }
            }
            used += 1;
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::flow::wrapped_line_count;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;

    fn render(console: &mut Console, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            console.render(&mut frame, area);
        }
        buffer
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    fn screen(buffer: &Buffer) -> Vec<String> {
        (0..buffer.area.height).map(|y| row_text(buffer, y)).collect()
    }

    #[test]
    fn draws_chrome_and_prompt() {
        let mut console = Console::new(None, None).expect("mounts");
        let buffer = render(&mut console, 50, 20);
        let lines = screen(&buffer);
        assert!(lines.iter().any(|l| l.contains("Console")));
        assert!(lines.iter().any(|l| l.contains("User> ")));
        assert!(lines.iter().any(|l| l.contains('╭')));
        assert!(lines.iter().any(|l| l.contains(RESIZE_GRIP)));
    }

    #[test]
    fn output_lines_show_up_and_errors_are_red() {
        let mut console = Console::new(None, None).expect("mounts");
        for ch in "nope".chars() {
            console.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)));
        }
        console.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        let buffer = render(&mut console, 50, 20);
        let lines = screen(&buffer);
        let row = lines
            .iter()
            .position(|l| l.contains("Unknown command: nope"))
            .expect("error line rendered");
        let col = lines[row].chars().position(|c| c == 'U').unwrap_or(0) as u16;
        let cell = buffer.cell((col, row as u16)).expect("cell");
        assert_eq!(cell.fg, ERROR_FG.to_color());
    }

    #[test]
    fn wrap_matches_layout_row_count() {
        for (text, width) in [("abcdefgh", 3u16), ("a\nbc", 5), ("", 4), ("exact", 5)] {
            let rows = wrap_spans(&[(SpanKind::Plain, text.to_string())], width);
            assert_eq!(rows.len(), usize::from(wrapped_line_count(text, width).max(1)));
        }
    }

    #[test]
    fn wrap_keeps_span_kinds() {
        let rows = wrap_spans(
            &[
                (SpanKind::Plain, "ab".to_string()),
                (SpanKind::Error, "cd".to_string()),
            ],
            3,
        );
        assert_eq!(
            rows,
            vec![
                vec![(SpanKind::Plain, "ab".to_string()), (SpanKind::Error, "c".to_string())],
                vec![(SpanKind::Error, "d".to_string())],
            ]
        );
    }
}
