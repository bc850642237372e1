//! Inline markup accepted by `Console::append_to_console`.
//!
//! Only two things are understood: `<error>…</error>` spans and the
//! `&lt;`, `&gt;` and `&amp;` entities. Anything else (including unknown
//! tags) is kept as literal text.

const ERROR_OPEN: &str = "<error>";
const ERROR_CLOSE: &str = "</error>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
}

/// Split `line` into plain and error spans. An unclosed `<error>` runs to
/// the end of the line.
pub fn parse(line: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut rest = line;
    let mut kind = SpanKind::Plain;
    while !rest.is_empty() {
        let marker = match kind {
            SpanKind::Plain => ERROR_OPEN,
            SpanKind::Error => ERROR_CLOSE,
        };
        let (chunk, next) = match rest.find(marker) {
            Some(idx) => (&rest[..idx], Some(&rest[idx + marker.len()..])),
            None => (rest, None),
        };
        push_span(&mut spans, kind, &unescape(chunk));
        match next {
            Some(after) => {
                rest = after;
                kind = match kind {
                    SpanKind::Plain => SpanKind::Error,
                    SpanKind::Error => SpanKind::Plain,
                };
            }
            None => break,
        }
    }
    spans
}

/// Text of `line` with the markup stripped.
pub fn plain_text(line: &str) -> String {
    parse(line).into_iter().map(|s| s.text).collect()
}

/// Wrap `text` so it renders as an error span.
pub fn error(text: &str) -> String {
    format!("{ERROR_OPEN}{}{ERROR_CLOSE}", escape(text))
}

/// Escape user-provided text so it renders literally.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn push_span(spans: &mut Vec<Span>, kind: SpanKind, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(text),
        _ => spans.push(Span {
            kind,
            text: text.to_string(),
        }),
    }
}
