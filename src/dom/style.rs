//! Typed inline styles for document nodes.
//!
//! Every property is optional: `None` means "not set inline", in which case
//! the renderer and the flow layout fall back to the node kind's defaults.
//! Clearing a node's style is simply resetting it to `InlineStyle::default()`.

use std::time::Duration;

use ratatui::style::Color;

/// A 24-bit colour. Mapped to the closest terminal colour when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Linear interpolation between two colours, `step` out of `steps`.
    pub fn lerp(self, other: Rgb, step: u16, steps: u16) -> Rgb {
        if steps == 0 {
            return self;
        }
        let step = step.min(steps) as i32;
        let steps = steps as i32;
        let mix = |a: u8, b: u8| -> u8 {
            let a = a as i32;
            let b = b as i32;
            (a + (b - a) * step / steps).clamp(0, 255) as u8
        };
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    pub fn to_color(self) -> Color {
        crate::term_color::map_rgb_to_color(self.0, self.1, self.2)
    }
}

/// Background fill of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paint {
    Solid(Rgb),
    /// Colour stops spread evenly from the first row to the last.
    Gradient(Vec<Rgb>),
    Transparent,
}

impl Paint {
    /// Colour of row `row` of a node that is `rows` tall, or `None` when the
    /// paint lets the parent show through.
    pub fn sample(&self, row: u16, rows: u16) -> Option<Rgb> {
        match self {
            Paint::Solid(rgb) => Some(*rgb),
            Paint::Transparent => None,
            Paint::Gradient(stops) => match stops.as_slice() {
                [] => None,
                [only] => Some(*only),
                stops => {
                    let segments = (stops.len() - 1) as u32;
                    let span = rows.saturating_sub(1).max(1) as u32;
                    let scaled = row.min(rows.saturating_sub(1)) as u32 * segments * 64 / span;
                    let segment = ((scaled / 64) as usize).min(stops.len() - 2);
                    let within = (scaled - segment as u32 * 64) as u16;
                    Some(stops[segment].lerp(stops[segment + 1], within, 64))
                }
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Participates in the vertical block flow of its parent.
    #[default]
    Static,
    /// Placed at `left`/`top` in document coordinates.
    Absolute,
    /// Placed at `left`/`top` in viewport coordinates.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeMode {
    #[default]
    None,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Move,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub background: Option<Paint>,
    pub color: Option<Rgb>,
    pub border_color: Option<Rgb>,
    pub border_radius: Option<u16>,
    pub text_shadow: bool,
    pub font_size: Option<String>,
    pub font_family: Option<String>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub position: Option<Position>,
    pub left: Option<i32>,
    pub top: Option<i32>,
    pub z_index: Option<i32>,
    pub margin_top: Option<u16>,
    pub margin_left: Option<u16>,
    pub resize: Option<ResizeMode>,
    pub cursor: Option<Cursor>,
    pub transition: Option<Duration>,
}

impl InlineStyle {
    pub fn is_empty(&self) -> bool {
        *self == InlineStyle::default()
    }

    pub fn position(&self) -> Position {
        self.position.unwrap_or_default()
    }

    /// Shorthand for `margin: 0`.
    pub fn zero_margin(&mut self) {
        self.margin_top = Some(0);
        self.margin_left = Some(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_hits_both_end_stops() {
        let paint = Paint::Gradient(vec![Rgb(0, 0, 0), Rgb(200, 100, 50)]);
        assert_eq!(paint.sample(0, 10), Some(Rgb(0, 0, 0)));
        assert_eq!(paint.sample(9, 10), Some(Rgb(200, 100, 50)));
    }

    #[test]
    fn gradient_with_three_stops_passes_through_middle() {
        let paint = Paint::Gradient(vec![Rgb(0, 0, 0), Rgb(100, 100, 100), Rgb(0, 0, 0)]);
        assert_eq!(paint.sample(2, 5), Some(Rgb(100, 100, 100)));
    }

    #[test]
    fn transparent_paint_samples_nothing() {
        assert_eq!(Paint::Transparent.sample(0, 3), None);
    }

    #[test]
    fn cleared_style_is_empty() {
        let mut style = InlineStyle {
            width: Some(10),
            ..InlineStyle::default()
        };
        assert!(!style.is_empty());
        style = InlineStyle::default();
        assert!(style.is_empty());
    }
}
