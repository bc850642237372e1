//! Console colour themes.
//!
//! Applying a theme is a pure function of the theme and the panel's current
//! explicit size: every inline style on the four themed nodes is dropped,
//! the theme's palette is written back and the saved width/height restored.
//! Re-applying the same theme therefore yields the same styles, and nothing
//! from a previously applied theme survives.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::dom::{Document, NodeId, Paint, Rgb};
use crate::error::ConsoleError;

const SURFACE_LIGHT: Rgb = Rgb(0xf9, 0xf9, 0xf9);
const SURFACE_DARK: Rgb = Rgb(0x1e, 0x1e, 0x1e);
const COLORFUL_ROOT: [Rgb; 3] = [
    Rgb(0xff, 0x7e, 0xb3),
    Rgb(0xff, 0x75, 0x8c),
    Rgb(0xff, 0xcc, 0x70),
];
const COLORFUL_BODY: [Rgb; 2] = [Rgb(0x6a, 0x11, 0xcb), Rgb(0x25, 0x75, 0xfc)];
const COLORFUL_BORDER: Rgb = Rgb(0xff, 0xcc, 0x70);
const COLORFUL_INPUT_RADIUS: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Colorful,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Colorful];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Colorful => "colorful",
        }
    }

    /// Marker class carried by the panel root while this theme is active.
    pub fn class_name(self) -> &'static str {
        match self {
            Theme::Light => "sconsole-light",
            Theme::Dark => "sconsole-dark",
            Theme::Colorful => "sconsole-colorful",
        }
    }

    /// The theme after this one, wrapping around.
    pub fn next(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Colorful,
            Theme::Colorful => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConsoleError::UnknownTheme(s.to_string()))
    }
}

/// The four nodes a theme paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeTargets {
    pub root: NodeId,
    pub output_area: NodeId,
    pub input: NodeId,
    pub label: NodeId,
}

impl ThemeTargets {
    fn check(&self, doc: &Document) -> Result<(), ConsoleError> {
        let named = [
            (self.root, "panel root"),
            (self.output_area, "output area"),
            (self.input, "input field"),
            (self.label, "header label"),
        ];
        match named.into_iter().find(|(id, _)| !doc.contains(*id)) {
            Some((_, name)) => Err(ConsoleError::MissingTarget(name)),
            None => Ok(()),
        }
    }

    fn all(&self) -> [NodeId; 4] {
        [self.root, self.output_area, self.input, self.label]
    }
}

pub fn apply(doc: &mut Document, theme: Theme, targets: &ThemeTargets) -> Result<(), ConsoleError> {
    targets.check(doc)?;

    let (width, height) = doc
        .style(targets.root)
        .map(|s| (s.width, s.height))
        .unwrap_or_default();

    for id in targets.all() {
        doc.clear_style(id);
    }
    for other in Theme::ALL {
        doc.remove_class(targets.root, other.class_name());
    }
    doc.add_class(targets.root, theme.class_name());

    paint(doc, theme, targets);

    if let Some(style) = doc.style_mut(targets.root) {
        if width.is_some() {
            style.width = width;
        }
        if height.is_some() {
            style.height = height;
        }
    }
    debug!(theme = %theme, "theme applied");
    Ok(())
}

fn paint(doc: &mut Document, theme: Theme, targets: &ThemeTargets) {
    let mut set = |id: NodeId, background: Option<Paint>, color: Rgb| {
        if let Some(style) = doc.style_mut(id) {
            style.background = background;
            style.color = Some(color);
        }
    };
    match theme {
        Theme::Dark => {
            set(targets.root, Some(Paint::Solid(SURFACE_LIGHT)), Rgb::WHITE);
            set(targets.output_area, Some(Paint::Solid(SURFACE_DARK)), Rgb::WHITE);
            set(targets.input, Some(Paint::Solid(SURFACE_DARK)), Rgb::WHITE);
            set(targets.label, None, SURFACE_DARK);
        }
        Theme::Light => {
            set(targets.root, Some(Paint::Solid(SURFACE_DARK)), Rgb::WHITE);
            set(targets.output_area, Some(Paint::Solid(SURFACE_LIGHT)), Rgb::BLACK);
            set(targets.input, Some(Paint::Solid(SURFACE_LIGHT)), Rgb::BLACK);
            set(targets.label, None, Rgb::WHITE);
        }
        Theme::Colorful => {
            set(
                targets.root,
                Some(Paint::Gradient(COLORFUL_ROOT.to_vec())),
                Rgb::WHITE,
            );
            set(
                targets.output_area,
                Some(Paint::Gradient(COLORFUL_BODY.to_vec())),
                Rgb::WHITE,
            );
            set(targets.input, Some(Paint::Transparent), Rgb::WHITE);
            set(targets.label, None, Rgb::WHITE);
            if let Some(style) = doc.style_mut(targets.root) {
                style.border_color = Some(COLORFUL_BORDER);
            }
            if let Some(style) = doc.style_mut(targets.input) {
                style.border_radius = Some(COLORFUL_INPUT_RADIUS);
            }
            if let Some(style) = doc.style_mut(targets.label) {
                style.text_shadow = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{InlineStyle, NodeKind};

    fn targets(doc: &mut Document) -> ThemeTargets {
        let root = doc.root();
        let panel = doc.create(NodeKind::Panel);
        doc.append_child(root, panel);
        let [output_area, input, label] =
            [NodeKind::ConsoleBody, NodeKind::Input, NodeKind::Label].map(|kind| {
                let id = doc.create(kind);
                doc.append_child(panel, id);
                id
            });
        ThemeTargets {
            root: panel,
            output_area,
            input,
            label,
        }
    }

    fn styles(doc: &Document, t: &ThemeTargets) -> Vec<InlineStyle> {
        t.all()
            .iter()
            .map(|id| doc.style(*id).cloned().unwrap_or_default())
            .collect()
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Colorful".parse::<Theme>().ok(), Some(Theme::Colorful));
        assert_eq!(" LIGHT ".parse::<Theme>().ok(), Some(Theme::Light));
        assert!(matches!(
            "neon".parse::<Theme>(),
            Err(ConsoleError::UnknownTheme(_))
        ));
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let mut doc = Document::default();
        let t = targets(&mut doc);
        for theme in Theme::ALL {
            apply(&mut doc, theme, &t).ok();
            let first = styles(&doc, &t);
            apply(&mut doc, theme, &t).ok();
            assert_eq!(first, styles(&doc, &t));
        }
    }

    #[test]
    fn switching_does_not_leak_styles() {
        let mut fresh = Document::default();
        let tf = targets(&mut fresh);
        apply(&mut fresh, Theme::Dark, &tf).ok();

        let mut doc = Document::default();
        let t = targets(&mut doc);
        apply(&mut doc, Theme::Colorful, &t).ok();
        apply(&mut doc, Theme::Dark, &t).ok();
        assert_eq!(styles(&doc, &t), styles(&fresh, &tf));
        assert!(doc.has_class(t.root, "sconsole-dark"));
        assert!(!doc.has_class(t.root, "sconsole-colorful"));
    }

    #[test]
    fn explicit_size_survives_a_switch() {
        let mut doc = Document::default();
        let t = targets(&mut doc);
        if let Some(style) = doc.style_mut(t.root) {
            style.width = Some(50);
            style.height = Some(12);
            style.z_index = Some(7);
        }
        apply(&mut doc, Theme::Light, &t).ok();
        let style = doc.style(t.root).cloned().unwrap_or_default();
        assert_eq!((style.width, style.height), (Some(50), Some(12)));
        assert_eq!(style.z_index, None);
    }

    #[test]
    fn missing_target_is_reported() {
        let mut doc = Document::default();
        let t = targets(&mut doc);
        doc.remove(t.label);
        assert!(matches!(
            apply(&mut doc, Theme::Dark, &t),
            Err(ConsoleError::MissingTarget("header label"))
        ));
    }
}
