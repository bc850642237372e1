use ratatui::style::Color;

/// Colour depth advertised by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    TrueColor,
    Indexed256,
}

impl ColorDepth {
    /// Detect from `COLORTERM`; anything other than `truecolor`/`24bit`
    /// falls back to the xterm-256 palette.
    pub fn detect() -> Self {
        match std::env::var("COLORTERM") {
            Ok(value) => {
                let value = value.to_lowercase();
                if value.contains("truecolor") || value.contains("24bit") {
                    ColorDepth::TrueColor
                } else {
                    ColorDepth::Indexed256
                }
            }
            Err(_) => ColorDepth::Indexed256,
        }
    }
}

/// Map an RGB triple to a `ratatui` colour for the current terminal.
pub fn map_rgb_to_color(r: u8, g: u8, b: u8) -> Color {
    map_rgb_with_depth(r, g, b, ColorDepth::detect())
}

pub fn map_rgb_with_depth(r: u8, g: u8, b: u8, depth: ColorDepth) -> Color {
    match depth {
        ColorDepth::TrueColor => Color::Rgb(r, g, b),
        ColorDepth::Indexed256 => Color::Indexed(nearest_xterm_index(r, g, b)),
    }
}

// Levels of the 6x6x6 colour cube occupying indices 16..=231.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn nearest_xterm_index(r: u8, g: u8, b: u8) -> u8 {
    let (ri, gi, bi) = (cube_step(r), cube_step(g), cube_step(b));
    let cube = (
        CUBE_LEVELS[ri as usize],
        CUBE_LEVELS[gi as usize],
        CUBE_LEVELS[bi as usize],
    );
    let cube_index = 16 + 36 * ri + 6 * gi + bi;

    // The 24-step grey ramp (232..=255) is often closer for desaturated input.
    let avg = (r as u16 + g as u16 + b as u16) / 3;
    let grey_step = ((avg * 23 + 127) / 255).min(23) as u8;
    let grey_level = (8 + grey_step as u16 * 10).min(255) as u8;

    let cube_dist = distance_sq((r, g, b), cube);
    let grey_dist = distance_sq((r, g, b), (grey_level, grey_level, grey_level));
    if grey_dist < cube_dist {
        232 + grey_step
    } else {
        cube_index
    }
}

fn cube_step(v: u8) -> u8 {
    ((v as u16 * 5 + 127) / 255) as u8
}

fn distance_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| {
        let diff = x as i32 - y as i32;
        (diff * diff) as u32
    };
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truecolor_passes_rgb_through() {
        assert_eq!(
            map_rgb_with_depth(30, 30, 30, ColorDepth::TrueColor),
            Color::Rgb(30, 30, 30)
        );
    }

    #[test]
    fn pure_colours_land_in_the_cube() {
        assert_eq!(nearest_xterm_index(255, 0, 0), 196);
        assert_eq!(nearest_xterm_index(0, 0, 0), 16);
    }

    #[test]
    fn dark_grey_prefers_the_grey_ramp() {
        let idx = nearest_xterm_index(30, 30, 30);
        assert!((232..=255).contains(&idx));
    }
}
