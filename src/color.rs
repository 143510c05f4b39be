//! Color Palette Resolution
//!
//! Only what the generators need: hex parsing, shading and mixing. Colors are
//! not validated here; anything unparseable passes through verbatim.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn parse(input: &str) -> Option<Self> {
        let hex = input.trim().trim_start_matches('#');
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear blend toward `other` by `t` in [0, 1].
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgb {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
        }
    }

    pub fn lighten(self, amount: f64) -> Rgb {
        self.mix(Rgb { r: 255, g: 255, b: 255 }, amount)
    }

    pub fn darken(self, amount: f64) -> Rgb {
        self.mix(Rgb { r: 0, g: 0, b: 0 }, amount)
    }

    /// Relative luminance approximation in [0, 1].
    pub fn luminance(self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }
}

/// Lighten a color string; unparseable input is returned unchanged.
pub fn lighten(color: &str, amount: f64) -> String {
    Rgb::parse(color).map_or_else(|| color.to_string(), |c| c.lighten(amount).to_hex())
}

/// Darken a color string; unparseable input is returned unchanged.
pub fn darken(color: &str, amount: f64) -> String {
    Rgb::parse(color).map_or_else(|| color.to_string(), |c| c.darken(amount).to_hex())
}

/// Mix two color strings; falls back to `a` if either is unparseable.
pub fn mix(a: &str, b: &str, t: f64) -> String {
    match (Rgb::parse(a), Rgb::parse(b)) {
        (Some(x), Some(y)) => x.mix(y, t).to_hex(),
        _ => a.to_string(),
    }
}

/// Resolved colors used by every generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: String,
    pub accent: String,
    pub light: String,
    pub dark: String,
}

impl Palette {
    /// A missing accent becomes a darker shade of the primary, or a lighter
    /// one when the primary is already dark.
    pub fn resolve(primary: &str, accent: Option<&str>) -> Self {
        let primary = primary.trim().to_string();
        let is_dark = Rgb::parse(&primary).map_or(false, |c| c.luminance() < 0.25);
        let accent = match accent.map(str::trim).filter(|a| !a.is_empty()) {
            Some(a) => a.to_string(),
            None if is_dark => lighten(&primary, 0.35),
            None => darken(&primary, 0.3),
        };
        Self {
            light: lighten(&primary, 0.45),
            dark: darken(&primary, 0.45),
            primary,
            accent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Rgb::parse("#3b82f6"), Some(Rgb { r: 0x3b, g: 0x82, b: 0xf6 }));
        assert_eq!(Rgb::parse("fff"), Some(Rgb { r: 255, g: 255, b: 255 }));
        assert_eq!(Rgb::parse("#12"), None);
        assert_eq!(Rgb::parse("#gggggg"), None);
        assert_eq!(Rgb::parse("blue"), None);
    }

    #[test]
    fn test_shading() {
        assert_eq!(lighten("#000000", 1.0), "#ffffff");
        assert_eq!(darken("#ffffff", 1.0), "#000000");
        assert_eq!(darken("#ffffff", 0.0), "#ffffff");
        assert_eq!(mix("#000000", "#ffffff", 0.5), "#808080");
    }

    #[test]
    fn test_unparseable_passthrough() {
        assert_eq!(lighten("tomato", 0.5), "tomato");
        assert_eq!(mix("tomato", "#fff", 0.5), "tomato");
    }

    #[test]
    fn test_palette_accent_fallback() {
        let p = Palette::resolve("#3b82f6", None);
        assert_eq!(p.accent, darken("#3b82f6", 0.3));

        let dark = Palette::resolve("#000000", None);
        assert_eq!(dark.accent, lighten("#000000", 0.35));

        let given = Palette::resolve("#3b82f6", Some("#f59e0b"));
        assert_eq!(given.accent, "#f59e0b");

        let blank = Palette::resolve("#3b82f6", Some("  "));
        assert_eq!(blank.accent, p.accent);
    }
}
