//! Color values and their textual representations.
//!
//! Host colors arrive as floating point channels in `[0, 1]`. This module
//! renders them as hex codes and OKLCH triples, and holds the small
//! predicates used to pick swatch card backgrounds.
//!
//! # OKLCH
//!
//! The conversion follows the standard chain:
//!
//! ```text
//! sRGB ─▶ linear RGB ─▶ CIE XYZ (D65) ─▶ LMS ─▶ OKLab ─▶ OKLCH
//! ```
//!
//! OKLCH is informational only (swatch cards); theme exports always use hex.
//!
//! # Example
//!
//! ```rust
//! use stylemap::color::{HexCase, Rgba};
//!
//! let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
//! assert_eq!(red.to_hex(HexCase::Lower), "#ff0000");
//!
//! let veil = Rgba::new(0.0, 0.0, 0.0, 0.5);
//! assert_eq!(veil.to_hex(HexCase::Upper), "#00000080");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── RGBA type ──────────────────────────────────────────────────────────────

/// A color with floating point channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Opaque mid-gray substituted whenever a color cannot be resolved.
pub const FALLBACK_GRAY: Rgba = Rgba {
    r: 0.6,
    g: 0.6,
    b: 0.6,
    a: 1.0,
};

/// Opaque white, used for gradients without stops.
pub const WHITE: Rgba = Rgba {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Letter case for hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexCase {
    /// `#a1b2c3`, used by theme exports.
    #[default]
    Lower,
    /// `#A1B2C3`, used on swatch cards.
    Upper,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Returns a copy with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Renders `#rrggbb`, or `#rrggbbaa` when alpha is below 1.
    pub fn to_hex(&self, case: HexCase) -> String {
        let mut hex = format!(
            "#{:02x}{:02x}{:02x}",
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b)
        );
        if self.a < 1.0 {
            hex.push_str(&format!("{:02x}", channel_to_byte(self.a)));
        }
        match case {
            HexCase::Lower => hex,
            HexCase::Upper => hex.to_uppercase(),
        }
    }

    /// Renders `#rrggbb` ignoring alpha.
    pub fn to_opaque_hex(&self, case: HexCase) -> String {
        self.with_alpha(1.0).to_hex(case)
    }

    /// Channels as 0–255 integers (alpha excluded).
    pub fn to_bytes(&self) -> (u8, u8, u8) {
        (
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
        )
    }

    /// Converts to OKLCH.
    pub fn to_oklch(&self) -> Oklch {
        rgb_to_oklch(self.r, self.g, self.b)
    }

    /// Rec. 601 luma of the color channels, alpha ignored.
    pub fn luma(&self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// `true` when all three channels are equal within [`GRAY_TOLERANCE`].
    pub fn is_gray(&self) -> bool {
        (self.r - self.g).abs() < GRAY_TOLERANCE
            && (self.g - self.b).abs() < GRAY_TOLERANCE
            && (self.r - self.b).abs() < GRAY_TOLERANCE
    }
}

/// Scales a `[0, 1]` channel to a byte, rounding to nearest.
fn channel_to_byte(c: f64) -> u8 {
    if !c.is_finite() {
        return 0;
    }
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

// ─── OKLCH ──────────────────────────────────────────────────────────────────

/// OKLCH color: lightness, chroma, hue in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

/// Chroma below this is treated as achromatic (hue reported as 0).
const ACHROMATIC_CHROMA: f64 = 1e-4;

impl Oklch {
    /// `true` when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.c.is_finite() && self.h.is_finite()
    }
}

impl fmt::Display for Oklch {
    /// Renders `oklch(L C H)` with two decimals, or `-` for degenerate input.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_finite() {
            return write!(f, "-");
        }
        write!(f, "oklch({:.2} {:.2} {:.2})", self.l, self.c, self.h)
    }
}

/// Convert an sRGB component (0.0–1.0) to linear light.
fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn rgb_to_oklch(r: f64, g: f64, b: f64) -> Oklch {
    let r = srgb_to_linear(r);
    let g = srgb_to_linear(g);
    let b = srgb_to_linear(b);

    // linear sRGB → XYZ (D65)
    let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
    let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
    let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

    // XYZ → LMS
    let l = 0.8189330101 * x + 0.3618667424 * y - 0.1288597137 * z;
    let m = 0.0329845436 * x + 0.9293118715 * y + 0.0361456387 * z;
    let s = 0.0482003018 * x + 0.2643662691 * y + 0.6338517070 * z;

    let l = l.cbrt();
    let m = m.cbrt();
    let s = s.cbrt();

    // LMS' → OKLab
    let lightness = 0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s;
    let a = 1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s;
    let b = 0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s;

    let chroma = (a * a + b * b).sqrt();
    let hue = if chroma < ACHROMATIC_CHROMA {
        0.0
    } else {
        normalize_hue(b.atan2(a).to_degrees())
    };

    Oklch {
        l: lightness,
        c: chroma,
        h: hue,
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

// ─── Card predicates ────────────────────────────────────────────────────────

/// Absolute per-channel tolerance for [`Rgba::is_gray`].
pub const GRAY_TOLERANCE: f64 = 0.01;

/// Mode-name fragments that mark a mode as dark (matched case-insensitively).
pub const DARK_MODE_TOKENS: &[&str] = &[
    "dark", "black", "night", "темн", "тёмн", "чёрн", "черн", "noir", "nero",
];

/// `true` when a mode name looks like a dark mode.
pub fn is_dark_mode_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    DARK_MODE_TOKENS.iter().any(|token| lower.contains(token))
}

/// Luma at or above which a color counts as light.
pub const LIGHT_LUMA: f64 = 0.5;

/// Absorbs rounding in the luma sum; a 0.5 gray sums to just under 0.5.
const LUMA_TOLERANCE: f64 = 1e-9;

/// Decides whether a swatch card gets a dark background.
///
/// Dark modes always do; otherwise only light (luma at least 0.5)
/// translucent grays.
pub fn use_dark_card(color: &Rgba, opacity: f64, mode_name: Option<&str>) -> bool {
    if mode_name.is_some_and(is_dark_mode_name) {
        return true;
    }
    color.is_gray() && color.luma() >= LIGHT_LUMA - LUMA_TOLERANCE && opacity < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_hex_opaque() {
        let c = Rgba::new(0.2, 0.4, 0.6, 1.0);
        assert_eq!(c.to_hex(HexCase::Lower), "#336699");
        assert_eq!(c.to_hex(HexCase::Upper), "#336699");
    }

    #[test]
    fn test_hex_alpha_appended_below_one() {
        let c = Rgba::new(1.0, 1.0, 1.0, 0.5);
        assert_eq!(c.to_hex(HexCase::Lower), "#ffffff80");
        assert_eq!(c.to_opaque_hex(HexCase::Upper), "#FFFFFF");
    }

    #[test]
    fn test_hex_clamps_out_of_range() {
        let c = Rgba::new(1.4, -0.2, f64::NAN, 1.0);
        assert_eq!(c.to_hex(HexCase::Lower), "#ff0000");
    }

    #[test]
    fn test_oklch_red() {
        let oklch = Rgba::new(1.0, 0.0, 0.0, 1.0).to_oklch();
        assert!(approx(oklch.l, 0.628), "l = {}", oklch.l);
        assert!(approx(oklch.c, 0.258), "c = {}", oklch.c);
        assert!((oklch.h - 29.23).abs() < 0.5, "h = {}", oklch.h);
    }

    #[test]
    fn test_oklch_white_is_achromatic() {
        let oklch = WHITE.to_oklch();
        assert!(approx(oklch.l, 1.0));
        assert!(oklch.c < 0.01);
        assert_eq!(oklch.h, 0.0);
        assert_eq!(oklch.to_string(), "oklch(1.00 0.00 0.00)");
    }

    #[test]
    fn test_oklch_hue_in_range() {
        let blue = Rgba::new(0.0, 0.0, 1.0, 1.0).to_oklch();
        assert!((0.0..360.0).contains(&blue.h));
        assert!((blue.h - 264.05).abs() < 0.5, "h = {}", blue.h);
    }

    #[test]
    fn test_oklch_placeholder_for_nan() {
        let oklch = Rgba::new(f64::NAN, 0.0, 0.0, 1.0).to_oklch();
        assert_eq!(oklch.to_string(), "-");
    }

    #[test]
    fn test_normalize_hue() {
        assert_eq!(normalize_hue(-90.0), 270.0);
        assert_eq!(normalize_hue(360.0), 0.0);
        assert_eq!(normalize_hue(45.0), 45.0);
    }

    #[test]
    fn test_is_gray() {
        assert!(Rgba::new(0.5, 0.5, 0.5, 1.0).is_gray());
        assert!(Rgba::new(0.5, 0.505, 0.498, 1.0).is_gray());
        assert!(!Rgba::new(0.5, 0.52, 0.5, 1.0).is_gray());
    }

    #[test]
    fn test_dark_mode_names() {
        assert!(is_dark_mode_name("Dark"));
        assert!(is_dark_mode_name("Midnight"));
        assert!(is_dark_mode_name("Pitch BLACK"));
        assert!(is_dark_mode_name("Тёмная"));
        assert!(is_dark_mode_name("Mode Noir"));
        assert!(!is_dark_mode_name("Light"));
        assert!(!is_dark_mode_name("Default"));
    }

    #[test]
    fn test_dark_card_for_translucent_gray() {
        let gray = Rgba::new(0.5, 0.5, 0.5, 1.0);
        assert!(use_dark_card(&gray, 0.5, None));
        assert!(!use_dark_card(&gray, 1.0, None));
    }

    #[test]
    fn test_mid_gray_counts_as_light() {
        let gray = Rgba::new(0.5, 0.5, 0.5, 1.0);
        assert!(use_dark_card(&gray, 0.99, None));
    }

    #[test]
    fn test_no_dark_card_for_dark_translucent_gray() {
        let charcoal = Rgba::new(0.1, 0.1, 0.1, 1.0);
        assert!(!use_dark_card(&charcoal, 0.5, None));
        assert!(use_dark_card(&charcoal, 0.5, Some("Night")));
    }

    #[test]
    fn test_luma() {
        assert!((Rgba::new(1.0, 1.0, 1.0, 1.0).luma() - 1.0).abs() < 1e-12);
        assert_eq!(Rgba::new(0.0, 0.0, 0.0, 0.3).luma(), 0.0);
        assert!((Rgba::new(0.5, 0.5, 0.5, 1.0).luma() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dark_card_for_dark_mode() {
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        assert!(use_dark_card(&red, 1.0, Some("Dark")));
        assert!(!use_dark_card(&red, 0.5, Some("Light")));
    }
}
