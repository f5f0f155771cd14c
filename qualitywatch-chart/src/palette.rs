//! Series colours.
//!
//! The first ten series take the category-10 colours in order. Later series
//! get colours generated by rotating the hue by the golden angle; the first
//! 1600 indices all map to distinct colours.

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The category-10 palette.
pub const CATEGORY10: [Rgb; 10] = [
    Rgb::new(0x1f, 0x77, 0xb4),
    Rgb::new(0xff, 0x7f, 0x0e),
    Rgb::new(0x2c, 0xa0, 0x2c),
    Rgb::new(0xd6, 0x27, 0x28),
    Rgb::new(0x94, 0x67, 0xbd),
    Rgb::new(0x8c, 0x56, 0x4b),
    Rgb::new(0xe3, 0x77, 0xc2),
    Rgb::new(0x7f, 0x7f, 0x7f),
    Rgb::new(0xbc, 0xbd, 0x22),
    Rgb::new(0x17, 0xbe, 0xcf),
];

const GOLDEN_ANGLE: f64 = 137.507_764_050_037_85;

/// Colour for the series with palette index `index`.
pub fn color(index: usize) -> Rgb {
    if let Some(c) = CATEGORY10.get(index) {
        return *c;
    }
    let extra = index - CATEGORY10.len();
    let hue = (extra as f64 * GOLDEN_ANGLE + 15.0) % 360.0;
    // step lightness every full turn so wrapped hues stay apart
    let turn = (extra as f64 * GOLDEN_ANGLE / 360.0) as usize;
    let lightness = 0.42 + 0.04 * (turn % 5) as f64;
    hsl_to_rgb(hue, 0.7, lightness)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_u8(r1), to_u8(g1), to_u8(b1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn first_ten_follow_category10() {
        for (i, c) in CATEGORY10.iter().enumerate() {
            assert_eq!(color(i), *c);
        }
        assert_eq!(color(0).to_hex(), "#1f77b4");
    }

    #[test]
    fn colours_do_not_repeat() {
        let seen: HashSet<Rgb> = (0..200).map(color).collect();
        assert_eq!(seen.len(), 200);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), Rgb::new(0, 0, 255));
    }
}
