use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed chart colours
// ---------------------------------------------------------------------------

pub const DAILY_LINE: Color32 = Color32::from_rgb(0x34, 0x98, 0xDB);
pub const HOURLY_LINE: Color32 = Color32::from_rgb(0x2E, 0xCC, 0x71);
pub const CASUAL_LINE: Color32 = Color32::from_rgb(0x1F, 0x77, 0xB4);
pub const REGISTERED_LINE: Color32 = Color32::from_rgb(0xFF, 0x7F, 0x0E);

pub const SEASON_HIGHLIGHT: Color32 = Color32::from_rgb(0xDC, 0x14, 0x3C); // crimson
pub const WEATHER_HIGHLIGHT: Color32 = Color32::from_rgb(0xFF, 0x8C, 0x00); // darkorange
pub const MUTED_BAR: Color32 = Color32::from_rgb(0xD3, 0xD3, 0xD3); // lightgray

/// First colours of the ColorBrewer "Set2" qualitative scheme.
pub const SET2: [Color32; 3] = [
    Color32::from_rgb(0x66, 0xC2, 0xA5),
    Color32::from_rgb(0xFC, 0x8D, 0x62),
    Color32::from_rgb(0x8D, 0xA0, 0xCB),
];

/// Colour for the `i`-th category from [`SET2`], cycling.
pub fn set2(i: usize) -> Color32 {
    SET2[i % SET2.len()]
}

// ---------------------------------------------------------------------------
// Sequential palette generator
// ---------------------------------------------------------------------------

/// Generates `n` blues running from pale to deep, like a sequential "Blues"
/// colour map.
pub fn blues_gradient(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.5 } else { i as f32 / (n - 1) as f32 };
            let lightness = 0.85 - 0.55 * t;
            let hsl = Hsl::new(210.0, 0.65, lightness);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luminance(c: Color32) -> u32 {
        u32::from(c.r()) + u32::from(c.g()) + u32::from(c.b())
    }

    #[test]
    fn test_blues_gradient_darkens() {
        let colors = blues_gradient(12);
        assert_eq!(colors.len(), 12);
        for pair in colors.windows(2) {
            assert!(luminance(pair[0]) > luminance(pair[1]));
        }
        for c in &colors {
            assert!(c.b() >= c.r());
        }
    }

    #[test]
    fn test_blues_gradient_edge_sizes() {
        assert!(blues_gradient(0).is_empty());
        assert_eq!(blues_gradient(1).len(), 1);
    }

    #[test]
    fn test_set2_cycles() {
        assert_eq!(set2(0), SET2[0]);
        assert_eq!(set2(4), SET2[1]);
    }
}
