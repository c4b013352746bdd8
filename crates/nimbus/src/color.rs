//! Color helpers for painting onto the terminal.

use nimbus_core::Rgb;
use ratatui::style::Color;

pub const WHITE: Rgb = Rgb(255, 255, 255);

/// Ink used for the sprite figure and the caption.
pub const INK: Rgb = Rgb(36, 40, 64);

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Composite `over` onto `base` at the given opacity.
pub fn blend(base: Rgb, over: Rgb, opacity: f32) -> Rgb {
    base.lerp(over, opacity)
}

/// Perceived brightness in `[0, 1]` (Rec. 601 weights).
pub fn luma(rgb: Rgb) -> f32 {
    (0.299 * rgb.0 as f32 + 0.587 * rgb.1 as f32 + 0.114 * rgb.2 as f32) / 255.0
}

/// Readable text color on top of `background`.
pub fn text_on(background: Rgb) -> Rgb {
    if luma(background) > 0.5 { INK } else { WHITE }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        let base = Rgb(10, 20, 30);
        assert_eq!(blend(base, WHITE, 0.0), base);
        assert_eq!(blend(base, WHITE, 1.0), WHITE);
        assert_eq!(blend(base, WHITE, 7.0), WHITE);
    }

    #[test]
    fn test_text_contrast() {
        assert_eq!(text_on(Rgb(255, 182, 193)), INK);
        assert_eq!(text_on(Rgb(20, 20, 20)), WHITE);
    }

    #[test]
    fn test_to_color() {
        assert_eq!(to_color(Rgb(1, 2, 3)), Color::Rgb(1, 2, 3));
    }
}
