//! HSB picker model: pointer position → saturation/brightness/hue mapping
//! and the current picker color.
//!
//! The current color is normally derived from the HSB values, but the
//! eyedropper, palette swatches and the hex field set it directly without
//! moving the sliders, so both are stored.

use crate::color::{HexColor, Hsb};

/// Client-space rectangle of a drag surface or canvas, as reported by
/// `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Saturation (left 0 → right 100) and brightness (top 100 → bottom 0) under
/// a pointer, clamped to the surface and rounded to whole percent.
pub fn sat_bri_at(surface: Rect, x: f64, y: f64) -> Option<(f64, f64)> {
    if surface.is_degenerate() {
        return None;
    }
    let sat = ((x - surface.left) / surface.width * 100.0).clamp(0.0, 100.0);
    let bri = (100.0 - (y - surface.top) / surface.height * 100.0).clamp(0.0, 100.0);
    Some((sat.round(), bri.round()))
}

/// Hue (left 0 → right 360) under a pointer, clamped to the bar.
pub fn hue_at(bar: Rect, x: f64) -> Option<f64> {
    if !(bar.width > 0.0) {
        return None;
    }
    Some(((x - bar.left) / bar.width * 360.0).clamp(0.0, 360.0).round())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickerColor {
    hsb: Hsb,
    current: HexColor,
}

impl Default for PickerColor {
    fn default() -> Self {
        Self::from_hsb(Hsb::default())
    }
}

impl PickerColor {
    pub fn from_hsb(hsb: Hsb) -> Self {
        Self { hsb, current: hsb.to_hex() }
    }

    pub fn hsb(&self) -> Hsb {
        self.hsb
    }

    pub fn current(&self) -> HexColor {
        self.current
    }

    pub fn set_sat_bri(&mut self, saturation: f64, brightness: f64) {
        *self = Self::from_hsb(self.hsb.with_sat_bri(saturation, brightness));
    }

    pub fn set_hue(&mut self, hue: f64) {
        *self = Self::from_hsb(self.hsb.with_hue(hue));
    }

    /// Sets the color without re-deriving the sliders.
    pub fn set_hex(&mut self, color: HexColor) {
        self.current = color;
    }

    /// Text field entry. Anything but an exact `#rrggbb` (surrounding
    /// whitespace included) is ignored.
    pub fn set_hex_text(&mut self, text: &str) -> bool {
        match HexColor::parse_strict(text) {
            Some(color) => {
                self.set_hex(color);
                true
            }
            None => false,
        }
    }

    /// Cursor position on the sat/bri surface as CSS percentages (left, top).
    pub fn surface_cursor(&self) -> (f64, f64) {
        (self.hsb.saturation(), 100.0 - self.hsb.brightness())
    }

    /// Cursor position on the hue bar as a CSS percentage.
    pub fn hue_cursor(&self) -> f64 {
        self.hsb.hue() / 360.0 * 100.0
    }
}

/// Held/not-held flag of one drag surface. Moves are ignored unless held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragState {
    held: bool,
}

impl DragState {
    pub fn press(&mut self) {
        self.held = true;
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: Rect = Rect { left: 10.0, top: 20.0, width: 200.0, height: 100.0 };

    #[test]
    fn surface_corners() {
        assert_eq!(sat_bri_at(SURFACE, 10.0, 20.0), Some((0.0, 100.0)));
        assert_eq!(sat_bri_at(SURFACE, 210.0, 120.0), Some((100.0, 0.0)));
        assert_eq!(sat_bri_at(SURFACE, 110.0, 70.0), Some((50.0, 50.0)));
    }

    #[test]
    fn pointer_outside_surface_is_clamped() {
        assert_eq!(sat_bri_at(SURFACE, -500.0, 900.0), Some((0.0, 0.0)));
        assert_eq!(sat_bri_at(SURFACE, 900.0, -500.0), Some((100.0, 100.0)));
        assert_eq!(hue_at(SURFACE, 5000.0), Some(360.0));
        assert_eq!(hue_at(SURFACE, -5.0), Some(0.0));
    }

    #[test]
    fn collapsed_surface_is_ignored() {
        assert_eq!(sat_bri_at(Rect::new(0.0, 0.0, 0.0, 10.0), 1.0, 1.0), None);
        assert_eq!(hue_at(Rect::new(0.0, 0.0, 0.0, 10.0), 1.0), None);
    }

    #[test]
    fn dragging_updates_derived_hex() {
        let mut p = PickerColor::default();
        assert_eq!(p.current().to_string(), "#ff0000");
        p.set_hue(120.0);
        assert_eq!(p.current().to_string(), "#00ff00");
        p.set_sat_bri(0.0, 100.0);
        assert_eq!(p.current().to_string(), "#ffffff");
        assert_eq!(p.surface_cursor(), (0.0, 0.0));
    }

    #[test]
    fn invalid_hex_text_leaves_state_alone() {
        let mut p = PickerColor::default();
        let before = p;
        for partial in ["#", "#ff", "#ff00a", "ff00aa", "#ff00aag", " #00ff00 ", "#00ff00\n", "\t#00ff00"] {
            assert!(!p.set_hex_text(partial));
        }
        assert_eq!(p, before);
        assert!(p.set_hex_text("#FF00AA"));
        assert_eq!(p.current().to_string(), "#ff00aa");
        assert_eq!(p.hsb(), before.hsb());
    }

    #[test]
    fn drag_state_gates_moves() {
        let mut d = DragState::default();
        assert!(!d.is_held());
        d.press();
        assert!(d.is_held());
        d.release();
        assert!(!d.is_held());
    }
}
