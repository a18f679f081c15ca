//! Single-shot color sampling from the rendered canvas.

use crate::picker::Rect;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eyedropper {
    active: bool,
}

impl Eyedropper {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Maps a client-space point over the displayed canvas to a pixel of its
/// backing store. The displayed size and the pixel size differ, so both axes
/// are scaled, then clamped to the last row/column.
///
/// Returns `None` for a canvas with no pixels or no displayed area.
pub fn canvas_point(displayed: Rect, pixel_size: (u32, u32), x: f64, y: f64) -> Option<(u32, u32)> {
    let (width, height) = pixel_size;
    if width == 0 || height == 0 || !(displayed.width > 0.0 && displayed.height > 0.0) {
        return None;
    }
    let scale_x = f64::from(width) / displayed.width;
    let scale_y = f64::from(height) / displayed.height;
    let px = ((x - displayed.left) * scale_x).round();
    let py = ((y - displayed.top) * scale_y).round();
    let cx = px.clamp(0.0, f64::from(width - 1)) as u32;
    let cy = py.clamp(0.0, f64::from(height - 1)) as u32;
    Some((cx, cy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_displayed_to_pixel_coordinates() {
        // 400x300 backing store shown at 200x150 offset by (50, 10)
        let shown = Rect::new(50.0, 10.0, 200.0, 150.0);
        assert_eq!(canvas_point(shown, (400, 300), 50.0, 10.0), Some((0, 0)));
        assert_eq!(canvas_point(shown, (400, 300), 150.0, 85.0), Some((200, 150)));
    }

    #[test]
    fn clamps_to_last_pixel() {
        let shown = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(canvas_point(shown, (100, 100), 100.0, 100.0), Some((99, 99)));
        assert_eq!(canvas_point(shown, (100, 100), -20.0, 500.0), Some((0, 99)));
    }

    #[test]
    fn empty_canvas_has_no_pixel() {
        let shown = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(canvas_point(shown, (0, 0), 10.0, 10.0), None);
        assert_eq!(canvas_point(Rect::new(0.0, 0.0, 0.0, 0.0), (10, 10), 1.0, 1.0), None);
    }

    #[test]
    fn toggle_flips_mode() {
        let mut e = Eyedropper::default();
        assert!(e.toggle());
        assert!(!e.toggle());
        e.toggle();
        e.deactivate();
        assert!(!e.is_active());
    }
}
