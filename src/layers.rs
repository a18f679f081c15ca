//! Layer catalog and the mutable per-layer color/visibility state.
//!
//! The catalog is fixed: one background fill followed by the recolorable
//! garment parts, in paint order (bottom to top). The line-art overlay is not
//! part of the catalog; it is painted last when `overlay_visible` is set.

use crate::color::HexColor;
use crate::config::BASE_ASSET;

/// Stable layer identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerId {
    /// Solid fill underneath everything.
    Background,
    /// Always-on-top line art (asset [`BASE_ASSET`]).
    Overlay,
    /// A recolorable part; the number is also its asset number.
    Part(u8),
}

impl LayerId {
    /// Asset number of the image backing this layer, if any.
    pub fn asset(self) -> Option<u8> {
        match self {
            LayerId::Background => None,
            LayerId::Overlay => Some(BASE_ASSET),
            LayerId::Part(n) => Some(n),
        }
    }

    /// Value used in `data-layer` attributes.
    pub fn token(self) -> String {
        match self {
            LayerId::Background => "background".to_string(),
            LayerId::Overlay => "fixed".to_string(),
            LayerId::Part(n) => n.to_string(),
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "background" => Some(LayerId::Background),
            "fixed" => Some(LayerId::Overlay),
            other => other.parse().ok().map(LayerId::Part),
        }
    }
}

/// Static catalog: (part number, display name), paint order after the background.
pub const PART_CATALOG: &[(u8, &str)] = &[
    (2, "帽子"),
    (3, "フリル"),
    (4, "ライン"),
    (5, "胸リボン"),
    (6, "上着"),
    (7, "靴下リボン"),
    (8, "靴下"),
    (9, "スカート"),
    (10, "靴"),
    (11, "髪リボン"),
    (12, "イヤリング"),
    (13, "襟"),
];

pub const BACKGROUND_NAME: &str = "背景";
pub const OVERLAY_NAME: &str = "レイヤー1 (固定)";

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: &'static str,
    /// `None` paints the source pixels unmodified.
    pub color: Option<HexColor>,
    pub visible: bool,
}

impl Layer {
    pub fn is_background(&self) -> bool {
        self.id == LayerId::Background
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerStack {
    layers: Vec<Layer>,
    overlay_visible: bool,
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::catalog()
    }
}

impl LayerStack {
    /// Fresh stack: white background, every part unset and visible.
    pub fn catalog() -> Self {
        let mut layers = Vec::with_capacity(PART_CATALOG.len() + 1);
        layers.push(Layer {
            id: LayerId::Background,
            name: BACKGROUND_NAME,
            color: Some(HexColor::WHITE),
            visible: true,
        });
        layers.extend(PART_CATALOG.iter().map(|&(n, name)| Layer {
            id: LayerId::Part(n),
            name,
            color: None,
            visible: true,
        }));
        Self {
            layers,
            overlay_visible: true,
        }
    }

    /// Catalog layers in paint order (background first).
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        id == LayerId::Overlay || self.get(id).is_some()
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn is_visible(&self, id: LayerId) -> bool {
        match id {
            LayerId::Overlay => self.overlay_visible,
            other => self.get(other).is_some_and(|l| l.visible),
        }
    }

    /// Flips visibility. Returns `false` when `id` names no layer.
    pub fn toggle_visible(&mut self, id: LayerId) -> bool {
        if id == LayerId::Overlay {
            self.overlay_visible = !self.overlay_visible;
            return true;
        }
        match self.get_mut(id) {
            Some(layer) => {
                layer.visible = !layer.visible;
                true
            }
            None => false,
        }
    }

    pub fn set_color(&mut self, id: LayerId, color: HexColor) -> bool {
        match self.get_mut(id) {
            Some(layer) => {
                layer.color = Some(color);
                true
            }
            None => false,
        }
    }

    /// Parts revert to source pixels, background back to white. Visibility
    /// is left alone.
    pub fn reset_colors(&mut self) {
        for layer in &mut self.layers {
            layer.color = layer.is_background().then_some(HexColor::WHITE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_one_background_first() {
        let stack = LayerStack::catalog();
        let bg: Vec<_> = stack.layers().iter().filter(|l| l.is_background()).collect();
        assert_eq!(bg.len(), 1);
        assert!(stack.layers()[0].is_background());
        assert_eq!(stack.layers().len(), 13);
        assert!(stack.overlay_visible());
    }

    #[test]
    fn toggling_unknown_layer_is_rejected() {
        let mut stack = LayerStack::catalog();
        assert!(!stack.toggle_visible(LayerId::Part(1)));
        assert!(!stack.toggle_visible(LayerId::Part(99)));
        assert_eq!(stack, LayerStack::catalog());
    }

    #[test]
    fn overlay_and_background_toggle_through_same_path() {
        let mut stack = LayerStack::catalog();
        assert!(stack.toggle_visible(LayerId::Overlay));
        assert!(stack.toggle_visible(LayerId::Background));
        assert!(!stack.is_visible(LayerId::Overlay));
        assert!(!stack.is_visible(LayerId::Background));
    }

    #[test]
    fn reset_keeps_visibility() {
        let mut stack = LayerStack::catalog();
        let red: HexColor = "#ff0000".parse().unwrap();
        stack.set_color(LayerId::Part(5), red);
        stack.set_color(LayerId::Background, red);
        stack.toggle_visible(LayerId::Part(6));
        stack.reset_colors();
        assert_eq!(stack.get(LayerId::Part(5)).unwrap().color, None);
        assert_eq!(stack.get(LayerId::Background).unwrap().color, Some(HexColor::WHITE));
        assert!(!stack.is_visible(LayerId::Part(6)));
    }

    #[test]
    fn tokens_round_trip() {
        for id in [LayerId::Background, LayerId::Overlay, LayerId::Part(7)] {
            assert_eq!(LayerId::from_token(&id.token()), Some(id));
        }
        assert_eq!(LayerId::from_token("hat"), None);
    }
}
