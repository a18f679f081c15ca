//! The tool's working set. Owned by one tool instance at a time and handed
//! to the next instance on remount.

use crate::color::HexColor;
use crate::config::{ZOOM_MAX, ZOOM_MIN};
use crate::error::ToolError;
use crate::layers::{LayerId, LayerStack};
use crate::palette::Palette;
use crate::picker::PickerColor;
use crate::storage::KeyValueStore;

/// Zoom percentage of the promo image viewer, always within
/// `ZOOM_MIN..=ZOOM_MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Zoom(u16);

impl Default for Zoom {
    fn default() -> Self {
        Zoom(ZOOM_MIN)
    }
}

impl Zoom {
    pub fn new(percent: f64) -> Self {
        if percent.is_nan() {
            return Self::default();
        }
        Zoom(percent.round().clamp(f64::from(ZOOM_MIN), f64::from(ZOOM_MAX)) as u16)
    }

    pub fn percent(self) -> u16 {
        self.0
    }

    pub fn scale(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToolState {
    pub picker: PickerColor,
    pub selection: Option<LayerId>,
    pub palette: Palette,
    pub layers: LayerStack,
    pub zoom: Zoom,
}

impl ToolState {
    /// Fresh state with the palette read from durable storage.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            palette: Palette::load(store),
            ..Self::default()
        }
    }

    pub fn current_color(&self) -> HexColor {
        self.picker.current()
    }

    /// Only catalog parts are recolorable. The overlay, the background and
    /// unknown ids are rejected and leave the selection as it was.
    pub fn select_layer(&mut self, id: LayerId) -> bool {
        if !matches!(id, LayerId::Part(_)) || self.layers.get(id).is_none() {
            return false;
        }
        self.selection = Some(id);
        true
    }

    pub fn toggle_layer_visible(&mut self, id: LayerId) -> bool {
        self.layers.toggle_visible(id)
    }

    /// Assigns the picker color to the selected layer.
    pub fn apply_color(&mut self) -> Result<LayerId, ToolError> {
        let id = self.selection.ok_or(ToolError::NoLayerSelected)?;
        let color = self.picker.current();
        if !self.layers.set_color(id, color) {
            return Err(ToolError::NoLayerSelected);
        }
        Ok(id)
    }

    /// Caller confirms with the user first.
    pub fn reset_all(&mut self) {
        self.layers.reset_colors();
    }

    pub fn add_to_palette(&mut self, store: &dyn KeyValueStore) -> Result<bool, ToolError> {
        let color = self.picker.current();
        self.palette.add(color, store)
    }

    pub fn remove_from_palette(&mut self, index: usize, store: &dyn KeyValueStore) -> Option<HexColor> {
        self.palette.remove(index, store)
    }

    /// Fails on an empty palette before any confirmation is asked.
    pub fn check_palette_resettable(&self) -> Result<(), ToolError> {
        if self.palette.is_empty() {
            Err(ToolError::PaletteEmpty)
        } else {
            Ok(())
        }
    }

    pub fn reset_palette(&mut self, store: &dyn KeyValueStore) -> Result<(), ToolError> {
        self.palette.clear(store)
    }

    /// Picking a palette swatch sets the color but leaves the sliders.
    pub fn use_palette_color(&mut self, index: usize) -> Option<HexColor> {
        let color = *self.palette.colors().get(index)?;
        self.picker.set_hex(color);
        Some(color)
    }
}
