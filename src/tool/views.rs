//! DOM handles of the synchronized control views (desktop, mobile, ...).
//!
//! One logical control is bound to a set of views; every paint iterates the
//! set so the views stay mirror-consistent.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::color::HexColor;
use crate::config::{VIEW_SUFFIXES, ids};
use crate::layers::{LayerId, OVERLAY_NAME};
use crate::palette::Palette;
use crate::picker::PickerColor;
use crate::state::ToolState;

const EYE_OPEN: &str = "👁️";
const EYE_CLOSED: &str = "👁️‍🗨️";

/// Attribute marking a palette swatch with its index.
pub(crate) const ATTR_SWATCH: &str = "data-swatch";
/// Attribute marking a palette delete control with its index.
pub(crate) const ATTR_SWATCH_DELETE: &str = "data-swatch-del";
/// Attribute marking a selectable layer row with its token.
pub(crate) const ATTR_SELECT: &str = "data-select";
/// Attribute marking an eye toggle with its layer token.
pub(crate) const ATTR_EYE: &str = "data-layer";

#[derive(Default)]
pub(crate) struct ControlView {
    pub sb_surface: Option<HtmlElement>,
    pub sb_cursor: Option<HtmlElement>,
    pub hue_bar: Option<HtmlElement>,
    pub hue_cursor: Option<HtmlElement>,
    pub preview: Option<HtmlElement>,
    pub hex_input: Option<HtmlInputElement>,
    pub palette: Option<Element>,
    pub layer_list: Option<Element>,
    pub eyedrop: Option<Element>,
    pub add_palette: Option<Element>,
    pub reset_palette: Option<Element>,
    pub apply: Option<Element>,
    pub reset_all: Option<Element>,
}

pub(crate) struct ControlViews {
    pub views: Vec<ControlView>,
    pub canvas_wrap: Option<Element>,
    pub eyedrop_hint: Option<Element>,
    pub loading: Option<HtmlElement>,
    pub error: Option<HtmlElement>,
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id).and_then(|el| el.dyn_into().ok())
}

fn html_by_class(document: &Document, class: &str) -> Vec<HtmlElement> {
    let Ok(list) = document.query_selector_all(&format!(".{class}")) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into().ok())
        .collect()
}

impl ControlViews {
    pub fn discover(document: &Document) -> Self {
        let mut hue_bars = html_by_class(document, ids::HUE_BAR_CLASS).into_iter();
        let views = VIEW_SUFFIXES
            .iter()
            .map(|suffix| {
                let id = |base: &str| format!("{base}{suffix}");
                ControlView {
                    sb_surface: by_id(document, &id(ids::SB_SURFACE)),
                    sb_cursor: by_id(document, &id(ids::SB_CURSOR)),
                    hue_bar: hue_bars.next(),
                    hue_cursor: by_id(document, &id(ids::HUE_CURSOR)),
                    preview: by_id(document, &id(ids::PREVIEW)),
                    hex_input: by_id(document, &id(ids::HEX_INPUT)),
                    palette: by_id(document, &id(ids::PALETTE)),
                    layer_list: by_id(document, &id(ids::LAYER_LIST)),
                    eyedrop: by_id(document, &id(ids::EYEDROP)),
                    add_palette: by_id(document, &id(ids::ADD_PALETTE)),
                    reset_palette: by_id(document, &id(ids::RESET_PALETTE)),
                    apply: by_id(document, &id(ids::APPLY)),
                    reset_all: by_id(document, &id(ids::RESET_ALL)),
                }
            })
            .collect();
        Self {
            views,
            canvas_wrap: document
                .query_selector(&format!(".{}", ids::CANVAS_WRAP_CLASS))
                .ok()
                .flatten(),
            eyedrop_hint: by_id(document, ids::EYEDROP_HINT),
            loading: by_id(document, ids::LOADING),
            error: by_id(document, ids::ERROR),
        }
    }

    /// Full picker refresh after a slider moved.
    pub fn paint_picker(&self, picker: &PickerColor) -> Result<(), JsValue> {
        let hsb = picker.hsb();
        let backdrop = hsb.pure_hue_css();
        let (left, top) = picker.surface_cursor();
        let hue_left = picker.hue_cursor();
        for view in &self.views {
            if let Some(surface) = &view.sb_surface {
                surface.style().set_property("background", &backdrop)?;
            }
            if let Some(cursor) = &view.sb_cursor {
                cursor.style().set_property("left", &format!("{left}%"))?;
                cursor.style().set_property("top", &format!("{top}%"))?;
            }
            if let Some(cursor) = &view.hue_cursor {
                cursor.style().set_property("left", &format!("{hue_left}%"))?;
            }
        }
        self.paint_current(picker.current())
    }

    /// Preview swatches and hex readouts only; sliders stay where they are.
    pub fn paint_current(&self, color: HexColor) -> Result<(), JsValue> {
        let hex = color.to_string();
        for view in &self.views {
            if let Some(preview) = &view.preview {
                preview.style().set_property("background-color", &hex)?;
            }
            if let Some(input) = &view.hex_input {
                input.set_value(&hex);
            }
        }
        Ok(())
    }

    pub fn paint_palette(&self, palette: &Palette) {
        let html: String = palette
            .colors()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                format!(
                    "<div class=\"ct-palette-swatch\" {ATTR_SWATCH}=\"{i}\" style=\"background-color:{c};position:relative\" title=\"{c}\">\
                     <button class=\"ct-palette-del\" {ATTR_SWATCH_DELETE}=\"{i}\">x</button></div>"
                )
            })
            .collect();
        for container in self.views.iter().filter_map(|v| v.palette.as_ref()) {
            container.set_inner_html(&html);
        }
    }

    pub fn paint_layers(&self, state: &ToolState) {
        let eye = |visible: bool| if visible { EYE_OPEN } else { EYE_CLOSED };
        let mut html = format!(
            "<div class=\"ct-layer-item fixed\"><div class=\"ct-layer-left\"><span class=\"ct-layer-name\">{OVERLAY_NAME}</span></div>\
             <button class=\"ct-eye-btn\" {ATTR_EYE}=\"{}\">{}</button></div>",
            LayerId::Overlay.token(),
            eye(state.layers.overlay_visible()),
        );
        for layer in state.layers.layers() {
            let token = layer.id.token();
            let selected = if state.selection == Some(layer.id) { " selected" } else { "" };
            // the background row only carries its eye toggle
            let select = if layer.is_background() {
                String::new()
            } else {
                format!(" {ATTR_SELECT}=\"{token}\"")
            };
            let swatch = layer.color.unwrap_or(HexColor::WHITE);
            let name = layer.name;
            html.push_str(&format!(
                "<div class=\"ct-layer-item{selected}\"{select}><div class=\"ct-layer-left\">\
                 <div class=\"ct-layer-swatch\" style=\"background:{swatch}\"></div><span class=\"ct-layer-name\">{name}</span></div>\
                 <button class=\"ct-eye-btn\" {ATTR_EYE}=\"{token}\">{}</button></div>",
                eye(layer.visible),
            ));
        }
        for list in self.views.iter().filter_map(|v| v.layer_list.as_ref()) {
            list.set_inner_html(&html);
        }
    }

    pub fn paint_eyedrop(&self, active: bool) -> Result<(), JsValue> {
        for button in self.views.iter().filter_map(|v| v.eyedrop.as_ref()) {
            button.class_list().toggle_with_force("active", active)?;
        }
        if let Some(hint) = &self.eyedrop_hint {
            hint.class_list().toggle_with_force("active", active)?;
        }
        if let Some(wrap) = &self.canvas_wrap {
            wrap.class_list().toggle_with_force("eyedrop-mode", active)?;
        }
        Ok(())
    }

    pub fn show_loading(&self, shown: bool) -> Result<(), JsValue> {
        set_displayed(self.loading.as_ref(), shown)
    }

    pub fn show_error(&self, shown: bool) -> Result<(), JsValue> {
        set_displayed(self.error.as_ref(), shown)
    }
}

pub(crate) fn set_displayed(element: Option<&HtmlElement>, shown: bool) -> Result<(), JsValue> {
    if let Some(el) = element {
        el.style()
            .set_property("display", if shown { "block" } else { "none" })?;
    }
    Ok(())
}
