//! Slide-in control panel and the full-screen promo image viewer.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement};

use super::views::set_displayed;
use crate::config::ids;
use crate::state::Zoom;

pub(crate) struct SlidePanel {
    parts: Vec<Element>,
}

impl SlidePanel {
    pub fn discover(document: &Document) -> Self {
        let parts = [ids::PANEL, ids::PANEL_OVERLAY, ids::PANEL_CLOSE]
            .iter()
            .filter_map(|id| document.get_element_by_id(id))
            .collect();
        Self { parts }
    }

    pub fn toggle(&self) -> Result<(), JsValue> {
        for part in &self.parts {
            part.class_list().toggle("active")?;
        }
        Ok(())
    }

    pub fn close(&self) -> Result<(), JsValue> {
        for part in &self.parts {
            part.class_list().remove_1("active")?;
        }
        Ok(())
    }
}

pub(crate) struct PromoViewer {
    pub modal: Option<Element>,
    pub image: Option<HtmlImageElement>,
    slider: Option<HtmlInputElement>,
    label: Option<Element>,
}

impl PromoViewer {
    pub fn discover(document: &Document) -> Self {
        use wasm_bindgen::JsCast;
        let typed = |id: &str| document.get_element_by_id(id);
        Self {
            modal: typed(ids::VIEWER),
            image: typed(ids::VIEWER_IMAGE).and_then(|e| e.dyn_into().ok()),
            slider: typed(ids::ZOOM_SLIDER).and_then(|e| e.dyn_into().ok()),
            label: typed(ids::ZOOM_LABEL),
        }
    }

    /// Shows `src` at 100%.
    pub fn open(&self, src: &str, alt: &str, zoom: &mut Zoom) -> Result<(), JsValue> {
        let Some(modal) = &self.modal else {
            return Ok(());
        };
        if let Some(image) = &self.image {
            image.set_src(src);
            image.set_alt(alt);
        }
        modal.class_list().add_1("active")?;
        *zoom = Zoom::default();
        self.paint_zoom(*zoom)
    }

    pub fn close(&self) -> Result<(), JsValue> {
        let Some(modal) = &self.modal else {
            return Ok(());
        };
        modal.class_list().remove_1("active")?;
        if let Some(image) = &self.image {
            image.set_src("");
        }
        Ok(())
    }

    pub fn paint_zoom(&self, zoom: Zoom) -> Result<(), JsValue> {
        if let Some(image) = &self.image {
            image
                .style()
                .set_property("transform", &format!("scale({})", zoom.scale()))?;
        }
        if let Some(slider) = &self.slider {
            slider.set_value(&zoom.percent().to_string());
        }
        if let Some(label) = &self.label {
            label.set_text_content(Some(&format!("{}%", zoom.percent())));
        }
        Ok(())
    }
}

/// The download notice bar only ever gets hidden.
pub(crate) fn hide_download_bar(document: &Document) -> Result<(), JsValue> {
    use wasm_bindgen::JsCast;
    let bar = document
        .get_element_by_id(ids::DLBAR)
        .and_then(|e| e.dyn_into::<HtmlElement>().ok());
    set_displayed(bar.as_ref(), false)
}
