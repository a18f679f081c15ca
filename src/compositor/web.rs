//! `<canvas>` backed surface.
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, ImageData};

use super::{Surface, tint_pixels};
use crate::color::Rgb;

pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    // offscreen canvas reused for tinted layers
    scratch: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
}

impl WebSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx, scratch: None })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn scratch(&mut self) -> Result<&(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
        if self.scratch.is_none() {
            let document = self
                .canvas
                .owner_document()
                .ok_or_else(|| JsValue::from_str("canvas is not attached to a document"))?;
            let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
            let ctx = context_2d(&canvas)?;
            self.scratch = Some((canvas, ctx));
        }
        self.scratch
            .as_ref()
            .ok_or_else(|| JsValue::from_str("scratch canvas unavailable"))
    }
}

/// `{ willReadFrequently: true }`. Both canvases are read back with
/// `getImageData` (tinting, eyedropper).
pub fn context_options() -> Result<js_sys::Object, JsValue> {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &JsValue::from_str("willReadFrequently"), &JsValue::TRUE)?;
    Ok(options)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context_with_context_options("2d", &JsValue::from(context_options()?))?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

impl Surface for WebSurface {
    type Image = HtmlImageElement;
    type Error = JsValue;

    fn image_size(image: &HtmlImageElement) -> (u32, u32) {
        (image.natural_width(), image.natural_height())
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) -> Result<(), JsValue> {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, f64::from(w), f64::from(h));
        Ok(())
    }

    fn fill(&mut self, color: Rgb) -> Result<(), JsValue> {
        let (w, h) = self.size();
        self.ctx
            .set_fill_style(&JsValue::from_str(&color.to_hex().to_string()));
        self.ctx.fill_rect(0.0, 0.0, f64::from(w), f64::from(h));
        Ok(())
    }

    fn draw_image(&mut self, image: &HtmlImageElement) -> Result<(), JsValue> {
        let (w, h) = self.size();
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, f64::from(w), f64::from(h))
    }

    fn draw_tinted(&mut self, image: &HtmlImageElement, tint: Rgb) -> Result<(), JsValue> {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return Ok(());
        }
        let (scratch, sctx) = self.scratch()?.clone();
        // resizing also clears the previous layer
        scratch.set_width(w);
        scratch.set_height(h);
        sctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, f64::from(w), f64::from(h))?;
        let mut pixels = sctx
            .get_image_data(0.0, 0.0, f64::from(w), f64::from(h))?
            .data();
        tint_pixels(&mut pixels.0, tint);
        let tinted = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&pixels.0), w, h)?;
        sctx.put_image_data(&tinted, 0.0, 0.0)?;
        self.ctx.draw_image_with_html_canvas_element(&scratch, 0.0, 0.0)
    }

    fn sample(&self, x: u32, y: u32) -> Result<Option<Rgb>, JsValue> {
        let (w, h) = self.size();
        if x >= w || y >= h {
            return Ok(None);
        }
        let data = self
            .ctx
            .get_image_data(f64::from(x), f64::from(y), 1.0, 1.0)?
            .data();
        Ok(match data.0.as_slice() {
            [r, g, b, ..] => Some(Rgb::new(*r, *g, *b)),
            _ => None,
        })
    }
}
