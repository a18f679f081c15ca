//! Export of the composited picture: PNG download and the share intent.
//!
//! The share intent cannot carry the image. Its caption tells the user to
//! attach the file the download just produced.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, HtmlElement, Window};

use crate::config::{EXPORT_FILENAME, SHARE_CAPTION, SHARE_INTENT_BASE};

/// `encodeURIComponent`. The browser's own on wasm32, the portable encoder
/// elsewhere.
pub fn encode_uri_component(text: &str) -> String {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::encode_uri_component(text).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        encode_uri_component_portable(text)
    }
}

/// Percent-encodes like JavaScript's `encodeURIComponent`: everything but
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped as UTF-8 bytes.
pub fn encode_uri_component_portable(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(char::from(byte)),
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

pub fn share_intent_url(caption: &str) -> String {
    format!("{SHARE_INTENT_BASE}{}", encode_uri_component(caption))
}

/// Saves the canvas as [`EXPORT_FILENAME`] through a temporary link.
pub fn download_canvas(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let document = canvas
        .owner_document()
        .ok_or_else(|| JsValue::from_str("canvas is not attached to a document"))?;
    let url = canvas.to_data_url()?;
    let link = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    link.set_attribute("href", &url)?;
    link.set_attribute("download", EXPORT_FILENAME)?;
    link.click();
    Ok(())
}

/// Downloads first, then opens the prefilled compose window.
pub fn share_canvas(canvas: &HtmlCanvasElement, window: &Window) -> Result<(), JsValue> {
    download_canvas(canvas)?;
    window.open_with_url_and_target(&share_intent_url(SHARE_CAPTION), "_blank")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(encode_uri_component_portable("Az09-_.!~*'()"), "Az09-_.!~*'()");
    }

    #[test]
    fn reserved_and_multibyte_are_escaped() {
        assert_eq!(encode_uri_component_portable("a b#c\n"), "a%20b%23c%0A");
        assert_eq!(encode_uri_component_portable("塗"), "%E5%A1%97");
    }

    #[test]
    fn share_url_carries_caption() {
        let url = share_intent_url(SHARE_CAPTION);
        assert!(url.starts_with("https://twitter.com/intent/tweet?text=%23"));
        assert!(!url[SHARE_INTENT_BASE.len()..].contains(' '));
    }
}
