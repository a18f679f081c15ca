//! Coloring contest core crate.
//!
//! A line-art figure split into tintable part layers, a fixed line overlay on
//! top and a flat background underneath. The pure modules (color math, layer
//! stack, palette, picker, loading, compositing) carry no browser types and
//! run under `cargo test` on the host; `tool` binds them to the page.

use wasm_bindgen::prelude::*;

pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod eyedropper;
pub mod layers;
pub mod loading;
pub mod palette;
pub mod picker;
pub mod state;
pub mod storage;
mod tool;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

pub use color::{HexColor, Hsb, Rgb, hex_to_rgb, hsb_to_hex};
pub use error::{StorageError, ToolError};
pub use layers::{LayerId, LayerStack};
pub use loading::{ImageSet, LoadSummary, ToolPhase};
pub use palette::Palette;
pub use state::ToolState;
pub use tool::{ColoringTool, init_coloring_tool};

/// `hsbToHex(h, s, b)` for page scripts that draw their own swatches.
#[wasm_bindgen(js_name = hsbToHex)]
pub fn hsb_to_hex_js(h: f64, s: f64, b: f64) -> String {
    hsb_to_hex(h, s, b)
}
