//! Compile-time configuration for the coloring tool.
//!
//! Asset paths, DOM element ids and user-facing texts are fixed by the page
//! that hosts the tool; nothing here is read at runtime.

/// Asset number of the line-art image. It doubles as the size reference for
/// the canvas and as the always-on-top fixed overlay.
pub const BASE_ASSET: u8 = 1;

/// Number of layer PNGs shipped with the page (`images/1.png` ..= `images/13.png`).
pub const ASSET_COUNT: u8 = 13;

/// Source PNGs are authored at twice the displayed canvas resolution.
pub const CANVAS_DOWNSCALE: u32 = 2;

/// URL of the PNG for a given asset number.
pub fn asset_url(asset: u8) -> String {
    format!("./images/{asset}.png")
}

/// Every asset number with its URL, in load order.
pub fn asset_manifest() -> impl Iterator<Item = (u8, String)> {
    (1..=ASSET_COUNT).map(|n| (n, asset_url(n)))
}

// --- Palette ---------------------------------------------------------------

pub const PALETTE_STORAGE_KEY: &str = "ctPalette";
pub const PALETTE_CAPACITY: usize = 24;

// --- Picker defaults -------------------------------------------------------

pub const DEFAULT_HUE: f64 = 0.0;
pub const DEFAULT_SATURATION: f64 = 100.0;
pub const DEFAULT_BRIGHTNESS: f64 = 100.0;
pub const BACKGROUND_DEFAULT: &str = "#ffffff";

// --- Promo viewer ----------------------------------------------------------

pub const ZOOM_MIN: u16 = 100;
pub const ZOOM_MAX: u16 = 400;

// --- Export ----------------------------------------------------------------

pub const EXPORT_FILENAME: &str = "coloring_contest.png";
pub const SHARE_INTENT_BASE: &str = "https://twitter.com/intent/tweet?text=";
pub const SHARE_CAPTION: &str = "#御手洗みたら 御手洗遊 新衣装 塗り絵コンテストに参加しました!\n(画像が自動ダウンロードされました。画像を添付して投稿してください!)";

// --- Confirmation prompts --------------------------------------------------

pub const CONFIRM_RESET_ALL: &str = "すべてのレイヤーの色をリセットしますか？";
pub const CONFIRM_RESET_PALETTE: &str = "マイパレットをリセットしますか？";

// --- DOM element ids -------------------------------------------------------

/// Id suffixes of the synchronized control views (desktop, mobile).
/// Every per-view id below is looked up once per suffix.
pub const VIEW_SUFFIXES: &[&str] = &["", "-m"];

pub mod ids {
    pub const CANVAS: &str = "ct-canvas";
    pub const CANVAS_WRAP_CLASS: &str = "ct-canvas-wrap";
    pub const LOADING: &str = "ct-loading";
    pub const ERROR: &str = "ct-error";
    pub const EYEDROP_HINT: &str = "ct-eyedrop-hint";
    pub const DOWNLOAD: &str = "ct-download";
    pub const SHARE: &str = "ct-tweet";
    pub const DLBAR: &str = "ct-dlbar";
    pub const DLBAR_CLOSE: &str = "ct-dlbar-close";

    // per-view (suffixed)
    pub const SB_SURFACE: &str = "ct-hsv-picker";
    pub const SB_CURSOR: &str = "ct-hsv-cursor";
    pub const HUE_CURSOR: &str = "ct-cursor";
    pub const PREVIEW: &str = "ct-preview";
    pub const HEX_INPUT: &str = "ct-hex";
    pub const PALETTE: &str = "ct-custom-palette";
    pub const LAYER_LIST: &str = "ct-layer-list";
    pub const EYEDROP: &str = "ct-eyedrop";
    pub const ADD_PALETTE: &str = "ct-add-palette";
    pub const RESET_PALETTE: &str = "ct-reset-palette";
    pub const APPLY: &str = "ct-apply";
    pub const RESET_ALL: &str = "ct-reset-all";

    /// Hue bars are matched by class; each view owns one.
    pub const HUE_BAR_CLASS: &str = "ct-colorbar-wrap";

    // slide panel
    pub const PANEL: &str = "ct-slide-panel";
    pub const PANEL_OVERLAY: &str = "ct-overlay";
    pub const PANEL_TOGGLE: &str = "ct-panel-toggle";
    pub const PANEL_CLOSE: &str = "ct-panel-close-btn";

    // promo viewer
    pub const PROMO_BUTTON_CLASS: &str = "ct-promo-btn";
    pub const VIEWER: &str = "ct-img-modal";
    pub const VIEWER_IMAGE: &str = "ct-modal-img";
    pub const VIEWER_CLOSE: &str = "ct-modal-close";
    pub const ZOOM_SLIDER: &str = "ct-zoom-slider";
    pub const ZOOM_RESET: &str = "ct-zoom-reset";
    pub const ZOOM_LABEL: &str = "ct-zoom-pct";
}
