//! DOM entry point of the coloring tool.
//!
//! The host page injects the tool markup and calls [`init_coloring_tool`].
//! When it rebuilds that markup (language switch) it calls it again with the
//! previous [`ColoringTool`]: every listener of the old instance is dropped
//! first, then its state and loaded images move into the new instance.
//! Listeners are `gloo` [`EventListener`]s owned by the tool, so dropping the
//! tool (or calling `free()` from JS) detaches them.

mod viewer;
mod views;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlCanvasElement, HtmlImageElement, HtmlInputElement, KeyboardEvent,
    MouseEvent, TouchEvent, Window,
};

use crate::compositor::web::WebSurface;
use crate::compositor::{Surface, draw_layers};
use crate::config::{CONFIRM_RESET_ALL, CONFIRM_RESET_PALETTE, asset_manifest, ids};
use crate::error::{StorageError, ToolError};
use crate::export;
use crate::eyedropper::{Eyedropper, canvas_point};
use crate::layers::LayerId;
use crate::loading::{ImageSet, LoadSummary, ToolPhase};
use crate::picker::{DragState, Rect, hue_at, sat_bri_at};
use crate::state::{ToolState, Zoom};
use crate::storage::{BrowserStore, KeyValueStore};

use viewer::{PromoViewer, SlidePanel, hide_download_bar};
use views::{ATTR_EYE, ATTR_SELECT, ATTR_SWATCH, ATTR_SWATCH_DELETE, ControlViews};

type Shared = Rc<RefCell<Session>>;

/// Session that pending image loads report to. Repointed on remount so loads
/// started by an earlier instance finish in the one that owns the images now.
type LoadTarget = Rc<RefCell<Weak<RefCell<Session>>>>;

/// Everything one mounted instance works on.
struct Session {
    state: ToolState,
    images: ImageSet<HtmlImageElement>,
    surface: WebSurface,
    eyedropper: Eyedropper,
    views: ControlViews,
    panel: SlidePanel,
    viewer: PromoViewer,
    load_target: LoadTarget,
}

impl Session {
    fn redraw(&mut self) {
        if let Err(err) = draw_layers(&mut self.surface, &self.state.layers, &self.images) {
            gloo::console::error!("coloring: draw failed", err);
        }
    }

    fn finish_loading(&mut self, summary: LoadSummary) {
        gloo::console::log!(format!(
            "coloring: {} of {} layer images loaded",
            summary.loaded,
            summary.loaded + summary.failed
        ));
        report(self.views.show_loading(false));
        if summary.any_failed() {
            report(self.views.show_error(true));
        }
        self.redraw();
    }

    fn paint_all(&self) {
        report(self.views.paint_picker(&self.state.picker));
        self.views.paint_palette(&self.state.palette);
        self.views.paint_layers(&self.state);
        report(self.views.paint_eyedrop(self.eyedropper.is_active()));
    }

    fn notify(err: ToolError) {
        gloo::dialogs::alert(&err.to_string());
    }
}

/// `localStorage` with failures surfaced on the console. Callers still see
/// the error and fall back to in-memory state.
struct PageStore;

impl KeyValueStore for PageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        BrowserStore.get(key).inspect_err(|err| {
            gloo::console::warn!(format!("coloring: reading {key} failed: {err}"));
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        BrowserStore.set(key, value).inspect_err(|err| {
            gloo::console::warn!(format!("coloring: storing {key} failed: {err}"));
        })
    }
}

fn report(result: Result<(), JsValue>) {
    if let Err(err) = result {
        gloo::console::warn!("coloring: DOM update failed", err);
    }
}

/// A mounted coloring tool. Hand it back to [`init_coloring_tool`] on
/// remount to keep colors, palette, selection and loaded images.
#[wasm_bindgen]
pub struct ColoringTool {
    session: Shared,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl ColoringTool {
    /// `"uninitialized"`, `"loading"` or `"ready"`.
    pub fn phase(&self) -> String {
        match self.session.borrow().images.phase() {
            ToolPhase::Uninitialized => "uninitialized",
            ToolPhase::Loading => "loading",
            ToolPhase::Ready => "ready",
        }
        .to_string()
    }

    pub fn redraw(&self) {
        self.session.borrow_mut().redraw();
    }
}

impl ColoringTool {
    /// Copy of the current working set.
    pub fn state(&self) -> ToolState {
        self.session.borrow().state.clone()
    }

    /// Detaches every listener, then releases the working set.
    fn into_handoff(self) -> (ToolState, ImageSet<HtmlImageElement>, LoadTarget) {
        let ColoringTool { session, listeners } = self;
        drop(listeners);
        let mut s = session.borrow_mut();
        let state = std::mem::take(&mut s.state);
        let images = std::mem::take(&mut s.images);
        (state, images, s.load_target.clone())
    }
}

/// Mounts the tool on the markup currently in the document.
///
/// Returns `previous` untouched when the canvas is missing or unusable.
/// Nothing after the handoff can fail, so a remount never loses the state it
/// was given.
#[wasm_bindgen(js_name = initColoringTool)]
pub fn init_coloring_tool(previous: Option<ColoringTool>) -> Result<Option<ColoringTool>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let Some(canvas) = document.get_element_by_id(ids::CANVAS) else {
        return Ok(previous);
    };
    let canvas: HtmlCanvasElement = match canvas.dyn_into() {
        Ok(canvas) => canvas,
        Err(other) => {
            gloo::console::error!(format!("coloring: #{} is not a <canvas>", ids::CANVAS), other);
            return Ok(previous);
        }
    };
    let surface = match WebSurface::new(canvas.clone()) {
        Ok(surface) => surface,
        Err(err) => {
            gloo::console::error!("coloring: canvas has no 2D context", err);
            return Ok(previous);
        }
    };

    let (state, images, load_target) = match previous {
        Some(tool) => tool.into_handoff(),
        None => (ToolState::load(&PageStore), ImageSet::default(), LoadTarget::default()),
    };
    let phase = images.phase();
    gloo::console::log!(format!("coloring: mounting ({phase:?})"));

    let session: Shared = Rc::new(RefCell::new(Session {
        state,
        images,
        surface,
        eyedropper: Eyedropper::default(),
        views: ControlViews::discover(&document),
        panel: SlidePanel::discover(&document),
        viewer: PromoViewer::discover(&document),
        load_target: load_target.clone(),
    }));
    *load_target.borrow_mut() = Rc::downgrade(&session);

    let mut listeners = Vec::new();
    wire_picker(&session, &window, &mut listeners);
    wire_layers_and_palette(&session, &mut listeners);
    wire_actions(&session, &document, &window, &canvas, &mut listeners);
    wire_eyedropper(&session, &canvas, &mut listeners);
    wire_viewer(&session, &document, &mut listeners);

    {
        let mut s = session.borrow_mut();
        s.paint_all();
        match phase {
            ToolPhase::Ready => {
                report(s.views.show_loading(false));
                if let Some(summary) = s.images.tracker().summary() {
                    report(s.views.show_error(summary.any_failed()));
                }
                s.redraw();
            }
            ToolPhase::Loading => report(s.views.show_loading(true)),
            ToolPhase::Uninitialized => {}
        }
    }
    if phase == ToolPhase::Uninitialized {
        load_images(&session);
    }

    Ok(Some(ColoringTool { session, listeners }))
}

// --- Image loading ----------------------------------------------------------

fn load_images(session: &Shared) {
    let manifest: Vec<(u8, String)> = asset_manifest().collect();
    let target = {
        let mut s = session.borrow_mut();
        s.images.begin(manifest.len());
        report(s.views.show_loading(true));
        s.load_target.clone()
    };
    for (asset, url) in manifest {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                gloo::console::warn!(format!("coloring: cannot create image for {url}"), err);
                let mut s = session.borrow_mut();
                if let Some(summary) = s.images.record_failed(asset) {
                    s.finish_loading(summary);
                }
                continue;
            }
        };
        image.set_cross_origin(Some("anonymous"));

        let sink = target.clone();
        let loaded = image.clone();
        EventListener::once(&image, "load", move |_| {
            let Some(session) = sink.borrow().upgrade() else { return };
            let mut s = session.borrow_mut();
            if let Some(summary) = s.images.record_loaded(asset, loaded) {
                s.finish_loading(summary);
            }
        })
        .forget();

        let sink = target.clone();
        let failed_url = url.clone();
        EventListener::once(&image, "error", move |_| {
            gloo::console::warn!(format!("coloring: failed to load {failed_url}"));
            let Some(session) = sink.borrow().upgrade() else { return };
            let mut s = session.borrow_mut();
            if let Some(summary) = s.images.record_failed(asset) {
                s.finish_loading(summary);
            }
        })
        .forget();

        image.set_src(&url);
    }
}

// --- Pointer helpers --------------------------------------------------------

/// Client coordinates of a mouse event or the first touch of a touch event.
fn client_point(event: &Event) -> Option<(f64, f64)> {
    if event.type_().starts_with("touch") {
        let touch = event.unchecked_ref::<TouchEvent>().touches().get(0)?;
        Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
    } else {
        let mouse = event.dyn_ref::<MouseEvent>()?;
        Some((f64::from(mouse.client_x()), f64::from(mouse.client_y())))
    }
}

fn client_rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

fn closest_attr(event: &Event, attr: &str) -> Option<String> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target.closest(&format!("[{attr}]")).ok()??.get_attribute(attr)
}

/// Press/move/touch wiring shared by both drag surfaces. `interact` gets the
/// pointer position and the surface rect.
fn wire_drag_surface(
    element: &Element,
    drag: &Rc<Cell<DragState>>,
    interact: Rc<dyn Fn(f64, f64, Rect)>,
    listeners: &mut Vec<EventListener>,
) {
    let touch_opts = EventListenerOptions::enable_prevent_default();

    let (el, d, f) = (element.clone(), drag.clone(), interact.clone());
    listeners.push(EventListener::new(element, "mousedown", move |e| {
        let mut state = d.get();
        state.press();
        d.set(state);
        if let Some((x, y)) = client_point(e) {
            f(x, y, client_rect(&el));
        }
    }));

    let (el, d, f) = (element.clone(), drag.clone(), interact.clone());
    listeners.push(EventListener::new(element, "mousemove", move |e| {
        if !d.get().is_held() {
            return;
        }
        if let Some((x, y)) = client_point(e) {
            f(x, y, client_rect(&el));
        }
    }));

    for kind in ["touchstart", "touchmove"] {
        let (el, f) = (element.clone(), interact.clone());
        listeners.push(EventListener::new_with_options(element, kind, touch_opts, move |e| {
            e.prevent_default();
            if let Some((x, y)) = client_point(e) {
                f(x, y, client_rect(&el));
            }
        }));
    }
}

// --- Picker -----------------------------------------------------------------

fn wire_picker(session: &Shared, window: &Window, listeners: &mut Vec<EventListener>) {
    let mut drags: Vec<Rc<Cell<DragState>>> = Vec::new();
    let (surfaces, bars, inputs) = {
        let s = session.borrow();
        let surfaces: Vec<Element> = s.views.views.iter().filter_map(|v| v.sb_surface.clone()).map(Into::into).collect();
        let bars: Vec<Element> = s.views.views.iter().filter_map(|v| v.hue_bar.clone()).map(Into::into).collect();
        let inputs: Vec<HtmlInputElement> = s.views.views.iter().filter_map(|v| v.hex_input.clone()).collect();
        (surfaces, bars, inputs)
    };

    for surface in &surfaces {
        let drag = Rc::new(Cell::new(DragState::default()));
        let sess = session.clone();
        let interact: Rc<dyn Fn(f64, f64, Rect)> = Rc::new(move |x, y, rect| {
            let Some((sat, bri)) = sat_bri_at(rect, x, y) else { return };
            let mut s = sess.borrow_mut();
            s.state.picker.set_sat_bri(sat, bri);
            report(s.views.paint_picker(&s.state.picker));
        });
        wire_drag_surface(surface, &drag, interact, listeners);
        drags.push(drag);
    }

    for bar in &bars {
        let drag = Rc::new(Cell::new(DragState::default()));
        let sess = session.clone();
        let interact: Rc<dyn Fn(f64, f64, Rect)> = Rc::new(move |x, _y, rect| {
            let Some(hue) = hue_at(rect, x) else { return };
            let mut s = sess.borrow_mut();
            s.state.picker.set_hue(hue);
            report(s.views.paint_picker(&s.state.picker));
        });
        wire_drag_surface(bar, &drag, interact, listeners);
        drags.push(drag);
    }

    // one release for every surface, even when the pointer left it
    listeners.push(EventListener::new(window, "mouseup", move |_| {
        for drag in &drags {
            let mut state = drag.get();
            state.release();
            drag.set(state);
        }
    }));

    for input in &inputs {
        let sess = session.clone();
        let field = input.clone();
        listeners.push(EventListener::new(input, "change", move |_| {
            let mut s = sess.borrow_mut();
            if s.state.picker.set_hex_text(&field.value()) {
                report(s.views.paint_current(s.state.picker.current()));
            }
        }));
    }
}

// --- Layer list & palette ---------------------------------------------------

fn wire_layers_and_palette(session: &Shared, listeners: &mut Vec<EventListener>) {
    let (lists, palettes) = {
        let s = session.borrow();
        let lists: Vec<Element> = s.views.views.iter().filter_map(|v| v.layer_list.clone()).collect();
        let palettes: Vec<Element> = s.views.views.iter().filter_map(|v| v.palette.clone()).collect();
        (lists, palettes)
    };

    // Rows are re-rendered on every change, so clicks are delegated to the
    // containers.
    for list in &lists {
        let sess = session.clone();
        listeners.push(EventListener::new(list, "click", move |e| {
            let mut s = sess.borrow_mut();
            if let Some(token) = closest_attr(e, ATTR_EYE) {
                e.stop_propagation();
                let Some(id) = LayerId::from_token(&token) else { return };
                if s.state.toggle_layer_visible(id) {
                    s.views.paint_layers(&s.state);
                    s.redraw();
                }
            } else if let Some(token) = closest_attr(e, ATTR_SELECT) {
                let Some(id) = LayerId::from_token(&token) else { return };
                if s.state.select_layer(id) {
                    s.views.paint_layers(&s.state);
                }
            }
        }));
    }

    for palette in &palettes {
        let sess = session.clone();
        listeners.push(EventListener::new(palette, "click", move |e| {
            let mut s = sess.borrow_mut();
            if let Some(index) = closest_attr(e, ATTR_SWATCH_DELETE) {
                e.stop_propagation();
                let Ok(index) = index.parse::<usize>() else { return };
                if s.state.remove_from_palette(index, &PageStore).is_some() {
                    s.views.paint_palette(&s.state.palette);
                }
            } else if let Some(index) = closest_attr(e, ATTR_SWATCH) {
                let Ok(index) = index.parse::<usize>() else { return };
                if let Some(color) = s.state.use_palette_color(index) {
                    report(s.views.paint_current(color));
                }
            }
        }));
    }
}

// --- Buttons ----------------------------------------------------------------

fn on_click(
    targets: impl IntoIterator<Item = Element>,
    session: &Shared,
    listeners: &mut Vec<EventListener>,
    action: fn(&mut Session),
) {
    for target in targets {
        let sess = session.clone();
        listeners.push(EventListener::new(&target, "click", move |_| {
            action(&mut sess.borrow_mut());
        }));
    }
}

fn apply_color(s: &mut Session) {
    match s.state.apply_color() {
        Ok(_) => {
            s.views.paint_layers(&s.state);
            s.redraw();
        }
        Err(err) => Session::notify(err),
    }
}

fn reset_all(s: &mut Session) {
    if gloo::dialogs::confirm(CONFIRM_RESET_ALL) {
        s.state.reset_all();
        s.views.paint_layers(&s.state);
        s.redraw();
    }
}

fn add_to_palette(s: &mut Session) {
    match s.state.add_to_palette(&PageStore) {
        Ok(true) => s.views.paint_palette(&s.state.palette),
        Ok(false) => {}
        Err(err) => Session::notify(err),
    }
}

fn reset_palette(s: &mut Session) {
    if let Err(err) = s.state.check_palette_resettable() {
        Session::notify(err);
        return;
    }
    if gloo::dialogs::confirm(CONFIRM_RESET_PALETTE) {
        if let Err(err) = s.state.reset_palette(&PageStore) {
            Session::notify(err);
        }
        s.views.paint_palette(&s.state.palette);
    }
}

fn toggle_eyedrop(s: &mut Session) {
    let active = s.eyedropper.toggle();
    report(s.views.paint_eyedrop(active));
}

fn wire_actions(
    session: &Shared,
    document: &Document,
    window: &Window,
    canvas: &HtmlCanvasElement,
    listeners: &mut Vec<EventListener>,
) {
    let collect = |pick: fn(&views::ControlView) -> Option<Element>| -> Vec<Element> {
        session.borrow().views.views.iter().filter_map(pick).collect()
    };
    on_click(collect(|v| v.apply.clone()), session, listeners, apply_color);
    on_click(collect(|v| v.reset_all.clone()), session, listeners, reset_all);
    on_click(collect(|v| v.add_palette.clone()), session, listeners, add_to_palette);
    on_click(collect(|v| v.reset_palette.clone()), session, listeners, reset_palette);
    on_click(collect(|v| v.eyedrop.clone()), session, listeners, toggle_eyedrop);

    if let Some(button) = document.get_element_by_id(ids::DOWNLOAD) {
        let canvas = canvas.clone();
        listeners.push(EventListener::new(&button, "click", move |_| {
            report(export::download_canvas(&canvas));
        }));
    }
    if let Some(button) = document.get_element_by_id(ids::SHARE) {
        let (canvas, window) = (canvas.clone(), window.clone());
        listeners.push(EventListener::new(&button, "click", move |_| {
            report(export::share_canvas(&canvas, &window));
        }));
    }
    if let Some(button) = document.get_element_by_id(ids::DLBAR_CLOSE) {
        let document = document.clone();
        listeners.push(EventListener::new(&button, "click", move |_| {
            report(hide_download_bar(&document));
        }));
    }
}

// --- Eyedropper -------------------------------------------------------------

fn pick_from_canvas(s: &mut Session, canvas: &HtmlCanvasElement, event: &Event) {
    // sampling needs every load settled
    if s.images.phase() != ToolPhase::Ready {
        return;
    }
    let Some((x, y)) = client_point(event) else { return };
    let Some((px, py)) = canvas_point(client_rect(canvas), s.surface.size(), x, y) else {
        return;
    };
    match s.surface.sample(px, py) {
        Ok(Some(rgb)) => {
            s.state.picker.set_hex(rgb.to_hex());
            report(s.views.paint_current(rgb.to_hex()));
        }
        Ok(None) => {}
        Err(err) => gloo::console::warn!("coloring: canvas sample failed", err),
    }
    s.eyedropper.deactivate();
    report(s.views.paint_eyedrop(false));
}

fn wire_eyedropper(session: &Shared, canvas: &HtmlCanvasElement, listeners: &mut Vec<EventListener>) {
    for kind in ["click", "touchstart"] {
        let sess = session.clone();
        let target = canvas.clone();
        listeners.push(EventListener::new_with_options(
            canvas,
            kind,
            EventListenerOptions::enable_prevent_default(),
            move |e| {
                let mut s = sess.borrow_mut();
                if !s.eyedropper.is_active() {
                    return;
                }
                e.prevent_default();
                e.stop_propagation();
                pick_from_canvas(&mut s, &target, e);
            },
        ));
    }
}

// --- Panel, promo viewer, keyboard -----------------------------------------

/// A control whose element has the wrong type is skipped with a warning; the
/// rest of the tool still mounts.
fn wire_viewer(session: &Shared, document: &Document, listeners: &mut Vec<EventListener>) {
    for (id, close) in [(ids::PANEL_TOGGLE, false), (ids::PANEL_CLOSE, true), (ids::PANEL_OVERLAY, true)] {
        if let Some(target) = document.get_element_by_id(id) {
            let sess = session.clone();
            listeners.push(EventListener::new(&target, "click", move |_| {
                let s = sess.borrow();
                report(if close { s.panel.close() } else { s.panel.toggle() });
            }));
        }
    }

    let promos = match document.query_selector_all(&format!(".{}", ids::PROMO_BUTTON_CLASS)) {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(err) => {
            gloo::console::warn!("coloring: promo buttons not found", err);
            Vec::new()
        }
    };
    for button in promos {
        let sess = session.clone();
        let source = button.clone();
        listeners.push(EventListener::new(&button, "click", move |e| {
            e.stop_propagation();
            let src = source.get_attribute("data-full").unwrap_or_default();
            let alt = source
                .query_selector("img")
                .ok()
                .flatten()
                .and_then(|img| img.get_attribute("alt"))
                .unwrap_or_default();
            let mut s = sess.borrow_mut();
            let s = &mut *s;
            report(s.viewer.open(&src, &alt, &mut s.state.zoom));
        }));
    }

    let (modal, image) = {
        let s = session.borrow();
        (s.viewer.modal.clone(), s.viewer.image.clone())
    };
    if let Some(close) = document.get_element_by_id(ids::VIEWER_CLOSE) {
        let sess = session.clone();
        listeners.push(EventListener::new(&close, "click", move |e| {
            e.stop_propagation();
            report(sess.borrow().viewer.close());
        }));
    }
    if let Some(image) = &image {
        listeners.push(EventListener::new(image, "click", |e| e.stop_propagation()));
    }
    if let Some(modal) = &modal {
        let sess = session.clone();
        let backdrop = modal.clone();
        listeners.push(EventListener::new(modal, "click", move |e| {
            let on_backdrop = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .is_some_and(|t| t == backdrop);
            if on_backdrop {
                report(sess.borrow().viewer.close());
            }
        }));
    }
    if let Some(slider) = document.get_element_by_id(ids::ZOOM_SLIDER) {
        match slider.dyn_into::<HtmlInputElement>() {
            Ok(field) => {
                let sess = session.clone();
                let input = field.clone();
                listeners.push(EventListener::new(&field, "input", move |_| {
                    let mut s = sess.borrow_mut();
                    s.state.zoom = Zoom::new(input.value_as_number());
                    report(s.viewer.paint_zoom(s.state.zoom));
                }));
            }
            Err(other) => gloo::console::warn!(
                format!("coloring: #{} is not an <input>, zoom slider disabled", ids::ZOOM_SLIDER),
                other
            ),
        }
    }
    if let Some(reset) = document.get_element_by_id(ids::ZOOM_RESET) {
        let sess = session.clone();
        listeners.push(EventListener::new(&reset, "click", move |_| {
            let mut s = sess.borrow_mut();
            s.state.zoom = Zoom::default();
            report(s.viewer.paint_zoom(s.state.zoom));
        }));
    }

    // The only document-level listener; it goes away with this instance.
    let sess = session.clone();
    listeners.push(EventListener::new(document, "keydown", move |e| {
        let Some(key) = e.dyn_ref::<KeyboardEvent>() else { return };
        if key.key() == "Escape" {
            let s = sess.borrow();
            report(s.viewer.close());
            report(s.panel.close());
        }
    }));
}
