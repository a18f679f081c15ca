// Integration tests (native) for the `coloring-contest` crate.
// Everything here goes through the software surface so it runs under
// `cargo test` on the host without a browser.

use coloring_contest::color::{HexColor, Rgb};
use coloring_contest::compositor::pixel::PixelSurface;
use coloring_contest::compositor::{Surface, draw_layers};
use coloring_contest::config::{ASSET_COUNT, BASE_ASSET, PALETTE_CAPACITY, PALETTE_STORAGE_KEY};
use coloring_contest::eyedropper::canvas_point;
use coloring_contest::layers::{LayerId, PART_CATALOG};
use coloring_contest::loading::{ImageSet, LoadTracker, ToolPhase};
use coloring_contest::picker::Rect;
use coloring_contest::storage::{KeyValueStore, MemoryStore};
use coloring_contest::{ToolError, ToolState};
use image::{Rgba, RgbaImage};

const BASE: u32 = 8;

fn hex(text: &str) -> HexColor {
    HexColor::parse_strict(text).unwrap()
}

// Base overlay: one black line-art pixel in the bottom-right corner.
fn base_image() -> RgbaImage {
    let mut img = RgbaImage::new(BASE, BASE);
    img.put_pixel(BASE - 1, BASE - 1, Rgba([0, 0, 0, 255]));
    img
}

// Parts are already canvas-sized so they are drawn without resampling.
// Part `n` owns one opaque pixel; part 5 also has a half-transparent one.
fn part_image(n: u8) -> RgbaImage {
    let side = BASE / 2;
    let mut img = RgbaImage::new(side, side);
    let slot = u32::from(n - 2);
    img.put_pixel(slot % side, slot / side, Rgba([200, 40, 40, 255]));
    if n == 5 {
        img.put_pixel(0, side - 1, Rgba([10, 10, 10, 128]));
    }
    img
}

fn all_images() -> ImageSet<RgbaImage> {
    let parts = PART_CATALOG.iter().map(|(n, _)| (*n, part_image(*n)));
    let images = std::iter::once((BASE_ASSET, base_image())).chain(parts);
    ImageSet::from_images(usize::from(ASSET_COUNT), images)
}

fn render(state: &ToolState, images: &ImageSet<RgbaImage>) -> PixelSurface {
    let mut surface = PixelSurface::new();
    assert!(draw_layers(&mut surface, &state.layers, images).unwrap());
    surface
}

fn apply(state: &mut ToolState, id: LayerId, color: &str) {
    assert!(state.select_layer(id));
    state.picker.set_hex(hex(color));
    state.apply_color().unwrap();
}

#[test]
fn canvas_is_half_the_base_size() {
    let surface = render(&ToolState::default(), &all_images());
    assert_eq!(surface.size(), (BASE / 2, BASE / 2));
}

#[test]
fn applied_color_tints_only_covered_pixels() {
    let images = all_images();
    let mut state = ToolState::default();
    apply(&mut state, LayerId::Part(5), "#ff00aa");
    // drop the background so alpha stays observable
    assert!(state.toggle_layer_visible(LayerId::Background));
    let surface = render(&state, &images);
    let buf = surface.buffer();

    assert_eq!(buf.get_pixel(3, 0), &Rgba([0xff, 0x00, 0xaa, 255]));
    // half-transparent coverage keeps its alpha and takes the tint
    assert_eq!(buf.get_pixel(0, 3), &Rgba([0xff, 0x00, 0xaa, 128]));
    // untouched parts keep their source pixels
    assert_eq!(buf.get_pixel(0, 0), &Rgba([200, 40, 40, 255]));
}

#[test]
fn reset_all_matches_fresh_render() {
    let images = all_images();
    let fresh = render(&ToolState::default(), &images);

    let mut state = ToolState::default();
    apply(&mut state, LayerId::Part(2), "#123456");
    assert!(state.layers.set_color(LayerId::Background, hex("#abcdef")));
    assert_ne!(render(&state, &images).buffer(), fresh.buffer());

    state.reset_all();
    assert_eq!(render(&state, &images).buffer(), fresh.buffer());
}

#[test]
fn toggling_twice_restores_pixels() {
    let images = all_images();
    let mut state = ToolState::default();
    apply(&mut state, LayerId::Part(7), "#00ff00");
    let before = render(&state, &images);

    for id in [LayerId::Part(7), LayerId::Overlay, LayerId::Background] {
        assert!(state.toggle_layer_visible(id));
        assert!(state.toggle_layer_visible(id));
    }
    assert_eq!(render(&state, &images).buffer(), before.buffer());
}

#[test]
fn redraw_is_idempotent() {
    let images = all_images();
    let mut state = ToolState::default();
    apply(&mut state, LayerId::Part(3), "#336699");
    let mut surface = PixelSurface::new();
    draw_layers(&mut surface, &state.layers, &images).unwrap();
    let first = surface.buffer().clone();
    draw_layers(&mut surface, &state.layers, &images).unwrap();
    assert_eq!(surface.buffer(), &first);
}

#[test]
fn eyedropper_reads_background_when_everything_else_is_hidden() {
    let images = all_images();
    let mut state = ToolState::default();
    assert!(state.layers.set_color(LayerId::Background, hex("#336699")));
    for (n, _) in PART_CATALOG {
        assert!(state.toggle_layer_visible(LayerId::Part(*n)));
    }
    assert!(state.toggle_layer_visible(LayerId::Overlay));
    let surface = render(&state, &images);

    // displayed at 4x the pixel size
    let displayed = Rect::new(100.0, 50.0, 16.0, 16.0);
    let (x, y) = canvas_point(displayed, surface.size(), 115.0, 65.0).unwrap();
    assert_eq!((x, y), (3, 3));
    let rgb = surface.sample(x, y).unwrap().unwrap();
    assert_eq!(rgb, Rgb::new(0x33, 0x66, 0x99));

    state.picker.set_hex(rgb.to_hex());
    assert_eq!(state.current_color().to_string(), "#336699");
}

#[test]
fn failed_parts_are_skipped() {
    // only the base made it; parts draw nothing and the background still fills
    let images = ImageSet::from_images(usize::from(ASSET_COUNT), [(BASE_ASSET, base_image())]);
    assert_eq!(images.phase(), ToolPhase::Ready);
    let summary = images.tracker().summary().unwrap();
    assert!(summary.any_failed());
    assert!(!summary.all_failed());

    let mut state = ToolState::default();
    apply(&mut state, LayerId::Part(2), "#ff0000");
    let surface = render(&state, &images);
    assert_eq!(surface.buffer().get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
}

#[test]
fn every_load_failing_reports_once_and_draws_nothing() {
    let mut tracker = LoadTracker::new(usize::from(ASSET_COUNT));
    let summaries: Vec<_> = (0..ASSET_COUNT).filter_map(|_| tracker.record(false)).collect();
    assert_eq!(summaries.len(), 1);
    assert!(summaries[0].all_failed());

    let images: ImageSet<RgbaImage> = ImageSet::from_images(usize::from(ASSET_COUNT), []);
    let mut surface = PixelSurface::new();
    assert!(!draw_layers(&mut surface, &ToolState::default().layers, &images).unwrap());
    assert!(surface.is_blank());
}

#[test]
fn palette_dedupes_and_caps() {
    let store = MemoryStore::new();
    let mut state = ToolState::load(&store);

    state.picker.set_hex(hex("#ff0000"));
    assert_eq!(state.add_to_palette(&store), Ok(true));
    assert_eq!(state.add_to_palette(&store), Ok(false));
    assert_eq!(state.palette.len(), 1);

    for i in 1..PALETTE_CAPACITY {
        state.picker.set_hex(Rgb::new(0, 0, i as u8).to_hex());
        assert_eq!(state.add_to_palette(&store), Ok(true));
    }
    assert!(state.palette.is_full());

    let stored = store.get(PALETTE_STORAGE_KEY).unwrap();
    state.picker.set_hex(hex("#00ff00"));
    assert_eq!(
        state.add_to_palette(&store),
        Err(ToolError::PaletteFull { max: PALETTE_CAPACITY })
    );
    assert_eq!(state.palette.len(), PALETTE_CAPACITY);
    assert_eq!(store.get(PALETTE_STORAGE_KEY).unwrap(), stored);

    // survives a reload
    let reloaded = ToolState::load(&store);
    assert_eq!(reloaded.palette, state.palette);
}

#[test]
fn handoff_keeps_state() {
    let store = MemoryStore::new();
    let mut state = ToolState::load(&store);
    apply(&mut state, LayerId::Part(9), "#0a0b0c");
    state.add_to_palette(&store).unwrap();

    let moved = std::mem::take(&mut state);
    assert_eq!(state, ToolState::default());
    assert_eq!(moved.selection, Some(LayerId::Part(9)));
    assert_eq!(moved.layers.get(LayerId::Part(9)).unwrap().color, Some(hex("#0a0b0c")));
    assert_eq!(moved.palette.len(), 1);
}

#[test]
fn exported_png_decodes_to_the_same_pixels() {
    let images = all_images();
    let mut state = ToolState::default();
    apply(&mut state, LayerId::Part(4), "#8040c0");
    let surface = render(&state, &images);

    let png = surface.encode_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(&decoded, surface.buffer());
}
