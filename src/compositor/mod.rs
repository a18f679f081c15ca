//! Layer compositing.
//!
//! [`draw_layers`] paints the catalog bottom to top onto any [`Surface`]:
//! the background as a solid fill, parts either as their source pixels or
//! flattened to their assigned color, and the line-art overlay last. The
//! browser canvas ([`web::WebSurface`]) and the software buffer
//! ([`pixel::PixelSurface`]) share this loop and the tint routine.

pub mod pixel;
pub mod web;

use crate::color::Rgb;
use crate::config::{BASE_ASSET, CANVAS_DOWNSCALE};
use crate::layers::{Layer, LayerId, LayerStack};
use crate::loading::ImageSet;

pub trait Surface {
    type Image;
    type Error;

    /// Natural pixel size of a source image.
    fn image_size(image: &Self::Image) -> (u32, u32);

    fn size(&self) -> (u32, u32);

    /// Resizes the backing store. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Opaque fill of the whole surface.
    fn fill(&mut self, color: Rgb) -> Result<(), Self::Error>;

    /// Source-over draw of `image` stretched to the surface size.
    fn draw_image(&mut self, image: &Self::Image) -> Result<(), Self::Error>;

    /// Like [`Surface::draw_image`] but the scaled copy goes through
    /// [`tint_pixels`] first.
    fn draw_tinted(&mut self, image: &Self::Image, tint: Rgb) -> Result<(), Self::Error>;

    /// Color of one rendered pixel, `None` outside the surface.
    fn sample(&self, x: u32, y: u32) -> Result<Option<Rgb>, Self::Error>;
}

/// Overwrites RGB of every pixel with nonzero alpha, keeping alpha. Holes
/// stay transparent and anti-aliased edges keep their coverage.
pub fn tint_pixels(rgba: &mut [u8], tint: Rgb) {
    for px in rgba.chunks_exact_mut(4) {
        if px[3] > 0 {
            px[0] = tint.r;
            px[1] = tint.g;
            px[2] = tint.b;
        }
    }
}

/// Canvas size for a base image of the given natural size.
pub fn canvas_size(base: (u32, u32)) -> (u32, u32) {
    (base.0 / CANVAS_DOWNSCALE, base.1 / CANVAS_DOWNSCALE)
}

/// Paints every visible layer. Does nothing and returns `Ok(false)` until the
/// base image is available; repeated calls with the same inputs produce the
/// same pixels.
pub fn draw_layers<S: Surface>(
    surface: &mut S,
    layers: &LayerStack,
    images: &ImageSet<S::Image>,
) -> Result<bool, S::Error> {
    let Some(base) = images.get(BASE_ASSET) else {
        return Ok(false);
    };
    let (width, height) = canvas_size(S::image_size(base));
    surface.resize(width, height);
    surface.clear()?;

    for layer in layers.layers().iter().filter(|l| l.visible) {
        draw_layer(surface, layer, images)?;
    }
    if layers.overlay_visible() {
        surface.draw_image(base)?;
    }
    Ok(true)
}

fn draw_layer<S: Surface>(surface: &mut S, layer: &Layer, images: &ImageSet<S::Image>) -> Result<(), S::Error> {
    if layer.is_background() {
        let fill = layer.color.map_or(Rgb::WHITE, |c| c.rgb());
        return surface.fill(fill);
    }
    let LayerId::Part(asset) = layer.id else {
        return Ok(());
    };
    // failed loads are simply absent
    let Some(image) = images.get(asset) else {
        return Ok(());
    };
    match layer.color {
        Some(color) => surface.draw_tinted(image, color.rgb()),
        None => surface.draw_image(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_keeps_alpha_and_skips_holes() {
        let mut buf = vec![
            10, 20, 30, 255, //
            10, 20, 30, 0, //
            10, 20, 30, 128,
        ];
        tint_pixels(&mut buf, Rgb::new(1, 2, 3));
        assert_eq!(buf, vec![1, 2, 3, 255, 10, 20, 30, 0, 1, 2, 3, 128]);
    }

    #[test]
    fn canvas_is_half_of_base() {
        assert_eq!(canvas_size((2000, 3000)), (1000, 1500));
        assert_eq!(canvas_size((1, 1)), (0, 0));
    }
}
