//! Software surface over an RGBA buffer. Mirrors the 2D canvas operations
//! the compositor needs, for headless rendering and tests.

use std::borrow::Cow;
use std::convert::Infallible;
use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};

use super::{Surface, tint_pixels};
use crate::color::Rgb;

#[derive(Clone, Debug)]
pub struct PixelSurface {
    buffer: RgbaImage,
}

impl Default for PixelSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelSurface {
    pub fn new() -> Self {
        Self { buffer: RgbaImage::new(0, 0) }
    }

    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    /// `true` when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.buffer.pixels().all(|p| p[3] == 0)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut out = Cursor::new(Vec::new());
        self.buffer.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    fn fitted<'a>(&self, image: &'a RgbaImage) -> Cow<'a, RgbaImage> {
        let (w, h) = self.buffer.dimensions();
        if image.dimensions() == (w, h) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(imageops::resize(image, w, h, FilterType::Triangle))
        }
    }

    fn blend(&mut self, src: &RgbaImage) {
        for (dst, src) in self.buffer.pixels_mut().zip(src.pixels()) {
            blend_over(dst, src);
        }
    }

    fn has_area(&self) -> bool {
        self.buffer.width() > 0 && self.buffer.height() > 0
    }
}

/// Source-over for straight (non-premultiplied) alpha.
fn blend_over(dst: &mut Rgba<u8>, src: &Rgba<u8>) {
    let sa = f32::from(src[3]) / 255.0;
    if src[3] == 0 {
        return;
    }
    if src[3] == 255 {
        *dst = *src;
        return;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let v = (f32::from(src[c]) * sa + f32::from(dst[c]) * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

impl Surface for PixelSurface {
    type Image = RgbaImage;
    type Error = Infallible;

    fn image_size(image: &RgbaImage) -> (u32, u32) {
        image.dimensions()
    }

    fn size(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.buffer = RgbaImage::new(width, height);
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        for px in self.buffer.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
        Ok(())
    }

    fn fill(&mut self, color: Rgb) -> Result<(), Infallible> {
        let solid = Rgba([color.r, color.g, color.b, 255]);
        for px in self.buffer.pixels_mut() {
            *px = solid;
        }
        Ok(())
    }

    fn draw_image(&mut self, image: &RgbaImage) -> Result<(), Infallible> {
        if self.has_area() {
            let src = self.fitted(image);
            self.blend(&src);
        }
        Ok(())
    }

    fn draw_tinted(&mut self, image: &RgbaImage, tint: Rgb) -> Result<(), Infallible> {
        if self.has_area() {
            let mut tinted = self.fitted(image).into_owned();
            tint_pixels(&mut tinted, tint);
            self.blend(&tinted);
        }
        Ok(())
    }

    fn sample(&self, x: u32, y: u32) -> Result<Option<Rgb>, Infallible> {
        Ok(self
            .buffer
            .get_pixel_checked(x, y)
            .map(|p| Rgb::new(p[0], p[1], p[2])))
    }
}
