//! RGBA drawing primitives over an `image::RgbaImage`.
//!
//! All coordinates are in pixels; anything outside the canvas is clipped.

use cardpress_types::{Color, Rect};
use image::{Rgba, RgbaImage};

/// Source-over compositing of a straight-alpha color onto a straight-alpha pixel.
#[inline]
pub fn blend_over(dst: [u8; 4], src: [u8; 3], alpha: f32) -> [u8; 4] {
    let sa = alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| -> u8 {
        let value = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// A canvas filled with `background`, or fully transparent when `None`.
    pub fn new(width: u32, height: u32, background: Option<Color>) -> Self {
        let fill = match background {
            Some(c) => Rgba([c.r, c.g, c.b, 255]),
            None => Rgba([0, 0, 0, 0]),
        };
        Self {
            image: RgbaImage::from_pixel(width, height, fill),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Blend a pixel (bounds-checked).
    #[inline]
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        pixel.0 = blend_over(pixel.0, [color.r, color.g, color.b], alpha);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32) {
        let x0 = rect.x.floor().max(0.0) as i64;
        let y0 = rect.y.floor().max(0.0) as i64;
        let x1 = (rect.right().ceil() as i64).min(self.width() as i64);
        let y1 = (rect.bottom().ceil() as i64).min(self.height() as i64);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color, alpha);
            }
        }
    }

    /// One-pixel-wide outline; `dash` > 0 draws dashes of that length.
    pub fn stroke_rect(&mut self, rect: Rect, color: Color, dash: u32) {
        let x0 = rect.x.round() as i64;
        let y0 = rect.y.round() as i64;
        let x1 = rect.right().round() as i64 - 1;
        let y1 = rect.bottom().round() as i64 - 1;
        let on = |i: i64| dash == 0 || (i / dash as i64) % 2 == 0;
        for x in x0..=x1 {
            if on(x - x0) {
                self.blend_pixel(x, y0, color, 1.0);
                self.blend_pixel(x, y1, color, 1.0);
            }
        }
        for y in y0..=y1 {
            if on(y - y0) {
                self.blend_pixel(x0, y, color, 1.0);
                self.blend_pixel(x1, y, color, 1.0);
            }
        }
    }

    pub fn vertical_line(&mut self, x: f32, color: Color) {
        let x = x.round() as i64;
        for y in 0..self.height() as i64 {
            self.blend_pixel(x, y, color, 1.0);
        }
    }

    /// Stretches `source` over the whole canvas.
    pub fn draw_stretched(&mut self, source: &RgbaImage) {
        let scaled = image::imageops::resize(
            source,
            self.width(),
            self.height(),
            image::imageops::FilterType::Triangle,
        );
        for (x, y, pixel) in scaled.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            self.blend_pixel(x as i64, y as i64, Color::rgb(r, g, b), a as f32 / 255.0);
        }
    }

    /// Blends a coverage bitmap (one byte per pixel) with its top-left at (`x`, `y`).
    pub fn draw_coverage(&mut self, x: i64, y: i64, width: usize, coverage: &[u8], color: Color) {
        if width == 0 {
            return;
        }
        for (i, value) in coverage.iter().enumerate() {
            if *value == 0 {
                continue;
            }
            let px = x + (i % width) as i64;
            let py = y + (i / width) as i64;
            self.blend_pixel(px, py, color, *value as f32 / 255.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_onto_transparent_keeps_source_color() {
        assert_eq!(blend_over([0, 0, 0, 0], [255, 0, 102], 0.5), [255, 0, 102, 128]);
    }

    #[test]
    fn test_blend_opaque_halfway() {
        assert_eq!(blend_over([255, 255, 255, 255], [0, 0, 0], 0.5), [128, 128, 128, 255]);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut canvas = Canvas::new(4, 4, None);
        canvas.fill_rect(Rect::new(-2.0, 2.0, 10.0, 10.0), Color::BLACK, 1.0);
        let image = canvas.into_image();
        assert_eq!(image.get_pixel(0, 1).0[3], 0);
        assert_eq!(image.get_pixel(3, 3).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_stretch_covers_canvas() {
        let source = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 255]));
        let mut canvas = Canvas::new(3, 2, Some(Color::WHITE));
        canvas.draw_stretched(&source);
        assert_eq!(canvas.into_image().get_pixel(2, 1).0, [10, 20, 30, 255]);
    }
}
