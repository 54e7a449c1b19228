use cardpress_traits::{CaptureError, RasterFormat, RasterFrame};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

/// Encodes a captured frame. JPEG has no alpha channel, so frames are
/// flattened onto white first.
pub fn encode_frame(frame: &RasterFrame, format: RasterFormat) -> Result<Vec<u8>, CaptureError> {
    let encode_err = |message: String| CaptureError::Encode { format, message };

    let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.pixels.clone())
        .ok_or_else(|| encode_err("pixel buffer does not match frame size".to_string()))?;

    let mut out = Cursor::new(Vec::new());
    match format {
        RasterFormat::Png => DynamicImage::ImageRgba8(rgba).write_to(&mut out, ImageFormat::Png),
        RasterFormat::Jpeg => {
            let flattened = RgbImage::from_fn(frame.width, frame.height, |x, y| {
                let [r, g, b, a] = rgba.get_pixel(x, y).0;
                let alpha = a as u16;
                let over_white = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
                image::Rgb([over_white(r), over_white(g), over_white(b)])
            });
            DynamicImage::ImageRgb8(flattened).write_to(&mut out, ImageFormat::Jpeg)
        }
    }
    .map_err(|e| encode_err(e.to_string()))?;

    Ok(out.into_inner())
}
