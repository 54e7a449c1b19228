//! Raster images as PDF image XObjects.

use cardpress_traits::RenderError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Document, ObjectId, Stream};
use std::io::Write;

pub(crate) fn deflate(bytes: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Decodes PNG/JPEG bytes and adds them as an RGB image XObject, with a soft
/// mask when the image has any transparency.
pub(crate) fn add_image_xobject(document: &mut Document, data: &[u8]) -> Result<ObjectId, RenderError> {
    let decoded = image::load_from_memory(data).map_err(|e| RenderError::Image(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };

    if alpha.iter().any(|a| *a != u8::MAX) {
        let smask = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(&alpha)?,
        );
        dict.set("SMask", document.add_object(smask));
    }

    log::debug!("Embedded {}x{} image", width, height);
    Ok(document.add_object(Stream::new(dict, deflate(&rgb)?)))
}
