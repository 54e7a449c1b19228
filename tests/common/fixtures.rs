use cardpress::{Color, DataRow, EngineConfig, FieldDescriptor, FieldId, Layout, Rect, TextAlign};

/// `{label: "word", x: 0, y: 0, w: 100, h: 20}`
pub fn word_layout() -> Layout {
    Layout::from_fields([(
        FieldId::from("word"),
        FieldDescriptor::new("word", Rect::new(0.0, 0.0, 100.0, 20.0), 16.0),
    )])
    .expect("one field")
}

/// Headword centered near the top, meaning left-aligned below it.
pub fn two_field_layout() -> Layout {
    Layout::from_fields([
        (
            FieldId::from("head"),
            FieldDescriptor::new("word", Rect::new(116.0, 60.0, 200.0, 40.0), 24.0)
                .with_align(TextAlign::Center),
        ),
        (
            FieldId::from("body"),
            FieldDescriptor::new("meaning", Rect::new(40.0, 140.0, 350.0, 60.0), 14.0)
                .with_color(Color::gray(0x33)),
        ),
    ])
    .expect("two fields")
}

pub fn word_rows(words: &[&str]) -> Vec<DataRow> {
    words.iter().map(|w| DataRow::new().with("word", *w)).collect()
}

pub fn vocabulary_rows() -> Vec<DataRow> {
    vec![
        DataRow::new().with("word", "apple").with("meaning", "a round fruit"),
        DataRow::new().with("word", "river").with("meaning", "a wide stream of water"),
        DataRow::new().with("word", "lamp").with("meaning", "a device giving light"),
    ]
}

/// Small captures and no batch confirmation.
pub fn fast_config() -> EngineConfig {
    EngineConfig {
        supersample: 0.25,
        confirm_raster_batches: false,
        ..EngineConfig::default()
    }
}

pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("png encoding");
    out.into_inner()
}
