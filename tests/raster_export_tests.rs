mod common;

use cardpress::export::{export_raster, RasterJob};
use cardpress::{
    archive_entry_name, ExportError, ExportMode, FieldId, Layout, PipelineError, RasterFormat,
    RenderSurface, RowFailure, SoftwareSurface, ZipArchiveWriter,
};
use cardpress_layout::project;
use cardpress_traits::{CaptureError, CaptureOptions, FieldNode, RasterFrame};
use cardpress_types::{DataRow, Size};
use common::fixtures::*;
use common::prompt::RecordingPrompt;
use common::{
    font_surface, load, run_export, session_over, test_session, test_session_with_prompt,
    TestResult,
};
use std::io::{Cursor, Read};

const QUARTER: CaptureOptions = CaptureOptions {
    scale: 0.25,
    transparent_background: true,
    hide_overlays: true,
};

fn mounted_surface(layout: &Layout, first: Option<&DataRow>) -> SoftwareSurface {
    let mut surface = font_surface();
    let nodes = project(layout, first).into_iter().map(FieldNode::from).collect();
    surface.mount(Size::new(432.0, 648.0), nodes);
    surface
}

fn read_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).expect("entry");
            let mut data = Vec::new();
            file.read_to_end(&mut data).expect("entry bytes");
            (file.name().to_string(), data)
        })
        .collect()
}

/// Delegates to a software surface but fails its `fail_at`-th capture (0-based).
struct FlakySurface {
    inner: SoftwareSurface,
    captures: usize,
    fail_at: usize,
}

impl RenderSurface for FlakySurface {
    fn mount(&mut self, page: Size, nodes: Vec<FieldNode>) {
        self.inner.mount(page, nodes)
    }
    fn set_background(&mut self, image: Option<&[u8]>) -> Result<(), CaptureError> {
        self.inner.set_background(image)
    }
    fn set_field_text(&mut self, id: &FieldId, text: &str) -> bool {
        self.inner.set_field_text(id, text)
    }
    fn field_text(&self, id: &FieldId) -> Option<&str> {
        self.inner.field_text(id)
    }
    fn renders_text(&self) -> bool {
        self.inner.renders_text()
    }
    fn set_selection(&mut self, id: Option<&FieldId>) {
        self.inner.set_selection(id)
    }
    fn set_center_guide(&mut self, visible: bool) {
        self.inner.set_center_guide(visible)
    }
    fn capture(&mut self, options: &CaptureOptions) -> Result<RasterFrame, CaptureError> {
        let index = self.captures;
        self.captures += 1;
        if index == self.fail_at {
            return Err(CaptureError::Failed("simulated capture failure".into()));
        }
        self.inner.capture(options)
    }
}

#[tokio::test]
async fn test_one_entry_per_row_in_order() -> TestResult {
    let layout = word_layout();
    let rows = word_rows(&["one", "two", "three"]);
    let mut surface = mounted_surface(&layout, rows.first());

    let job = RasterJob {
        layout: &layout,
        rows: &rows,
        format: RasterFormat::Png,
        capture: QUARTER,
    };
    let export = export_raster(&mut surface, ZipArchiveWriter::new(), &job).await?;
    assert_eq!(export.entries, vec!["card_001.png", "card_002.png", "card_003.png"]);

    let entries = read_entries(&export.bytes);
    assert_eq!(entries.len(), 3);
    for (index, (name, data)) in entries.iter().enumerate() {
        assert_eq!(name, &archive_entry_name(index, RasterFormat::Png));
        let image = image::load_from_memory(data)?;
        assert_eq!((image.width(), image.height()), (108, 162));
    }
    Ok(())
}

#[tokio::test]
async fn test_surface_shows_first_row_afterwards() -> TestResult {
    let layout = word_layout();
    let rows = word_rows(&["first", "second", "last"]);
    let mut surface = mounted_surface(&layout, rows.first());

    let job = RasterJob {
        layout: &layout,
        rows: &rows,
        format: RasterFormat::Png,
        capture: QUARTER,
    };
    export_raster(&mut surface, ZipArchiveWriter::new(), &job).await?;
    assert_eq!(surface.field_text(&FieldId::from("word")), Some("first"));
    Ok(())
}

#[tokio::test]
async fn test_transparent_background_survives_png() -> TestResult {
    let layout = word_layout();
    let rows = word_rows(&["x"]);
    let mut surface = mounted_surface(&layout, rows.first());
    let job = RasterJob {
        layout: &layout,
        rows: &rows,
        format: RasterFormat::Png,
        capture: QUARTER,
    };
    let export = export_raster(&mut surface, ZipArchiveWriter::new(), &job).await?;
    let (_, data) = &read_entries(&export.bytes)[0];
    let image = image::load_from_memory(data)?.to_rgba8();
    assert_eq!(image.get_pixel(100, 150)[3], 0);
    Ok(())
}

#[tokio::test]
async fn test_jpeg_entries_are_opaque() -> TestResult {
    let layout = word_layout();
    let rows = word_rows(&["x", "y"]);
    let mut surface = mounted_surface(&layout, rows.first());
    let job = RasterJob {
        layout: &layout,
        rows: &rows,
        format: RasterFormat::Jpeg,
        capture: QUARTER,
    };
    let export = export_raster(&mut surface, ZipArchiveWriter::new(), &job).await?;
    let entries = read_entries(&export.bytes);
    assert_eq!(entries[1].0, "card_002.jpeg");
    let image = image::load_from_memory(&entries[1].1)?.to_rgb8();
    let px = image.get_pixel(50, 100);
    assert!(px[0] > 240 && px[1] > 240 && px[2] > 240, "expected white, got {:?}", px);
    Ok(())
}

#[tokio::test]
async fn test_zero_rows_is_data_empty() {
    let layout = word_layout();
    let mut surface = mounted_surface(&layout, None);
    let job = RasterJob {
        layout: &layout,
        rows: &[],
        format: RasterFormat::Png,
        capture: QUARTER,
    };
    let result = export_raster(&mut surface, ZipArchiveWriter::new(), &job).await;
    assert!(matches!(result, Err(ExportError::DataEmpty)));
}

#[tokio::test]
async fn test_capture_failure_aborts_and_restores_first_row() {
    let layout = word_layout();
    let rows = word_rows(&["alpha", "beta", "gamma"]);
    let mut surface = FlakySurface {
        inner: mounted_surface(&layout, rows.first()),
        captures: 0,
        fail_at: 1,
    };
    let job = RasterJob {
        layout: &layout,
        rows: &rows,
        format: RasterFormat::Png,
        capture: QUARTER,
    };

    let result = export_raster(&mut surface, ZipArchiveWriter::new(), &job).await;
    match result {
        Err(ExportError::RowRender {
            row,
            source: RowFailure::Capture(CaptureError::Failed(_)),
        }) => assert_eq!(row, 1),
        other => panic!("expected a row 1 capture failure, got {:?}", other),
    }
    // The third row was never attempted.
    assert_eq!(surface.captures, 2);
    assert_eq!(surface.field_text(&FieldId::from("word")), Some("alpha"));
}

#[tokio::test]
async fn test_unmounted_surface_fails_first_row() {
    let layout = word_layout();
    let rows = word_rows(&["a"]);
    let mut surface = font_surface();
    let job = RasterJob {
        layout: &layout,
        rows: &rows,
        format: RasterFormat::Png,
        capture: QUARTER,
    };
    let result = export_raster(&mut surface, ZipArchiveWriter::new(), &job).await;
    assert!(matches!(
        result,
        Err(ExportError::RowRender {
            row: 0,
            source: RowFailure::Capture(CaptureError::NotMounted)
        })
    ));
}

#[test]
fn test_session_raster_export_restores_preview() -> TestResult {
    let (mut session, prompt) = test_session(fast_config());
    session.set_layout(word_layout());
    load(&mut session, word_rows(&["one", "two", "three"]));

    let output = run_export(&mut session, ExportMode::Raster(RasterFormat::Jpeg))?
        .expect("confirmation is disabled");
    assert_eq!(output.filename, "wordbook_images.zip");
    assert_eq!(output.units, 3);
    let names: Vec<String> = read_entries(&output.bytes).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["card_001.jpeg", "card_002.jpeg", "card_003.jpeg"]);

    assert_eq!(session.surface().field_text(&FieldId::from("word")), Some("one"));
    assert!(prompt.questions().is_empty());
    Ok(())
}

#[test]
fn test_session_asks_before_raster_batch() -> TestResult {
    let config = cardpress::EngineConfig {
        confirm_raster_batches: true,
        ..fast_config()
    };
    let (mut session, prompt) = test_session_with_prompt(config, RecordingPrompt::answering(false));
    session.set_layout(word_layout());
    load(&mut session, word_rows(&["a", "b", "c"]));

    let output = run_export(&mut session, ExportMode::Raster(RasterFormat::Png))?;
    assert!(output.is_none());
    assert_eq!(prompt.questions().len(), 1);
    assert!(prompt.questions()[0].starts_with("3 images"));
    Ok(())
}

#[test]
fn test_session_raster_without_rows_fails_fast() {
    let (mut session, prompt) = test_session(fast_config());
    let result = run_export(&mut session, ExportMode::Raster(RasterFormat::Png));
    assert!(matches!(result, Err(PipelineError::Export(ExportError::DataEmpty))));
    assert!(prompt.questions().is_empty());
    assert_eq!(prompt.notifications().len(), 1);
}

/// Bounding box (x0, y0, x1, y1) of pixels with any coverage.
fn ink_bounds(image: &image::RgbaImage) -> Option<(u32, u32, u32, u32)> {
    image
        .enumerate_pixels()
        .filter(|(_, _, px)| px.0[3] > 0)
        .fold(None, |acc, (x, y, _)| match acc {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        })
}

#[tokio::test]
async fn test_each_entry_shows_its_row_text_inside_the_field() -> TestResult {
    let layout = two_field_layout();
    let rows = vocabulary_rows();
    let mut surface = mounted_surface(&layout, rows.first());
    let job = RasterJob {
        layout: &layout,
        rows: &rows,
        format: RasterFormat::Png,
        capture: QUARTER,
    };
    let export = export_raster(&mut surface, ZipArchiveWriter::new(), &job).await?;
    let images: Vec<image::RgbaImage> = read_entries(&export.bytes)
        .iter()
        .map(|(_, data)| image::load_from_memory(data).map(|i| i.to_rgba8()))
        .collect::<Result<_, _>>()?;
    assert_eq!(images.len(), 3);

    // Different words give different pixels.
    assert_ne!(images[0], images[1]);
    assert_ne!(images[1], images[2]);

    // All ink lies within the two field rects (quarter scale, one pixel of antialiasing).
    let (x0, y0, x1, y1) = ink_bounds(&images[0]).expect("row text is drawn");
    let (left, top) = (40.0 * 0.25 - 1.0, 60.0 * 0.25 - 1.0);
    let (right, bottom) = ((40.0 + 350.0) * 0.25 + 1.0, (140.0 + 60.0) * 0.25 + 1.0);
    assert!(x0 as f32 >= left && x1 as f32 <= right, "ink x {}..{}", x0, x1);
    assert!(y0 as f32 >= top && y1 as f32 <= bottom, "ink y {}..{}", y0, y1);
    Ok(())
}

#[tokio::test]
async fn test_surface_without_font_is_rejected_before_capture() {
    let layout = word_layout();
    let rows = word_rows(&["a", "b"]);
    let mut surface = FlakySurface {
        inner: SoftwareSurface::new(),
        captures: 0,
        fail_at: usize::MAX,
    };
    let nodes = project(&layout, rows.first()).into_iter().map(FieldNode::from).collect();
    surface.mount(Size::new(432.0, 648.0), nodes);
    let job = RasterJob {
        layout: &layout,
        rows: &rows,
        format: RasterFormat::Png,
        capture: QUARTER,
    };
    let result = export_raster(&mut surface, ZipArchiveWriter::new(), &job).await;
    assert!(matches!(result, Err(ExportError::NoFont)));
    assert_eq!(surface.captures, 0);
}

#[test]
fn test_session_raster_without_font_tells_the_user() {
    let config = cardpress::EngineConfig {
        confirm_raster_batches: true,
        ..fast_config()
    };
    let (mut session, prompt) =
        session_over(SoftwareSurface::new(), config, RecordingPrompt::answering(true));
    session.set_layout(word_layout());
    load(&mut session, word_rows(&["a", "b"]));

    let result = run_export(&mut session, ExportMode::Raster(RasterFormat::Png));
    assert!(matches!(result, Err(PipelineError::Export(ExportError::NoFont))));
    assert!(prompt.questions().is_empty());
    let notes = prompt.notifications();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].starts_with("No font is available"), "{}", notes[0]);
}
