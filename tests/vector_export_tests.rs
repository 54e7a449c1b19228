mod common;

use cardpress::export::{export_vector, VectorJob};
use cardpress::{
    DataRow, ExportError, ExportMode, FontAsset, LopdfDocumentWriter, PageSizeKey, PipelineError,
};
use common::fixtures::*;
use common::pdf_assertions::{image_draws, text_positions};
use common::{load, run_export, test_session, GeneratedPdf, TestResult};
use std::sync::Arc;

fn job<'a>(layout: &'a cardpress::Layout, rows: &'a [DataRow]) -> VectorJob<'a> {
    VectorJob {
        layout,
        rows,
        page: PageSizeKey::SixByNine.page_size(),
        background: None,
        font: None,
        line_height: 1.4,
    }
}

#[test]
fn test_single_field_single_row_scenario() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let layout = word_layout();
    let rows = word_rows(&["hello"]);
    let export = export_vector::<LopdfDocumentWriter>(&job(&layout, &rows))?;
    let pdf = GeneratedPdf::from_bytes(export.bytes)?;

    assert_pdf_page_count!(pdf, 1);
    assert_pdf_contains_text!(pdf, "hello");
    // Left-aligned at x = 0. The text bottom sits at y + fontSize = 16 from the
    // top, so the Helvetica baseline is one descent (0.207 em) above it.
    let positions = text_positions(&pdf.doc, 1);
    assert_eq!(positions.len(), 1);
    let (x, y) = positions[0];
    assert_eq!(x, 0.0);
    let expected = 648.0 - (16.0 - 0.207 * 16.0);
    assert!((y - expected).abs() < 0.01, "baseline at {y}, expected {expected}");
    Ok(())
}

#[test]
fn test_one_page_per_row_in_order_without_leakage() -> TestResult {
    let layout = two_field_layout();
    let rows = vocabulary_rows();
    let export = export_vector::<LopdfDocumentWriter>(&job(&layout, &rows))?;
    assert_eq!(export.page_count, 3);
    assert!(export.skipped_rows.is_empty());

    let pdf = GeneratedPdf::from_bytes(export.bytes)?;
    assert_pdf_page_count!(pdf, 3);
    for (page, row) in (1u32..).zip(&rows) {
        let text = pdf.page_text(page);
        assert!(text.contains(row.get("word").unwrap_or_default()), "page {page}: {text}");
    }
    assert_page_not_contains_text!(pdf, 1, "river");
    assert_page_not_contains_text!(pdf, 2, "apple");
    assert_page_not_contains_text!(pdf, 3, "round fruit");
    Ok(())
}

#[test]
fn test_missing_column_renders_label() -> TestResult {
    let layout = two_field_layout();
    let rows = vec![DataRow::new().with("word", "only-word")];
    let export = export_vector::<LopdfDocumentWriter>(&job(&layout, &rows))?;
    let pdf = GeneratedPdf::from_bytes(export.bytes)?;
    assert_pdf_contains_text!(pdf, "only-word");
    assert_pdf_contains_text!(pdf, "meaning");
    Ok(())
}

#[test]
fn test_background_on_every_page() -> TestResult {
    let layout = word_layout();
    let rows = word_rows(&["a", "b"]);
    let background = solid_png(4, 6, [200, 220, 255, 255]);
    let job = VectorJob {
        background: Some(&background),
        ..job(&layout, &rows)
    };
    let export = export_vector::<LopdfDocumentWriter>(&job)?;
    let pdf = GeneratedPdf::from_bytes(export.bytes)?;
    assert_eq!(image_draws(&pdf.doc, 1), 1);
    assert_eq!(image_draws(&pdf.doc, 2), 1);
    Ok(())
}

#[test]
fn test_broken_background_skips_rows_but_keeps_pages() -> TestResult {
    let layout = word_layout();
    let rows = word_rows(&["a", "b"]);
    let background = b"not an image".to_vec();
    let job = VectorJob {
        background: Some(&background),
        ..job(&layout, &rows)
    };
    let export = export_vector::<LopdfDocumentWriter>(&job)?;
    assert_eq!(export.page_count, 2);
    assert_eq!(export.skipped_indices(), vec![0, 1]);
    assert!(matches!(export.skipped_rows[0], ExportError::RowRender { row: 0, .. }));
    let pdf = GeneratedPdf::from_bytes(export.bytes)?;
    assert_pdf_page_count!(pdf, 2);
    Ok(())
}

#[test]
fn test_invalid_font_falls_back() -> TestResult {
    let layout = word_layout();
    let rows = word_rows(&["fallback"]);
    let font = FontAsset::new("NotAFont", Arc::new(b"garbage".to_vec()));
    let job = VectorJob {
        font: Some(&font),
        ..job(&layout, &rows)
    };
    let export = export_vector::<LopdfDocumentWriter>(&job)?;
    assert!(export.font_error.is_some());
    let pdf = GeneratedPdf::from_bytes(export.bytes)?;
    assert_pdf_contains_text!(pdf, "fallback");
    Ok(())
}

#[test]
fn test_zero_rows_is_data_empty() {
    let layout = word_layout();
    let result = export_vector::<LopdfDocumentWriter>(&job(&layout, &[]));
    assert!(matches!(result, Err(ExportError::DataEmpty)));
}

#[test]
fn test_session_vector_export() -> TestResult {
    let (mut session, prompt) = test_session(fast_config());
    session.set_layout(word_layout());
    session.set_page_size(PageSizeKey::A5);
    load(&mut session, word_rows(&["one", "two"]));

    let output = run_export(&mut session, ExportMode::Vector)?.expect("vector export never asks");
    assert_eq!(output.filename, "wordbook.pdf");
    assert_eq!(output.units, 2);
    assert!(prompt.notifications().is_empty());

    let pdf = GeneratedPdf::from_bytes(output.bytes)?;
    assert_pdf_page_count!(pdf, 2);
    let media_box = pdf
        .doc
        .get_object(pdf.doc.get_pages()[&1])?
        .as_dict()?
        .get(b"MediaBox")?
        .as_array()?
        .iter()
        .map(|o| o.as_float())
        .collect::<Result<Vec<f32>, _>>()?;
    assert_eq!(media_box.len(), 4);
    assert!((media_box[2] - 419.53).abs() < 0.01 && (media_box[3] - 595.28).abs() < 0.01);
    Ok(())
}

#[test]
fn test_session_export_without_rows_notifies() -> TestResult {
    let (mut session, prompt) = test_session(fast_config());
    let layout_before = session.layout().clone();

    let result = run_export(&mut session, ExportMode::Vector);
    assert!(matches!(result, Err(PipelineError::Export(ExportError::DataEmpty))));
    assert_eq!(prompt.notifications().len(), 1);
    assert!(prompt.notifications()[0].contains("no data"));
    assert_eq!(session.layout(), &layout_before);
    Ok(())
}
