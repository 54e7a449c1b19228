use crate::error::ExportError;
use cardpress_layout::{project, Layout};
use cardpress_style::PageSize;
use cardpress_traits::{
    Baseline, DocumentWriter, FontAsset, FontError, RenderError, TextOptions,
};
use cardpress_types::DataRow;

/// Everything one vector export reads. All borrowed; nothing is mutated.
#[derive(Debug, Clone, Copy)]
pub struct VectorJob<'a> {
    pub layout: &'a Layout,
    pub rows: &'a [DataRow],
    pub page: &'a PageSize,
    /// PNG or JPEG bytes stretched over the full page beneath the text.
    pub background: Option<&'a [u8]>,
    pub font: Option<&'a FontAsset>,
    pub line_height: f32,
}

#[derive(Debug)]
pub struct VectorExport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Rows whose drawing failed; their pages are present but may be incomplete.
    pub skipped_rows: Vec<ExportError>,
    /// Set when the font could not be embedded and the built-in font was used.
    pub font_error: Option<FontError>,
}

impl VectorExport {
    pub fn skipped_indices(&self) -> Vec<usize> {
        self.skipped_rows
            .iter()
            .filter_map(|e| match e {
                ExportError::RowRender { row, .. } => Some(*row),
                _ => None,
            })
            .collect()
    }
}

/// Writes one page per row with `W`.
///
/// Fails with `ExportError::DataEmpty` when there are no rows. A failure while
/// drawing a row is logged and collected; the remaining rows still render.
pub fn export_vector<W: DocumentWriter>(job: &VectorJob<'_>) -> Result<VectorExport, ExportError> {
    if job.rows.is_empty() {
        return Err(ExportError::DataEmpty);
    }

    log::info!(
        "Exporting {} rows to PDF ({}, {} fields)",
        job.rows.len(),
        job.page.name,
        job.layout.len()
    );
    let mut writer = W::create(job.page.width_pt, job.page.height_pt);
    let font_error = job.font.and_then(|font| select_font(&mut writer, font).err());

    let mut skipped_rows = Vec::new();
    for (index, row) in job.rows.iter().enumerate() {
        if index > 0 {
            writer.add_page().map_err(ExportError::Document)?;
        }
        if let Err(e) = draw_row(&mut writer, job, row) {
            log::error!("Error processing row {}: {}", index + 1, e);
            skipped_rows.push(ExportError::row(index, e));
        }
    }

    let page_count = writer.page_count();
    let bytes = writer.save().map_err(ExportError::Document)?;
    log::info!(
        "PDF finished: {} pages, {} bytes, {} rows with errors",
        page_count,
        bytes.len(),
        skipped_rows.len()
    );

    Ok(VectorExport {
        bytes,
        page_count,
        skipped_rows,
        font_error,
    })
}

fn select_font<W: DocumentWriter>(writer: &mut W, font: &FontAsset) -> Result<(), FontError> {
    let result = writer.embed_font(font).and_then(|()| {
        writer.set_font(&font.name).map_err(|e| FontError::Embed {
            name: font.name.clone(),
            message: e.to_string(),
        })
    });
    if let Err(e) = &result {
        log::warn!("{}; falling back to the built-in font", e);
    }
    result
}

fn draw_row<W: DocumentWriter>(
    writer: &mut W,
    job: &VectorJob<'_>,
    row: &DataRow,
) -> Result<(), RenderError> {
    if let Some(background) = job.background {
        writer.draw_image(background, job.page.bounds())?;
    }

    for instruction in project(job.layout, Some(row)) {
        writer.set_font_size(instruction.font_size);
        writer.set_text_color(instruction.color);
        let options = TextOptions {
            max_width: Some(instruction.width),
            align: instruction.align,
            line_height: job.line_height,
            baseline: Baseline::Bottom,
        };
        writer.draw_text(
            &instruction.text,
            instruction.anchor_x(),
            instruction.text_bottom_y(),
            &options,
        )?;
    }
    Ok(())
}
