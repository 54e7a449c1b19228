use super::archive_entry_name;
use crate::error::ExportError;
use cardpress_layout::{project, Layout};
use cardpress_render_raster::encode_frame;
use cardpress_traits::{ArchiveWriter, CaptureOptions, RasterFormat, RenderSurface};
use cardpress_types::DataRow;

#[derive(Debug, Clone, Copy)]
pub struct RasterJob<'a> {
    pub layout: &'a Layout,
    pub rows: &'a [DataRow],
    pub format: RasterFormat,
    pub capture: CaptureOptions,
}

#[derive(Debug)]
pub struct RasterExport {
    /// The finalized archive.
    pub bytes: Vec<u8>,
    /// Entry names in row order.
    pub entries: Vec<String>,
}

/// Captures one image per row from the live `surface` into `archive`.
///
/// Rows are processed strictly one after another: substitute, capture, encode,
/// add. The first failing row aborts the run. Whatever happens, the surface is
/// left showing row 0 again.
pub async fn export_raster<S, A>(
    surface: &mut S,
    mut archive: A,
    job: &RasterJob<'_>,
) -> Result<RasterExport, ExportError>
where
    S: RenderSurface + ?Sized,
    A: ArchiveWriter,
{
    let Some(first) = job.rows.first() else {
        return Err(ExportError::DataEmpty);
    };
    if !surface.renders_text() {
        return Err(ExportError::NoFont);
    }

    log::info!(
        "Exporting {} rows as {} images at x{}",
        job.rows.len(),
        job.format,
        job.capture.scale
    );
    let result = capture_rows(surface, &mut archive, job).await;
    show_row(surface, job.layout, first);
    let entries = result?;

    let bytes = archive.finalize()?;
    log::info!("Archive finished: {} entries, {} bytes", entries.len(), bytes.len());
    Ok(RasterExport { bytes, entries })
}

async fn capture_rows<S, A>(
    surface: &mut S,
    archive: &mut A,
    job: &RasterJob<'_>,
) -> Result<Vec<String>, ExportError>
where
    S: RenderSurface + ?Sized,
    A: ArchiveWriter,
{
    let mut entries = Vec::with_capacity(job.rows.len());
    for (index, row) in job.rows.iter().enumerate() {
        show_row(surface, job.layout, row);

        let frame = surface
            .capture(&job.capture)
            .map_err(|e| ExportError::row(index, e))?;

        let format = job.format;
        let encoded = tokio::task::spawn_blocking(move || encode_frame(&frame, format))
            .await
            .map_err(|e| ExportError::Task(e.to_string()))?
            .map_err(|e| ExportError::row(index, e))?;

        let name = archive_entry_name(index, format);
        archive.add(&name, &encoded)?;
        log::debug!("Captured {} ({} bytes)", name, encoded.len());
        entries.push(name);
    }
    Ok(entries)
}

/// Writes `row`'s values into the surface's field nodes, matched by field id.
fn show_row<S: RenderSurface + ?Sized>(surface: &mut S, layout: &Layout, row: &DataRow) {
    for instruction in project(layout, Some(row)) {
        if !surface.set_field_text(&instruction.field_id, &instruction.text) {
            log::debug!("No node for field '{}' on the surface", instruction.field_id);
        }
    }
}
