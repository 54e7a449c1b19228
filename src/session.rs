//! The owner of all editing state.
//!
//! A session holds the one `Layout` value; the interaction controller, the
//! preview surface and the exporters only ever see it by reference, and every
//! edit replaces it with the new value the layout model returns.

use crate::config::EngineConfig;
use crate::error::{ExportError, PipelineError};
use crate::export::{
    export_raster, export_vector, ExportMode, ExportOutput, RasterJob, VectorJob,
};
use crate::prompt::UserPrompt;
use cardpress_layout::{
    fit_scale, padded, project, zoom_percent, FieldDefaults, FieldPatch, Handle,
    InteractionController, InteractionState, Layout,
};
use cardpress_render_lopdf::LopdfDocumentWriter;
use cardpress_render_raster::ZipArchiveWriter;
use cardpress_source::{collect_rows, DataSource, SourceError};
use cardpress_style::{PageSize, PageSizeKey};
use cardpress_traits::{CaptureOptions, FieldNode, FontAsset, RasterFrame, RenderSurface};
use cardpress_types::{DataRow, FieldId, Point, Size};

pub struct Session<S: RenderSurface> {
    config: EngineConfig,
    layout: Layout,
    rows: Vec<DataRow>,
    page: PageSizeKey,
    background: Option<Vec<u8>>,
    font: Option<FontAsset>,
    controller: InteractionController,
    viewport: Option<Size>,
    scale: f32,
    surface: S,
    prompt: Box<dyn UserPrompt>,
}

impl<S: RenderSurface> Session<S> {
    /// Starts with the starter layout, no data and the default page size.
    pub fn new(surface: S, config: EngineConfig, prompt: Box<dyn UserPrompt>) -> Self {
        let mut session = Self {
            controller: InteractionController::new(config.interaction()),
            config,
            layout: Layout::starter(),
            rows: Vec::new(),
            page: PageSizeKey::default(),
            background: None,
            font: None,
            viewport: None,
            scale: 1.0,
            surface,
            prompt,
        };
        session.refresh_preview();
        session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Replaces the whole layout.
    pub fn set_layout(&mut self, layout: Layout) {
        self.controller.pointer_cancel();
        if let Some(id) = self.controller.selected()
            && !layout.contains(id)
        {
            self.controller.select(None);
        }
        self.layout = layout;
        self.refresh_preview();
    }

    /// Replaces the layout with one parsed from JSON, e.g. a saved layout file.
    ///
    /// Invalid JSON and layouts without fields are reported and leave the
    /// current layout in place.
    pub fn load_layout_json(&mut self, json: &str) -> Result<(), PipelineError> {
        match Layout::from_json(json) {
            Ok(layout) => {
                log::info!("Loaded layout with {} fields", layout.len());
                self.set_layout(layout);
                Ok(())
            }
            Err(e) => Err(self.report(e.into())),
        }
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    /// Replaces the loaded rows with everything `source` yields.
    ///
    /// An empty source is reported to the user and leaves the current rows untouched.
    pub fn load_rows<D: DataSource + ?Sized>(&mut self, source: &mut D) -> Result<usize, PipelineError> {
        let rows = collect_rows(source);
        if rows.is_empty() {
            return Err(self.report(SourceError::Empty.into()));
        }
        log::info!("Loaded {} rows", rows.len());
        self.rows = rows;
        self.refresh_preview();
        Ok(self.rows.len())
    }

    pub fn page_size_key(&self) -> PageSizeKey {
        self.page
    }

    pub fn page_size(&self) -> &'static PageSize {
        self.page.page_size()
    }

    pub fn set_page_size(&mut self, key: PageSizeKey) {
        self.page = key;
        self.rescale();
        self.refresh_preview();
    }

    /// The containing viewport changed size (in pixels).
    pub fn resize_viewport(&mut self, viewport: Size) {
        self.viewport = Some(viewport);
        self.rescale();
    }

    /// Preview pixels per document point.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn zoom_percent(&self) -> u32 {
        zoom_percent(self.scale)
    }

    fn rescale(&mut self) {
        if let Some(viewport) = self.viewport {
            let available = padded(viewport, self.config.viewport_padding);
            self.scale = fit_scale(available, self.page_size().size(), self.config.scale_cap);
            log::debug!(
                "Preview rescaled to {}% for a {}x{} viewport",
                self.zoom_percent(),
                viewport.width,
                viewport.height
            );
        }
    }

    /// Sets or clears the background image (PNG or JPEG bytes).
    ///
    /// Undecodable bytes are rejected and the previous background stays.
    pub fn set_background(&mut self, image: Option<Vec<u8>>) -> Result<(), PipelineError> {
        if let Err(e) = self.surface.set_background(image.as_deref()) {
            return Err(self.report(e.into()));
        }
        self.background = image;
        Ok(())
    }

    pub fn background(&self) -> Option<&[u8]> {
        self.background.as_deref()
    }

    /// The font embedded into vector exports.
    pub fn set_font(&mut self, font: Option<FontAsset>) {
        self.font = font;
    }

    pub fn font(&self) -> Option<&FontAsset> {
        self.font.as_ref()
    }

    pub fn add_field(&mut self, defaults: &FieldDefaults) -> FieldId {
        let (layout, id) = self.layout.add_field(defaults);
        self.layout = layout;
        self.refresh_preview();
        id
    }

    /// Removes a field. Removing the last one is refused and reported.
    pub fn remove_field(&mut self, id: &FieldId) -> Result<(), PipelineError> {
        let layout = match self.layout.remove_field(id) {
            Ok(layout) => layout,
            Err(e) => return Err(self.report(e.into())),
        };
        if self.controller.selected() == Some(id) {
            self.controller.pointer_cancel();
            self.controller.select(None);
        }
        self.layout = layout;
        self.refresh_preview();
        Ok(())
    }

    pub fn set_field(&mut self, id: &FieldId, patch: &FieldPatch) -> Result<(), PipelineError> {
        self.layout = match self.layout.set_field(id, patch) {
            Ok(layout) => layout,
            Err(e) => return Err(self.report(e.into())),
        };
        self.refresh_preview();
        Ok(())
    }

    pub fn select(&mut self, id: Option<FieldId>) {
        self.controller.select(id);
        self.surface.set_selection(self.controller.selected());
    }

    pub fn selected(&self) -> Option<&FieldId> {
        self.controller.selected()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn is_snapped(&self) -> bool {
        self.controller.is_snapped()
    }

    /// Whether pointer move/up events must currently be routed to the session.
    pub fn listens_globally(&self) -> bool {
        self.controller.listens_globally()
    }

    pub fn pointer_down_on_field(&mut self, id: &FieldId, pointer: Point) -> Result<(), PipelineError> {
        self.controller.pointer_down_on_field(&self.layout, id, pointer)?;
        self.surface.set_selection(self.controller.selected());
        Ok(())
    }

    pub fn pointer_down_on_handle(&mut self, handle: Handle, pointer: Point) -> Result<(), PipelineError> {
        self.controller.pointer_down_on_handle(&self.layout, handle, pointer)?;
        Ok(())
    }

    pub fn pointer_down_on_canvas(&mut self) {
        self.controller.pointer_down_on_canvas();
        self.surface.set_selection(None);
    }

    /// Feeds a pointer position (viewport pixels) to the active gesture.
    pub fn pointer_move(&mut self, pointer: Point) {
        let page = self.page.page_size();
        if let Some(layout) = self.controller.pointer_move(&self.layout, pointer, self.scale, page) {
            self.layout = layout;
            self.refresh_preview();
        }
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
        self.surface.set_center_guide(false);
    }

    pub fn pointer_cancel(&mut self) {
        self.controller.pointer_cancel();
        self.surface.set_center_guide(false);
    }

    /// Re-mounts the preview from the layout and the first data row.
    pub fn refresh_preview(&mut self) {
        let nodes: Vec<FieldNode> = project(&self.layout, self.rows.first())
            .into_iter()
            .map(FieldNode::from)
            .collect();
        let page = self.page_size().size();
        self.surface.mount(page, nodes);
        self.surface.set_selection(self.controller.selected());
        let moving = matches!(self.controller.state(), InteractionState::Moving(_));
        self.surface.set_center_guide(moving && self.controller.is_snapped());
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Captures the preview as the user sees it, overlays included.
    pub fn capture_preview(&mut self) -> Result<RasterFrame, PipelineError> {
        let options = CaptureOptions {
            scale: self.scale,
            transparent_background: false,
            hide_overlays: false,
        };
        Ok(self.surface.capture(&options)?)
    }

    /// Runs one export.
    ///
    /// Returns `Ok(None)` when the user declines the raster batch confirmation.
    /// Failures are reported to the user before they are returned.
    pub async fn export(&mut self, mode: ExportMode) -> Result<Option<ExportOutput>, PipelineError> {
        if self.rows.is_empty() {
            return Err(self.report(ExportError::DataEmpty.into()));
        }

        let result = match mode {
            ExportMode::Vector => self.export_pdf(),
            ExportMode::Raster(_) if !self.surface.renders_text() => Err(ExportError::NoFont),
            ExportMode::Raster(format) => {
                let question = format!(
                    "{} images will be generated. This may take a while. Continue?",
                    self.rows.len()
                );
                if self.config.confirm_raster_batches && !self.prompt.confirm(&question) {
                    log::info!("Raster export declined");
                    return Ok(None);
                }
                let job = RasterJob {
                    layout: &self.layout,
                    rows: &self.rows,
                    format,
                    capture: self.config.export_capture(),
                };
                let result = export_raster(&mut self.surface, ZipArchiveWriter::new(), &job).await;
                self.refresh_preview();
                result.map(|export| ExportOutput {
                    filename: self.config.archive_filename.clone(),
                    units: export.entries.len(),
                    bytes: export.bytes,
                    skipped_rows: Vec::new(),
                })
            }
        };

        match result {
            Ok(output) => Ok(Some(output)),
            Err(e) => Err(self.report(e.into())),
        }
    }

    fn export_pdf(&self) -> Result<ExportOutput, ExportError> {
        let job = VectorJob {
            layout: &self.layout,
            rows: &self.rows,
            page: self.page_size(),
            background: self.background.as_deref(),
            font: self.font.as_ref(),
            line_height: self.config.line_height,
        };
        let export = export_vector::<LopdfDocumentWriter>(&job)?;
        if let Some(e) = &export.font_error {
            self.prompt.notify(&format!(
                "The font could not be loaded ({}). Text may not display correctly.",
                e
            ));
        }
        Ok(ExportOutput {
            filename: self.config.pdf_filename.clone(),
            units: export.page_count,
            skipped_rows: export.skipped_indices(),
            bytes: export.bytes,
        })
    }

    /// Shows `error` to the user, logs it, and hands it back for returning.
    fn report(&self, error: PipelineError) -> PipelineError {
        log::error!("{}", error);
        self.prompt.notify(&user_message(&error));
        error
    }
}

fn user_message(error: &PipelineError) -> String {
    match error {
        PipelineError::Export(e) => e.to_string(),
        PipelineError::Layout(e) => e.to_string(),
        PipelineError::Source(SourceError::Empty) => "The data contains no rows.".to_string(),
        other => other.to_string(),
    }
}
