#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;
pub mod prompt;

use cardpress::{
    DataRow, EngineConfig, ExportMode, ExportOutput, PipelineError, Session,
    SoftwareSurface, VecDataSource,
};
use lopdf::Document as LopdfDocument;
use prompt::RecordingPrompt;
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text of one page (1-based).
    pub fn page_text(&self, page: u32) -> String {
        self.doc.extract_text(&[page]).unwrap_or_default()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// Montserrat Regular (SIL Open Font License).
pub const FIXTURE_FONT: &[u8] = include_bytes!("../fixtures/fonts/Montserrat-Regular.ttf");

pub fn font_surface() -> SoftwareSurface {
    SoftwareSurface::from_font_bytes(FIXTURE_FONT).expect("fixture font loads")
}

/// A session over a software surface with the fixture font, recording what the user is told.
pub fn test_session(config: EngineConfig) -> (Session<SoftwareSurface>, Arc<RecordingPrompt>) {
    test_session_with_prompt(config, RecordingPrompt::answering(true))
}

pub fn test_session_with_prompt(
    config: EngineConfig,
    prompt: RecordingPrompt,
) -> (Session<SoftwareSurface>, Arc<RecordingPrompt>) {
    session_over(font_surface(), config, prompt)
}

pub fn session_over(
    surface: SoftwareSurface,
    config: EngineConfig,
    prompt: RecordingPrompt,
) -> (Session<SoftwareSurface>, Arc<RecordingPrompt>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let prompt = Arc::new(prompt);
    let session = Session::new(surface, config, Box::new(prompt.clone()));
    (session, prompt)
}

pub fn load(session: &mut Session<SoftwareSurface>, rows: Vec<DataRow>) {
    session
        .load_rows(&mut VecDataSource::new(rows))
        .expect("rows should load");
}

/// Runs an export on a fresh current-thread runtime.
pub fn run_export(
    session: &mut Session<SoftwareSurface>,
    mode: ExportMode,
) -> Result<Option<ExportOutput>, PipelineError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(session.export(mode))
}
