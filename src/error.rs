// src/error.rs
use cardpress_layout::{InteractionError, LayoutError};
use cardpress_source::SourceError;
use cardpress_traits::{ArchiveError, CaptureError, FontError, RenderError, ResourceError};
use thiserror::Error;

/// Why a single row could not be turned into its page or image.
#[derive(Error, Debug)]
pub enum RowFailure {
    #[error(transparent)]
    Draw(#[from] RenderError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Failures of one export run. None of them touch the layout.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("There is no data to export. Load a CSV file or sheet first.")]
    DataEmpty,

    #[error("No font is available to draw text into images. Configure a TrueType font and try again.")]
    NoFont,

    #[error("Row {} could not be rendered: {source}", .row + 1)]
    RowRender {
        /// Zero-based row index.
        row: usize,
        #[source]
        source: RowFailure,
    },

    #[error("The document could not be finalized: {0}")]
    Document(#[source] RenderError),

    #[error("The image archive could not be written: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl ExportError {
    pub fn row(row: usize, source: impl Into<RowFailure>) -> Self {
        ExportError::RowRender {
            row,
            source: source.into(),
        }
    }
}

/// A comprehensive error type for everything a session or the CLI can hit.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Interaction error: {0}")]
    Interaction(#[from] InteractionError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Data could not be loaded: {0}")]
    Source(#[from] SourceError),

    #[error("Fetch failed: {0}")]
    Resource(#[from] ResourceError),

    #[error("Font error: {0}")]
    Font(#[from] FontError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Preview surface error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Layout(LayoutError::Parse(e.to_string()))
    }
}
