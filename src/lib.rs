//! cardpress places labeled text fields on a page, binds them to rows of
//! tabular data, and renders one PDF page or one image per row.
//!
//! The crates of the workspace provide the pieces; this crate ties them into
//! an editing [`Session`] and the batch [`export`] pipeline.

pub mod config;
pub mod error;
pub mod export;
pub mod prompt;
pub mod session;

pub use config::EngineConfig;
pub use error::{ExportError, PipelineError, RowFailure};
pub use export::{archive_entry_name, ExportMode, ExportOutput};
pub use prompt::{AutoPrompt, TerminalPrompt, UserPrompt};
pub use session::Session;

pub use cardpress_layout::{
    FieldDefaults, FieldDescriptor, FieldPatch, Handle, InteractionState, Layout, MIN_FIELD_SIZE,
};
pub use cardpress_render_lopdf::LopdfDocumentWriter;
pub use cardpress_render_raster::{SoftwareSurface, ZipArchiveWriter};
pub use cardpress_source::{CsvDataSource, DataSource, VecDataSource};
pub use cardpress_style::{page_size, PageSize, PageSizeKey, TextAlign};
pub use cardpress_traits::{FontAsset, RasterFormat, RenderSurface};
pub use cardpress_types::{Color, DataRow, FieldId, Point, Rect, Size};
