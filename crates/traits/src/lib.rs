pub mod archive;
pub mod document;
pub mod font;
pub mod resource;
pub mod surface;

pub use archive::{ArchiveError, ArchiveWriter};
pub use document::{Baseline, DocumentWriter, RenderError, TextOptions};
pub use font::{FontAsset, FontError, SharedFontData};
pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
pub use surface::{CaptureError, CaptureOptions, FieldNode, RasterFormat, RasterFrame, RenderSurface};
