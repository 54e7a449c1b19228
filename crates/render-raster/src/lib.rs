//! Raster side of cardpress: a software render surface that mirrors the
//! interactive preview, frame encoding to PNG/JPEG, and a zip archive writer.

mod archive;
mod canvas;
mod encode;
mod surface;
#[cfg(feature = "system-fonts")]
mod system_font;

pub use archive::ZipArchiveWriter;
pub use canvas::Canvas;
pub use encode::encode_frame;
pub use surface::{SoftwareSurface, GUIDE_COLOR, HANDLE_COLOR};
#[cfg(feature = "system-fonts")]
pub use system_font::{find_system_font, SystemFont};
