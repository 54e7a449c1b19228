//! The live render surface capability.
//!
//! A surface holds one node per field, keyed by field id, plus the editing
//! overlays (field borders, selection handles, center guide). The interactive
//! preview and the raster exporter drive the same surface.

use cardpress_style::TextAlign;
use cardpress_types::{Color, FieldId, Rect, Size};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Surface has nothing mounted")]
    NotMounted,
    #[error("Background image could not be decoded: {0}")]
    Background(String),
    #[error("Capture failed: {0}")]
    Failed(String),
    #[error("Encoding to {format} failed: {message}")]
    Encode { format: RasterFormat, message: String },
}

/// One field as the surface displays it, in document points.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub id: FieldId,
    pub rect: Rect,
    pub text: String,
    pub font_size: f32,
    pub color: Color,
    pub align: TextAlign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Output pixels per document point.
    pub scale: f32,
    /// Leave unpainted areas transparent instead of white.
    pub transparent_background: bool,
    /// Hide borders, handles and guides for the duration of the capture.
    pub hide_overlays: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            transparent_background: true,
            hide_overlays: true,
        }
    }
}

/// Straight-alpha RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterFrame {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RasterFormat {
    #[default]
    Png,
    Jpeg,
}

impl RasterFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for RasterFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(RasterFormat::Png),
            "jpeg" | "jpg" => Ok(RasterFormat::Jpeg),
            other => Err(format!("Unknown raster format '{}'", other)),
        }
    }
}

pub trait RenderSurface {
    /// Replaces all field nodes and sets the page size.
    fn mount(&mut self, page: Size, nodes: Vec<FieldNode>);

    /// Sets or clears the full-page background image (encoded PNG/JPEG).
    fn set_background(&mut self, image: Option<&[u8]>) -> Result<(), CaptureError>;

    /// Replaces the text of the node with `id`. Returns false when no such node exists.
    fn set_field_text(&mut self, id: &FieldId, text: &str) -> bool;

    fn field_text(&self, id: &FieldId) -> Option<&str>;

    /// Whether field text ends up in captured frames.
    fn renders_text(&self) -> bool {
        true
    }

    fn set_selection(&mut self, id: Option<&FieldId>);

    fn set_center_guide(&mut self, visible: bool);

    fn capture(&mut self, options: &CaptureOptions) -> Result<RasterFrame, CaptureError>;
}
