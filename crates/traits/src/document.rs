//! The vector document writer capability.
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! page, matching the layout model. Writers flip to their native space.

use crate::font::{FontAsset, FontError};
use cardpress_style::TextAlign;
use cardpress_types::{Color, Rect};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Image could not be decoded: {0}")]
    Image(String),
    #[error("Unknown font '{0}'")]
    UnknownFont(String),
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<&str> for RenderError {
    fn from(s: &str) -> Self {
        RenderError::Other(s.to_string())
    }
}

/// Which line of the text box `y` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Baseline {
    /// `y` is the alphabetic baseline of the first line.
    #[default]
    Alphabetic,
    /// `y` is the bottom of the first line's em box.
    Bottom,
}

/// Layout options for a single `draw_text` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    /// Wrap boundary in points. `None` disables wrapping.
    pub max_width: Option<f32>,
    /// How each line is placed relative to the anchor `x`.
    pub align: TextAlign,
    /// Line advance as a multiple of the font size.
    pub line_height: f32,
    pub baseline: Baseline,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            max_width: None,
            align: TextAlign::Left,
            line_height: 1.4,
            baseline: Baseline::Alphabetic,
        }
    }
}

/// Builds a paged vector document one draw call at a time.
///
/// `create` opens the document with its first page already current; every
/// further page comes from `add_page` and has the same dimensions.
pub trait DocumentWriter {
    fn create(page_width: f32, page_height: f32) -> Self
    where
        Self: Sized;

    fn add_page(&mut self) -> Result<(), RenderError>;

    fn page_count(&self) -> usize;

    /// Registers a font under `font.name`. On error the writer stays usable
    /// with its built-in font.
    fn embed_font(&mut self, font: &FontAsset) -> Result<(), FontError>;

    fn set_font(&mut self, name: &str) -> Result<(), RenderError>;

    fn set_font_size(&mut self, size: f32);

    fn set_text_color(&mut self, color: Color);

    /// Draws encoded image bytes (PNG or JPEG) into `rect` on the current page.
    fn draw_image(&mut self, data: &[u8], rect: Rect) -> Result<(), RenderError>;

    /// Draws `text` with its anchor at (`x`, `y`); see [`TextOptions`].
    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        options: &TextOptions,
    ) -> Result<(), RenderError>;

    /// Serializes the finished document.
    fn save(self) -> Result<Vec<u8>, RenderError>
    where
        Self: Sized;
}
