//! Font assets handed to vector document writers.

use std::sync::Arc;
use thiserror::Error;

/// Shared font bytes (a whole TrueType/OpenType file).
pub type SharedFontData = Arc<Vec<u8>>;

/// Font loading and embedding failures.
///
/// These never abort an export; writers fall back to a built-in font.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("Font not found: {0}")]
    NotFound(String),

    #[error("Font '{name}' could not be parsed: {message}")]
    Invalid { name: String, message: String },

    #[error("Font '{name}' could not be embedded: {message}")]
    Embed { name: String, message: String },
}

/// A named font file.
#[derive(Debug, Clone)]
pub struct FontAsset {
    /// Name the writer registers the font under; `set_font` selects by it.
    pub name: String,
    pub data: SharedFontData,
}

impl FontAsset {
    pub fn new(name: impl Into<String>, data: SharedFontData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Derives a font name from a path or URL: the last segment without its extension.
    pub fn name_from_path(path: &str) -> String {
        let file = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path);
        let file = file.split(['?', '#']).next().unwrap_or(file);
        match file.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => file.to_string(),
        }
    }
}
