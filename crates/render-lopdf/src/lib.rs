//! Vector document writer using lopdf.
//!
//! The whole document is kept in memory as a lopdf object graph and
//! serialized once on `save`. Text uses built-in Helvetica until a TrueType
//! font is embedded, after which it is written as a CID-keyed Type0 font so
//! that non-Latin scripts survive.

mod fonts;
mod xobject;
mod writer;

pub use writer::LopdfDocumentWriter;

/// Name of the always-available fallback font.
pub const BUILTIN_FONT: &str = "Helvetica";
