//! Batch export: one PDF page or one image per data row.
//!
//! Both modes share the projection step and nothing else. Vector export is
//! row-fault-tolerant (a bad row is logged and reported, the page stays);
//! raster export stops at the first failing row.

pub mod raster;
pub mod vector;

pub use raster::{export_raster, RasterExport, RasterJob};
pub use vector::{export_vector, VectorExport, VectorJob};

use cardpress_traits::RasterFormat;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    Vector,
    Raster(RasterFormat),
}

impl ExportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportMode::Vector => "pdf",
            ExportMode::Raster(format) => format.extension(),
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportMode::Vector),
            other => other
                .parse::<RasterFormat>()
                .map(ExportMode::Raster)
                .map_err(|_| format!("Unknown export format '{}' (expected pdf, png or jpeg)", s)),
        }
    }
}

/// Archive entry for the row at zero-based `index`: `card_001.png`, `card_002.png`, ...
pub fn archive_entry_name(index: usize, format: RasterFormat) -> String {
    format!("card_{:03}.{}", index + 1, format.extension())
}

/// A finished export, ready to be written out under `filename`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutput {
    pub filename: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Pages or archive entries produced.
    pub units: usize,
    /// Zero-based indices of vector rows that failed to render.
    pub skipped_rows: Vec<usize>,
}
