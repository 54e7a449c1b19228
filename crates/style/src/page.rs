//! The closed registry of physical page presets.
//!
//! Every key in [`PageSizeKey`] maps to exactly one immutable [`PageSize`], so
//! lookups are total: there is no "unknown page size" at runtime once a key
//! value exists.

use cardpress_types::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Print margins recommended for a preset, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintMargins {
    /// Gutter side (binding edge).
    pub inner_mm: f32,
    /// Fore-edge side.
    pub outer_mm: f32,
    /// Head and foot.
    pub top_bottom_mm: f32,
}

impl PrintMargins {
    pub fn inner_pt(&self) -> f32 {
        self.inner_mm * POINTS_PER_MM
    }

    pub fn outer_pt(&self) -> f32 {
        self.outer_mm * POINTS_PER_MM
    }

    pub fn top_bottom_pt(&self) -> f32 {
        self.top_bottom_mm * POINTS_PER_MM
    }
}

/// A named physical page preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
    pub name: &'static str,
    pub margin: PrintMargins,
}

impl PageSize {
    pub fn size(&self) -> Size {
        Size::new(self.width_pt, self.height_pt)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Horizontal center of the page; the target of center-snapping.
    pub fn center_x(&self) -> f32 {
        self.width_pt / 2.0
    }

    /// The area inside the print margins for a right-hand (recto) page.
    pub fn safe_area(&self) -> Rect {
        let inner = self.margin.inner_pt();
        let outer = self.margin.outer_pt();
        let tb = self.margin.top_bottom_pt();
        Rect::new(
            inner,
            tb,
            self.width_pt - inner - outer,
            self.height_pt - 2.0 * tb,
        )
    }
}

static BOOK_6X9: PageSize = PageSize {
    width_pt: 432.0,
    height_pt: 648.0,
    name: "Book (6x9 inch)",
    margin: PrintMargins {
        inner_mm: 12.7,
        outer_mm: 6.4,
        top_bottom_mm: 6.4,
    },
};

static A4: PageSize = PageSize {
    width_pt: 595.28,
    height_pt: 841.89,
    name: "A4",
    margin: PrintMargins {
        inner_mm: 15.0,
        outer_mm: 10.0,
        top_bottom_mm: 10.0,
    },
};

static A5: PageSize = PageSize {
    width_pt: 419.53,
    height_pt: 595.28,
    name: "A5 (148x210mm)",
    margin: PrintMargins {
        inner_mm: 10.0,
        outer_mm: 10.0,
        top_bottom_mm: 10.0,
    },
};

/// Key of a page preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageSizeKey {
    #[default]
    #[serde(rename = "6x9")]
    SixByNine,
    #[serde(rename = "a4")]
    A4,
    #[serde(rename = "a5")]
    A5,
}

impl PageSizeKey {
    pub const ALL: [PageSizeKey; 3] = [PageSizeKey::SixByNine, PageSizeKey::A4, PageSizeKey::A5];

    pub fn as_str(self) -> &'static str {
        match self {
            PageSizeKey::SixByNine => "6x9",
            PageSizeKey::A4 => "a4",
            PageSizeKey::A5 => "a5",
        }
    }

    pub fn page_size(self) -> &'static PageSize {
        page_size::get(self)
    }
}

impl fmt::Display for PageSizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown page size '{0}' (expected one of: 6x9, a4, a5)")]
pub struct PageSizeParseError(pub String);

impl FromStr for PageSizeKey {
    type Err = PageSizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "6x9" => Ok(PageSizeKey::SixByNine),
            "a4" => Ok(PageSizeKey::A4),
            "a5" => Ok(PageSizeKey::A5),
            _ => Err(PageSizeParseError(s.to_string())),
        }
    }
}

pub mod page_size {
    use super::{PageSize, PageSizeKey, A4, A5, BOOK_6X9};

    /// Looks up the preset for `key`. Total over the key enumeration.
    pub fn get(key: PageSizeKey) -> &'static PageSize {
        match key {
            PageSizeKey::SixByNine => &BOOK_6X9,
            PageSizeKey::A4 => &A4,
            PageSizeKey::A5 => &A5,
        }
    }
}
