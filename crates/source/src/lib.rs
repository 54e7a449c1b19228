//! Data sources that feed rows into the export pipeline.
//!
//! ## Available Sources
//!
//! - `IteratorDataSource`: Wraps any iterator of rows
//! - `VecDataSource`: In-memory vector of rows
//! - `CsvDataSource`: Rows parsed from CSV text with a header line
//!
//! ## Example
//!
//! ```ignore
//! use cardpress_source::{CsvDataSource, DataSource};
//!
//! let mut source = CsvDataSource::from_text("word,meaning\n안녕,こんにちは\n")?;
//! while let Some(row) = source.next() {
//!     println!("{:?}", row.get("word"));
//! }
//! ```

mod csv;

pub use self::csv::{detect_delimiter, parse_csv, CsvDataSource, Delimiter};

use cardpress_traits::ResourceError;
use cardpress_types::DataRow;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("CSV parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("The data contains no rows")]
    Empty,

    #[error("The data is not valid UTF-8: {0}")]
    Encoding(String),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// A trait for sources that feed data rows into the pipeline.
pub trait DataSource: Send {
    /// Get the next row, if available.
    ///
    /// Returns `None` when the source is exhausted.
    fn next(&mut self) -> Option<DataRow>;

    /// Hint about the total number of rows (for progress reporting).
    ///
    /// Returns `None` if the size is unknown or unbounded.
    fn size_hint(&self) -> Option<usize> {
        None
    }

    /// Check if the source has a known size.
    fn has_known_size(&self) -> bool {
        self.size_hint().is_some()
    }
}

/// Drains a source into a vector.
pub fn collect_rows<S: DataSource + ?Sized>(source: &mut S) -> Vec<DataRow> {
    let mut rows = Vec::with_capacity(source.size_hint().unwrap_or(0));
    while let Some(row) = source.next() {
        rows.push(row);
    }
    rows
}

/// Wraps any iterator as a DataSource.
pub struct IteratorDataSource<I>
where
    I: Iterator<Item = DataRow> + Send,
{
    inner: I,
    size_hint: Option<usize>,
}

impl<I> IteratorDataSource<I>
where
    I: Iterator<Item = DataRow> + Send,
{
    pub fn new(inner: I) -> Self {
        let (lower, upper) = inner.size_hint();
        let size_hint = if upper == Some(lower) {
            Some(lower)
        } else {
            None
        };
        Self { inner, size_hint }
    }
}

impl<I> DataSource for IteratorDataSource<I>
where
    I: Iterator<Item = DataRow> + Send,
{
    fn next(&mut self) -> Option<DataRow> {
        self.inner.next()
    }

    fn size_hint(&self) -> Option<usize> {
        self.size_hint
    }
}

/// A data source backed by an in-memory vector.
pub struct VecDataSource {
    data: Vec<DataRow>,
    index: usize,
}

impl VecDataSource {
    pub fn new(data: Vec<DataRow>) -> Self {
        Self { data, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of rows remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }
}

impl DataSource for VecDataSource {
    fn next(&mut self) -> Option<DataRow> {
        let row = self.data.get(self.index).cloned()?;
        self.index += 1;
        Some(row)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.data.len())
    }
}

impl DataSource for Box<dyn DataSource> {
    fn next(&mut self) -> Option<DataRow> {
        (**self).next()
    }

    fn size_hint(&self) -> Option<usize> {
        (**self).size_hint()
    }
}
