//! CSV ingestion using the csv crate.
//!
//! The first record is the header and names the columns. Blank lines are
//! skipped, and rows may be shorter or longer than the header: missing
//! columns are simply absent from the row and extra cells are dropped.

use crate::{DataSource, SourceError, VecDataSource};
use cardpress_traits::ResourceProvider;
use cardpress_types::DataRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Semicolon,
    Pipe,
}

impl Delimiter {
    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
            Delimiter::Pipe => '|',
        }
    }
}

/// Detect delimiter by counting candidates in the first few lines.
pub fn detect_delimiter(content: &str) -> Delimiter {
    let sample: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

    let comma = sample.matches(',').count();
    let tab = sample.matches('\t').count();
    let pipe = sample.matches('|').count();
    let semi = sample.matches(';').count();

    let max = comma.max(tab).max(pipe).max(semi);
    if max == 0 || comma == max {
        Delimiter::Comma
    } else if tab == max {
        Delimiter::Tab
    } else if semi == max {
        Delimiter::Semicolon
    } else {
        Delimiter::Pipe
    }
}

/// Parses CSV text into rows keyed by the header's column names.
///
/// Returns `SourceError::Empty` when there is no data row after the header.
pub fn parse_csv(content: &str, delimiter: Delimiter) -> Result<Vec<DataRow>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.char() as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let parse_err = |e: csv::Error, fallback_line: u64| SourceError::Parse {
        line: e.position().map(|p| p.line()).unwrap_or(fallback_line),
        message: e.to_string(),
    };

    let headers = reader.headers().map_err(|e| parse_err(e, 1))?.clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| parse_err(e, index as u64 + 2))?;
        let row: DataRow = headers
            .iter()
            .zip(record.iter())
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(SourceError::Empty);
    }
    log::debug!("Parsed {} rows with columns {:?}", rows.len(), headers);
    Ok(rows)
}

/// A data source over rows parsed from CSV.
pub struct CsvDataSource {
    inner: VecDataSource,
}

impl CsvDataSource {
    /// Parses `content`, detecting the delimiter.
    pub fn from_text(content: &str) -> Result<Self, SourceError> {
        let rows = parse_csv(content, detect_delimiter(content))?;
        Ok(Self {
            inner: VecDataSource::new(rows),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SourceError> {
        let content =
            std::str::from_utf8(bytes).map_err(|e| SourceError::Encoding(e.to_string()))?;
        Self::from_text(content)
    }

    /// Fetches `path` (a file path or URL, depending on the provider) and parses it.
    pub fn load(provider: &dyn ResourceProvider, path: &str) -> Result<Self, SourceError> {
        let bytes = provider.load(path)?;
        log::info!("Loaded {} bytes of CSV from {} via {}", bytes.len(), path, provider.name());
        Self::from_bytes(&bytes)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl DataSource for CsvDataSource {
    fn next(&mut self) -> Option<DataRow> {
        self.inner.next()
    }

    fn size_hint(&self) -> Option<usize> {
        self.inner.size_hint()
    }
}
