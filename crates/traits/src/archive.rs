//! The archive writer capability used by raster exports.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Duplicate archive entry '{0}'")]
    DuplicateEntry(String),
    #[error("Archive error: {0}")]
    Backend(String),
}

/// Collects named files in memory and packages them into one blob.
pub trait ArchiveWriter {
    fn add(&mut self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError>;

    /// Number of entries added so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn finalize(self) -> Result<Vec<u8>, ArchiveError>
    where
        Self: Sized;
}
