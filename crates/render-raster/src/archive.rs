use cardpress_traits::{ArchiveError, ArchiveWriter};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// In-memory zip archive. Entries are stored uncompressed: PNG and JPEG
/// payloads are already compressed.
pub struct ZipArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
}

impl Default for ZipArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipArchiveWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
        }
    }
}

fn backend(err: zip::result::ZipError) -> ArchiveError {
    ArchiveError::Backend(err.to_string())
}

impl ArchiveWriter for ZipArchiveWriter {
    fn add(&mut self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        if !self.names.insert(name.to_string()) {
            return Err(ArchiveError::DuplicateEntry(name.to_string()));
        }
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.zip.start_file(name, options).map_err(backend)?;
        self.zip.write_all(bytes)?;
        Ok(())
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    fn finalize(self) -> Result<Vec<u8>, ArchiveError> {
        let cursor = self.zip.finish().map_err(backend)?;
        Ok(cursor.into_inner())
    }
}
