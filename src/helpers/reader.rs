use crate::error::AssetSheetError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

/// A workbook byte source: either a file on disk or bytes already in memory
/// (an uploaded document).
pub enum WorkbookSource {
    /// Local file reader
    Local(BufReader<File>),
    /// In-memory buffer
    Memory(Cursor<Vec<u8>>),
}

impl WorkbookSource {
    /// Opens a local file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<WorkbookSource, AssetSheetError> {
        let file = File::open(path)?;
        Ok(WorkbookSource::Local(BufReader::new(file)))
    }

    /// Wraps bytes that were read elsewhere
    pub fn from_bytes(bytes: Vec<u8>) -> WorkbookSource {
        WorkbookSource::Memory(Cursor::new(bytes))
    }
}

impl Read for WorkbookSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            WorkbookSource::Local(reader) => reader.read(buf),
            WorkbookSource::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for WorkbookSource {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            WorkbookSource::Local(reader) => reader.seek(pos),
            WorkbookSource::Memory(reader) => reader.seek(pos),
        }
    }
}
