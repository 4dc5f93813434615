//! In-memory and stream-backed byte sources

use super::{ByteSource, SourceCapabilities};
use crate::Result;
use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom};

/// Owned memory buffer. Supports every optional operation.
#[derive(Debug, Clone, Default)]
pub struct MemoryByteSource {
    cursor: Cursor<Vec<u8>>,
}

impl MemoryByteSource {
    /// Wrap `data`, positioned at the start.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            cursor: Cursor::new(data.into()),
        }
    }

    /// Give the buffer back.
    pub fn into_inner(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl ByteSource for MemoryByteSource {
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::LENGTH | SourceCapabilities::SEEK
    }

    fn length(&mut self) -> Result<u64> {
        Ok(self.cursor.get_ref().len() as u64)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.cursor.read(buf)?)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        Ok(self.cursor.seek(pos)?)
    }
}

/// Forward-only stream of unknown length (sockets, pipes, decompressors).
///
/// Advertises no optional capability.
#[derive(Debug)]
pub struct StreamByteSource<R> {
    inner: R,
}

impl<R: Read> StreamByteSource<R> {
    /// Wrap a reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for StreamByteSource<R> {
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::empty()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_seek_past_end_reads_nothing() {
        let mut source = MemoryByteSource::new(vec![1, 2, 3]);
        assert_eq!(source.seek(SeekFrom::Start(10)).unwrap(), 10);
        let mut buf = [0u8; 4];
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_memory_seek_before_start_fails() {
        let mut source = MemoryByteSource::new(vec![1, 2, 3]);
        assert!(source.seek(SeekFrom::Current(-1)).is_err());
    }

    #[test]
    fn test_memory_into_inner() {
        let source = MemoryByteSource::new(b"M.K.".to_vec());
        assert_eq!(source.into_inner(), b"M.K.");
    }

    #[test]
    fn test_stream_reads_to_end() {
        let mut source = StreamByteSource::new(&b"abc"[..]);
        let mut buf = [0u8; 8];
        assert_eq!(source.read(&mut buf).unwrap(), 3);
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }
}
