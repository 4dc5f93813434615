//! File-backed byte source

use super::{ByteSource, SourceCapabilities};
use crate::{PluginError, Result};
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Local file opened read-only. Supports every optional operation.
#[derive(Debug)]
pub struct FileByteSource {
    file: File,
    path: PathBuf,
}

impl FileByteSource {
    /// Open `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PluginError::CannotOpen {
            target: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileByteSource {
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::LENGTH | SourceCapabilities::SEEK
    }

    fn length(&mut self) -> Result<u64> {
        let metadata = self.file.metadata().map_err(|e| PluginError::CannotOpen {
            target: self.path.display().to_string(),
            reason: format!("stat failed: {e}"),
        })?;
        Ok(metadata.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.file.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        Ok(self.file.seek(pos)?)
    }
}
