//! Host byte input adapter

use super::types::{SppbByteInput, SppbOffset, SPPB_CURRENT, SPPB_END, SPPB_START};
use crate::byte_source::{ByteSource, SourceCapabilities};
use crate::{PluginError, Result};
use std::io::{self, SeekFrom};
use std::ptr::NonNull;

/// [`ByteSource`] over a host-provided [`SppbByteInput`].
///
/// Each optional operation is available iff the host filled in its function
/// pointer. The adapter borrows the input: it never calls `destroy`, the
/// host does that after the context built from it is gone.
#[derive(Debug)]
pub struct HostByteSource {
    raw: NonNull<SppbByteInput>,
}

impl HostByteSource {
    /// Wrap a host input; `None` for a null pointer.
    ///
    /// # Safety
    /// `raw` must point to a valid input table that stays alive, and whose
    /// functions accept it, for as long as the returned value is used.
    pub unsafe fn new(raw: *mut SppbByteInput) -> Option<Self> {
        NonNull::new(raw).map(|raw| Self { raw })
    }

    fn table(&self) -> &SppbByteInput {
        // SAFETY: validity is the contract of `new`
        unsafe { self.raw.as_ref() }
    }
}

fn host_failure(operation: &str) -> PluginError {
    PluginError::Io(io::Error::other(format!("host input {operation} failed")))
}

impl ByteSource for HostByteSource {
    fn capabilities(&self) -> SourceCapabilities {
        let table = self.table();
        let mut caps = SourceCapabilities::empty();
        caps.set(SourceCapabilities::LENGTH, table.get_length.is_some());
        caps.set(SourceCapabilities::SEEK, table.seek.is_some());
        caps
    }

    fn length(&mut self) -> Result<u64> {
        let get_length = self
            .table()
            .get_length
            .ok_or(PluginError::UnsupportedCapability("length query"))?;

        // SAFETY: host function called with its own input
        let length = unsafe { get_length(self.raw.as_ptr()) };
        u64::try_from(length).map_err(|_| host_failure("length query"))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let read = self
            .table()
            .read
            .ok_or(PluginError::UnsupportedCapability("read"))?;

        // SAFETY: `buf` is valid for `buf.len()` bytes of writes
        let n = unsafe { read(self.raw.as_ptr(), buf.as_mut_ptr().cast(), buf.len()) };
        usize::try_from(n).map_err(|_| host_failure("read"))
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let seek = self
            .table()
            .seek
            .ok_or(PluginError::UnsupportedCapability("seek"))?;

        let (offset, whence) = match pos {
            SeekFrom::Start(offset) => (SppbOffset::try_from(offset).ok(), SPPB_START),
            SeekFrom::Current(offset) => (SppbOffset::try_from(offset).ok(), SPPB_CURRENT),
            SeekFrom::End(offset) => (SppbOffset::try_from(offset).ok(), SPPB_END),
        };
        let offset = offset.ok_or_else(|| host_failure("seek (offset out of range)"))?;

        // SAFETY: host function called with its own input
        let position = unsafe { seek(self.raw.as_ptr(), offset, whence) };
        u64::try_from(position).map_err(|_| host_failure("seek"))
    }
}
