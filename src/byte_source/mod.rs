//! Byte Source Domain
//!
//! Capability-based byte inputs that decouple the decoding engine from where
//! module data comes from: a local file, a memory buffer, an arbitrary stream
//! or an input handed over by the host.
//!
//! Only `read` is mandatory. Length queries and seeking are optional and
//! advertised through [`SourceCapabilities`]; calling an operation a source
//! does not support yields [`PluginError::UnsupportedCapability`], which is
//! distinct from a zero length or an IO failure.

mod file;
mod memory;

pub use file::FileByteSource;
pub use memory::{MemoryByteSource, StreamByteSource};

use crate::{PluginError, Result};
use bitflags::bitflags;
use std::io::SeekFrom;

bitflags! {
    /// Optional operations a [`ByteSource`] supports
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SourceCapabilities: u8 {
        /// `length()` reports the total size
        const LENGTH = 0x01;
        /// `seek()` repositions the stream
        const SEEK = 0x02;
    }
}

/// An abstraction of some raw data container.
///
/// Closing is `Drop`. The loader only borrows a source; whoever created it
/// drops it, and must do so after any decoder built from it.
pub trait ByteSource {
    /// Optional operations this source supports.
    fn capabilities(&self) -> SourceCapabilities;

    /// Total length in bytes.
    ///
    /// Sources without [`SourceCapabilities::LENGTH`] return
    /// [`PluginError::UnsupportedCapability`].
    fn length(&mut self) -> Result<u64> {
        Err(PluginError::UnsupportedCapability("length query"))
    }

    /// Read some bytes into `buf`.
    ///
    /// Returns `Ok(0)` exactly at end of input.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Move to another location; returns the new position from the start.
    ///
    /// Sources without [`SourceCapabilities::SEEK`] return
    /// [`PluginError::UnsupportedCapability`].
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let _ = pos;
        Err(PluginError::UnsupportedCapability("seek"))
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn capabilities(&self) -> SourceCapabilities {
        (**self).capabilities()
    }

    fn length(&mut self) -> Result<u64> {
        (**self).length()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        (**self).seek(pos)
    }
}

/// Read a whole source into memory.
///
/// Requires the length capability: the declared length sizes the buffer in
/// one allocation and the source is read until that many bytes arrived.
/// There is no incremental fallback for sources without a length.
///
/// # Errors
/// - [`PluginError::UnsupportedCapability`] if the source cannot report its length
/// - [`PluginError::AllocationFailure`] if the declared length cannot be allocated
/// - [`PluginError::ShortRead`] if the input ends before the declared length
pub fn load_whole<S: ByteSource + ?Sized>(source: &mut S) -> Result<Vec<u8>> {
    if !source.capabilities().contains(SourceCapabilities::LENGTH) {
        return Err(PluginError::UnsupportedCapability("length query"));
    }

    let expected = source.length()?;
    read_declared(source, expected)
}

/// Read exactly `expected` bytes into a fresh buffer.
///
/// The size comes from metadata (stat, archive entry header) and is not
/// trusted beyond the read-count check.
pub(crate) fn read_declared<S: ByteSource + ?Sized>(
    source: &mut S,
    expected: u64,
) -> Result<Vec<u8>> {
    let size =
        usize::try_from(expected).map_err(|_| PluginError::AllocationFailure { size: expected })?;

    let mut data = Vec::new();
    data.try_reserve_exact(size)
        .map_err(|_| PluginError::AllocationFailure { size: expected })?;
    data.resize(size, 0);

    let mut filled = 0;
    while filled < size {
        let n = source.read(&mut data[filled..])?;
        if n == 0 {
            return Err(PluginError::ShortRead {
                expected,
                actual: filled as u64,
            });
        }
        // Host inputs are not trusted to respect the buffer size
        filled += n.min(size - filled);
    }

    Ok(data)
}
