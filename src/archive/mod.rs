//! Zipped module support
//!
//! Tracker modules are commonly distributed zipped, one module per archive,
//! under their own extensions (`mdz`, `s3z`, `xmz`, `itz`). Recognition is by
//! extension only. Extraction always takes **entry 0** of the archive: the
//! entry's name and content are not inspected, so an archive whose first
//! entry is not a module is handed to the decoder as-is and rejected there.
//!
//! Extraction uses the `zip` crate and is compiled in with the `archive`
//! feature. Without it, archived extensions are still recognized and
//! [`extract_first_entry`] fails with
//! [`PluginError::UnsupportedCapability`]; archive bytes are never passed to
//! the decoder as a raw module.

use std::path::Path;

#[cfg(feature = "archive")]
use crate::byte_source::{read_declared, StreamByteSource};
#[cfg(not(feature = "archive"))]
use crate::PluginError;
use crate::Result;

/// Extensions of zipped modules (MOD, S3M, XM, IT)
pub const ARCHIVED_EXTENSIONS: [&str; 4] = ["mdz", "s3z", "xmz", "itz"];

/// Extensions of plain modules
pub const RAW_EXTENSIONS: [&str; 21] = [
    "mod", "s3m", "xm", "it", "669", "amf", "ams", "dbm", "dmf", "dsm", "far", "mdl", "med",
    "mtm", "okt", "ptm", "stm", "ult", "umx", "mt2", "psm",
];

/// Check whether `path` names a zipped module (ASCII case-insensitive).
pub fn is_archived_path(path: impl AsRef<Path>) -> bool {
    has_extension_in(path.as_ref(), &ARCHIVED_EXTENSIONS)
}

/// Check whether `path` names a plain module (ASCII case-insensitive).
pub fn is_raw_path(path: impl AsRef<Path>) -> bool {
    has_extension_in(path.as_ref(), &RAW_EXTENSIONS)
}

fn has_extension_in(path: &Path, extensions: &[&str]) -> bool {
    // `extension()` only yields text after the last dot, so a path shorter
    // than the suffix can never match.
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => extensions
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate)),
        None => false,
    }
}

/// Read entry 0 of the ZIP archive at `path` into memory.
///
/// The buffer is sized from the entry's declared (uncompressed) size; the
/// entry must deliver that many bytes.
///
/// # Errors
/// - [`crate::PluginError::CannotOpen`] if the file, the archive or entry 0 cannot be opened
/// - [`crate::PluginError::AllocationFailure`] if the declared size cannot be allocated
/// - [`crate::PluginError::ShortRead`] if the entry ends early
#[cfg(feature = "archive")]
pub fn extract_first_entry(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| crate::PluginError::CannotOpen {
        target: path.display().to_string(),
        reason: e.to_string(),
    })?;

    extract_first_entry_from(file, &path.display().to_string())
}

/// Read entry 0 of a ZIP archive held by any seekable reader.
///
/// `label` names the archive in error messages.
#[cfg(feature = "archive")]
pub fn extract_first_entry_from<R>(reader: R, label: &str) -> Result<Vec<u8>>
where
    R: std::io::Read + std::io::Seek,
{
    use crate::PluginError;

    let mut archive = zip::ZipArchive::new(reader).map_err(|e| PluginError::CannotOpen {
        target: label.to_string(),
        reason: format!("not a valid ZIP archive: {e}"),
    })?;

    // Entry 0 is the module by convention; there is no manifest to consult.
    let entry = archive.by_index(0).map_err(|e| PluginError::CannotOpen {
        target: format!("{label} (entry 0)"),
        reason: e.to_string(),
    })?;

    let declared = entry.size();
    tracing::debug!(archive = label, entry = entry.name(), declared, "extracting first entry");

    let mut source = StreamByteSource::new(entry);
    read_declared(&mut source, declared)
}

/// Archive support is compiled out; archived modules cannot be loaded.
#[cfg(not(feature = "archive"))]
pub fn extract_first_entry(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let _ = path;
    Err(PluginError::UnsupportedCapability("zip archive support"))
}
