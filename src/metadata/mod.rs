//! Metadata field protocol
//!
//! Hosts read string metadata in two phases: first with no destination to
//! learn the length, then with a buffer of at least that length. Copied
//! bytes are not NUL-terminated; the length travels separately.
//!
//! Modules carry a song name and little else, so [`FieldKind::Title`] is the
//! only field ever present.

use crate::{LoadedModule, ModuleDecoder};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Metadata columns a host may ask for (values match the host ABI)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
pub enum FieldKind {
    /// Placeholder for "no field"
    Invalid = 0,
    /// Song title
    Title = 1,
    /// Performing artist
    Artist = 2,
    /// Album name
    Album = 3,
    /// Album artist
    AlbumArtist = 4,
    /// Free-form comment
    Comment = 5,
    /// Composer
    Composer = 6,
    /// Content type / genre
    Content = 7,
    /// Publisher
    Publisher = 8,
    /// Copyright notice
    Copyright = 9,
    /// Related URL
    Url = 10,
    /// Encoder
    Encoded = 11,
    /// Track number
    Track = 12,
    /// Disc number
    Disc = 13,
    /// Release year
    Year = 14,
    /// Original artist
    OrigArtist = 15,
}

impl FieldKind {
    /// Decode a raw host value. Newer hosts may send kinds unknown here.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::from_u32(raw)
    }
}

/// Whether modules can provide `kind` at all.
pub fn has_field(kind: u32) -> bool {
    FieldKind::from_raw(kind) == Some(FieldKind::Title)
}

/// Value of `kind` for `module`, if present.
pub fn field_value<D: ModuleDecoder>(module: &LoadedModule<D>, kind: u32) -> Option<&str> {
    match FieldKind::from_raw(kind)? {
        FieldKind::Title => module.title(),
        _ => None,
    }
}

/// Two-phase read of one metadata field of `module`.
///
/// See [`copy_field`] for the length convention.
pub fn read_field<D: ModuleDecoder>(
    module: &LoadedModule<D>,
    kind: u32,
    dest: Option<&mut [u8]>,
    length: &mut usize,
) -> bool {
    copy_field(field_value(module, kind).map(str::as_bytes), dest, length)
}

/// Copy a field value into a caller buffer, or report its length.
///
/// - `value` absent: `*length = 0`, returns `false`.
/// - `dest` absent: `*length` = full value length, returns `true`.
/// - `dest` present: copies `min(value length, *length, dest.len())` bytes,
///   unterminated, sets `*length` to the number copied, returns `true`.
pub fn copy_field(value: Option<&[u8]>, dest: Option<&mut [u8]>, length: &mut usize) -> bool {
    let Some(value) = value else {
        *length = 0;
        return false;
    };

    match dest {
        None => *length = value.len(),
        Some(dest) => {
            let n = value.len().min(*length).min(dest.len());
            dest[..n].copy_from_slice(&value[..n]);
            *length = n;
        }
    }

    true
}
